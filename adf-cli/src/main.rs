// Command-line interface for adf
//
// This binary converts the markdown people and language models write into the ADF JSON the
// platform's rich-text fields accept, and turns ADF received from the platform back into text.
// The conversions themselves live in the adf-babel crate; this is only the shell around them.
//
// Usage:
//  adf <input> --to <format> [--from <format>] [--output <file>]  - Convert between formats (default)
//  adf convert <input> --to <format> [--from <format>] [--output <file>]  - Same as above (explicit)
//  adf inspect <path> [<transform>]      - Show the tree (defaults to "adf-treeviz")
//  adf --list-formats                    - List available formats and transforms
//
// Use - as the input path to read from stdin.
//
// Extra Parameters:
//
// Format-specific parameters can be passed using --extra-<parameter-name> <value>.
// The CLI layer strips the "extra-" prefix, applies the ones that mirror configuration keys
// and passes the rest to the format/transform.
// Example:
//  adf notes.md --to adf --extra-pretty false

use adf_cli::transforms;

use adf_babel::format::parse_bool;
use adf_babel::formats::treeviz::TreevizOptions;
use adf_babel::FormatRegistry;
use adf_config::{AdfConfig, Loader};
use clap::{Arg, ArgAction, Command, ValueHint};
use log::{debug, info};
use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};

const STDIN_PATH: &str = "-";
const DEFAULT_SOURCE_FORMAT: &str = "markdown";

/// Parse extra-* arguments from command line args
/// Returns (cleaned_args_without_extras, extra_params_map)
///
/// Supports both:
/// - `--extra-<key> <value>` (explicit value)
/// - `--extra-<key>` (boolean flag, defaults to "true")
/// - `--extras-<key>` (alias for `--extra-<key>`)
fn parse_extra_args(args: &[String]) -> (Vec<String>, HashMap<String, String>) {
    let mut cleaned_args = Vec::new();
    let mut extra_params = HashMap::new();
    let mut i = 0;

    while i < args.len() {
        let arg = &args[i];

        let key_opt = arg
            .strip_prefix("--extra-")
            .or_else(|| arg.strip_prefix("--extras-"));

        if let Some(key) = key_opt {
            let has_value = args.get(i + 1).is_some_and(|next| !next.starts_with('-'));

            if has_value {
                extra_params.insert(key.to_string(), args[i + 1].clone());
                i += 2;
            } else {
                extra_params.insert(key.to_string(), "true".to_string());
                i += 1;
            }
            continue;
        }

        cleaned_args.push(arg.clone());
        i += 1;
    }

    (cleaned_args, extra_params)
}

fn build_cli() -> Command {
    Command::new("adf")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert markdown to Atlassian Document Format and back to text")
        .long_about(
            "adf converts between a markdown dialect and the Atlassian Document Format (ADF).\n\n\
            Commands:\n  \
            - convert: Transform between formats (markdown, adf, text, treeviz)\n  \
            - inspect: View the ADF tree built from a file\n\n\
            Extra Parameters:\n  \
            Use --extra-<name> [value] to pass format-specific options.\n  \
            Boolean flags can omit the value (defaults to 'true').\n\n\
            Examples:\n  \
            adf notes.md --to adf                       # Markdown to ADF JSON (stdout)\n  \
            adf notes.md --to adf --extra-pretty false  # Single-line JSON\n  \
            adf comment.json --to text                  # ADF JSON to plain text\n  \
            adf inspect notes.md                        # Tree visualization\n  \
            cat notes.md | adf - --to adf               # Read from stdin",
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .help("List available formats and transforms")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to an adf.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .subcommand(
            Command::new("inspect")
                .about("Show the ADF tree built from a file")
                .long_about(
                    "Parse a file and print the resulting ADF tree.\n\n\
                    Transforms:\n  \
                    - adf-treeviz:  Tree visualization (default)\n  \
                    - adf-json:     ADF JSON\n  \
                    - text:         Plain text rendering\n\n\
                    Extra Parameters:\n  \
                    --extra-show-marks <bool>    Append mark names to text nodes\n  \
                    --extra-label-width <n>      Truncate labels after n characters\n\n\
                    Examples:\n  \
                    adf inspect notes.md                  # Tree visualization (default)\n  \
                    adf inspect notes.md adf-json         # JSON that would be sent\n  \
                    adf inspect comment.json text         # Text rendering",
                )
                .arg(
                    Arg::new("path")
                        .help("Path to the input file, or - for stdin")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("from")
                        .long("from")
                        .help("Source format (auto-detected from file extension if not specified)")
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("transform")
                        .help("Transform to apply. Defaults to 'adf-treeviz'")
                        .required(false)
                        .value_parser(clap::builder::PossibleValuesParser::new(
                            transforms::AVAILABLE_TRANSFORMS,
                        ))
                        .index(2)
                        .value_hint(ValueHint::Other),
                ),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert between document formats (default command)")
                .long_about(
                    "Convert documents between formats.\n\n\
                    Supported formats:\n  \
                    - markdown: Markdown dialect (.md), input only\n  \
                    - adf:      ADF JSON (.json)\n  \
                    - text:     Plain text (.txt), output only\n  \
                    - treeviz:  Tree visualization, output only\n\n\
                    The source format is auto-detected from the file extension; stdin and\n\
                    unrecognised extensions are read as markdown.\n\
                    Output goes to stdout by default, or use -o to specify a file.\n\n\
                    Examples:\n  \
                    adf convert notes.md --to adf -o body.json  # Markdown to ADF file\n  \
                    adf convert reply.json --to text            # ADF to text (stdout)\n  \
                    adf notes.md --to adf                       # 'convert' is optional",
                )
                .arg(
                    Arg::new("input")
                        .help("Input file path, or - for stdin")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("from")
                        .long("from")
                        .help("Source format (auto-detected from file extension if not specified)")
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .help("Target format (required)")
                        .required(true)
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file path (defaults to stdout)")
                        .value_hint(ValueHint::FilePath),
                ),
        )
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    // Parse extra-* arguments before clap processing
    let (cleaned_args, mut extra_params) = parse_extra_args(&args);

    let cli = build_cli();
    let matches = match cli.clone().try_get_matches_from(&cleaned_args) {
        Ok(m) => m,
        Err(e) => {
            if cleaned_args.len() > 1
                && (cleaned_args[1] == STDIN_PATH || !cleaned_args[1].starts_with('-'))
                && cleaned_args[1] != "inspect"
                && cleaned_args[1] != "convert"
                && cleaned_args[1] != "help"
            {
                // Inject "convert" as the subcommand
                let mut new_args = vec![cleaned_args[0].clone(), "convert".to_string()];
                new_args.extend_from_slice(&cleaned_args[1..]);

                match cli.try_get_matches_from(&new_args) {
                    Ok(m) => m,
                    Err(e2) => e2.exit(),
                }
            } else {
                e.exit();
            }
        }
    };

    let mut config = load_cli_config(matches.get_one::<String>("config").map(|s| s.as_str()));
    init_logging(&config);

    if matches.get_flag("list-formats") {
        handle_list_formats_command();
        return;
    }

    apply_config_overrides(&mut config, &mut extra_params);

    match matches.subcommand() {
        Some(("inspect", sub_matches)) => {
            let path = sub_matches
                .get_one::<String>("path")
                .expect("path is required");
            let from = sub_matches.get_one::<String>("from").map(|s| s.as_str());
            let transform = sub_matches
                .get_one::<String>("transform")
                .map(|s| s.as_str())
                .unwrap_or("adf-treeviz");
            handle_inspect_command(path, from, transform, &extra_params, &config);
        }
        Some(("convert", sub_matches)) => {
            let input = sub_matches
                .get_one::<String>("input")
                .expect("input is required");
            let from = sub_matches.get_one::<String>("from").map(|s| s.as_str());
            let to = sub_matches.get_one::<String>("to").expect("to is required");
            let output = sub_matches.get_one::<String>("output").map(|s| s.as_str());
            handle_convert_command(input, from, to, output, &extra_params, &config);
        }
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

/// `RUST_LOG` wins; otherwise the configured level applies.
fn init_logging(config: &AdfConfig) {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log.level.as_str()),
    )
    .init();
}

fn read_input(path: &str) -> String {
    let result = if path == STDIN_PATH {
        io::read_to_string(io::stdin())
    } else {
        fs::read_to_string(path)
    };
    result.unwrap_or_else(|e| {
        eprintln!("Error reading file '{path}': {e}");
        std::process::exit(1);
    })
}

/// Explicit `--from`, else the format registered for the file extension, else markdown.
fn resolve_source_format(registry: &FormatRegistry, input: &str, from: Option<&str>) -> String {
    if let Some(from) = from {
        return from.to_string();
    }
    if input != STDIN_PATH {
        if let Some(detected) = registry.detect_format_from_filename(input) {
            debug!("detected source format '{detected}' for '{input}'");
            return detected;
        }
    }
    info!("reading '{input}' as {DEFAULT_SOURCE_FORMAT}");
    DEFAULT_SOURCE_FORMAT.to_string()
}

/// Write to stdout, ending with a newline.
fn print_output(text: &str) {
    let mut stdout = io::stdout().lock();
    let result = stdout.write_all(text.as_bytes()).and_then(|_| {
        if text.ends_with('\n') {
            Ok(())
        } else {
            stdout.write_all(b"\n")
        }
    });
    if let Err(e) = result {
        eprintln!("Error writing output: {e}");
        std::process::exit(1);
    }
}

/// Handle the inspect command
fn handle_inspect_command(
    path: &str,
    from: Option<&str>,
    transform: &str,
    extra_params: &HashMap<String, String>,
    config: &AdfConfig,
) {
    let registry = FormatRegistry::default();
    let source_format = resolve_source_format(&registry, path, from);
    let source = read_input(path);

    let params = build_inspect_params(transform, config, extra_params);

    let tree = TreevizOptions::from(&config.inspect);
    let output = transforms::execute_transform(&source, &source_format, transform, tree, &params)
        .unwrap_or_else(|e| {
            eprintln!("Execution error: {e}");
            std::process::exit(1);
        });

    print_output(&output);
}

/// Handle the convert command
fn handle_convert_command(
    input: &str,
    from: Option<&str>,
    to: &str,
    output: Option<&str>,
    extra_params: &HashMap<String, String>,
    config: &AdfConfig,
) {
    let registry = FormatRegistry::default();
    let from = resolve_source_format(&registry, input, from);

    // Validate formats exist
    if let Err(e) = registry.get(&from) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
    if let Err(e) = registry.get(to) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    let source = read_input(input);

    let doc = registry.parse(&source, &from).unwrap_or_else(|e| {
        eprintln!("Parse error: {e}");
        std::process::exit(1);
    });

    let mut format_options = format_params_from_config(to, config);
    for (key, value) in extra_params {
        format_options.insert(key.clone(), value.clone());
    }

    let tree = TreevizOptions::from(&config.inspect);
    let result = transforms::serialize_document(&registry, &doc, to, tree, &format_options)
        .unwrap_or_else(|e| {
            eprintln!("Serialization error: {e}");
            std::process::exit(1);
        });

    match output {
        Some(path) => {
            fs::write(path, result).unwrap_or_else(|e| {
                eprintln!("Error writing file '{path}': {e}");
                std::process::exit(1);
            });
        }
        None => print_output(&result),
    }
}

/// Handle the list-formats command
fn handle_list_formats_command() {
    let registry = FormatRegistry::default();

    println!("Conversion formats:");
    for format_name in registry.list_formats() {
        if let Ok(format) = registry.get(&format_name) {
            let direction = match (format.supports_parsing(), format.supports_serialization()) {
                (true, true) => "in/out",
                (true, false) => "in",
                (false, true) => "out",
                (false, false) => "-",
            };
            println!(
                "  {:<10} {:<7} {}",
                format_name,
                direction,
                format.description()
            );
        }
    }

    println!("\nInspect transforms:");
    for transform_name in transforms::AVAILABLE_TRANSFORMS {
        println!("  {transform_name}");
    }
}

fn load_cli_config(explicit_path: Option<&str>) -> AdfConfig {
    let loader = Loader::new().with_optional_file("adf.toml");
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };

    loader.build().unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {err}");
        std::process::exit(1);
    })
}

/// Move `--extra-*` keys that mirror configuration values into the config.
fn apply_config_overrides(config: &mut AdfConfig, extra_params: &mut HashMap<String, String>) {
    if let Some(raw) = extra_params.remove("pretty") {
        config.convert.pretty = parse_bool_arg("pretty", &raw);
    }
    if let Some(raw) = take_override(extra_params, &["show-marks", "marks"]) {
        config.inspect.show_marks = parse_bool_arg("show-marks", &raw);
    }
    if let Some(raw) = take_override(extra_params, &["label-width", "width"]) {
        config.inspect.label_width = raw.parse().unwrap_or_else(|_| {
            eprintln!("Invalid number '{raw}' for --extra-label-width");
            std::process::exit(1);
        });
    }
}

/// Configured options for a registry format. Treeviz settings travel as
/// [`TreevizOptions`] instead.
fn format_params_from_config(format: &str, config: &AdfConfig) -> HashMap<String, String> {
    let mut params = HashMap::new();
    if format == "adf" {
        params.insert("pretty".to_string(), config.convert.pretty.to_string());
    }
    params
}

fn build_inspect_params(
    transform: &str,
    config: &AdfConfig,
    overrides: &HashMap<String, String>,
) -> HashMap<String, String> {
    let format = match transform {
        "adf-treeviz" => "treeviz",
        "adf-json" => "adf",
        other => other,
    };
    let mut params = format_params_from_config(format, config);

    for (key, value) in overrides {
        params.insert(key.clone(), value.clone());
    }

    params
}

fn take_override(map: &mut HashMap<String, String>, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(value) = map.remove(*key) {
            return Some(value);
        }
    }
    None
}

fn parse_bool_arg(flag: &str, raw: &str) -> bool {
    parse_bool(raw).unwrap_or_else(|| {
        eprintln!("Invalid boolean value '{raw}' for --extra-{flag}");
        std::process::exit(1);
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_extra_args_empty() {
        let input = args(&["adf", "inspect", "notes.md"]);
        let (cleaned, extra) = parse_extra_args(&input);

        assert_eq!(cleaned, input);
        assert!(extra.is_empty());
    }

    #[test]
    fn test_parse_extra_args_mixed_with_regular_args() {
        let input = args(&[
            "adf",
            "convert",
            "notes.md",
            "--to",
            "adf",
            "--extra-pretty",
            "false",
            "--from",
            "markdown",
        ]);
        let (cleaned, extra) = parse_extra_args(&input);

        assert_eq!(
            cleaned,
            args(&["adf", "convert", "notes.md", "--to", "adf", "--from", "markdown"])
        );
        assert_eq!(extra.len(), 1);
        assert_eq!(extra.get("pretty"), Some(&"false".to_string()));
    }

    #[test]
    fn test_parse_extra_args_boolean_flag_at_end() {
        let input = args(&["adf", "inspect", "notes.md", "--extra-show-marks"]);
        let (cleaned, extra) = parse_extra_args(&input);

        assert_eq!(cleaned, args(&["adf", "inspect", "notes.md"]));
        assert_eq!(extra.get("show-marks"), Some(&"true".to_string()));
    }

    #[test]
    fn test_parse_extra_args_flag_before_stdin_marker() {
        let input = args(&["adf", "--extra-pretty", "-", "--to", "adf"]);
        let (cleaned, extra) = parse_extra_args(&input);

        assert_eq!(cleaned, args(&["adf", "-", "--to", "adf"]));
        assert_eq!(extra.get("pretty"), Some(&"true".to_string()));
    }

    #[test]
    fn test_parse_extra_args_allows_extras_alias() {
        let input = args(&["adf", "inspect", "notes.md", "--extras-label-width", "12"]);
        let (cleaned, extra) = parse_extra_args(&input);

        assert_eq!(cleaned, args(&["adf", "inspect", "notes.md"]));
        assert_eq!(extra.get("label-width"), Some(&"12".to_string()));
    }

    #[test]
    fn apply_config_overrides_updates_known_flags() {
        let mut config = load_cli_config(None);
        let mut extras = HashMap::new();
        extras.insert("pretty".to_string(), "no".to_string());
        extras.insert("show-marks".to_string(), "false".to_string());
        extras.insert("label-width".to_string(), "12".to_string());
        extras.insert("custom".to_string(), "value".to_string());

        apply_config_overrides(&mut config, &mut extras);

        assert!(!config.convert.pretty);
        assert!(!config.inspect.show_marks);
        assert_eq!(config.inspect.label_width, 12);
        assert_eq!(extras.len(), 1);
        assert!(extras.contains_key("custom"));
    }

    #[test]
    fn inspect_params_follow_transform() {
        let config = load_cli_config(None);
        let overrides = HashMap::new();

        assert!(build_inspect_params("adf-treeviz", &config, &overrides).is_empty());
        assert_eq!(
            TreevizOptions::from(&config.inspect),
            TreevizOptions::default()
        );

        let json = build_inspect_params("adf-json", &config, &overrides);
        assert_eq!(json.get("pretty"), Some(&"true".to_string()));
        assert_eq!(json.len(), 1);

        assert!(build_inspect_params("text", &config, &overrides).is_empty());
    }

    #[test]
    fn source_format_resolution() {
        let registry = FormatRegistry::default();
        assert_eq!(resolve_source_format(&registry, "a.json", None), "adf");
        assert_eq!(resolve_source_format(&registry, "a.md", None), "markdown");
        assert_eq!(resolve_source_format(&registry, "-", None), "markdown");
        assert_eq!(resolve_source_format(&registry, "notes", None), "markdown");
        assert_eq!(
            resolve_source_format(&registry, "a.md", Some("adf")),
            "adf"
        );
    }
}
