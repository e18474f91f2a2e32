use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of the transforms from src/transforms.rs
// We need to duplicate this here since build scripts can't access src/ modules
const AVAILABLE_TRANSFORMS: &[&str] = &["adf-treeviz", "adf-json", "text"];
const AVAILABLE_FORMATS: &[&str] = &["adf", "markdown", "text", "treeviz"];

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = Command::new("adf")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert markdown to Atlassian Document Format and back to text")
        .arg_required_else_help(true)
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .help("List available formats and transforms")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to an adf.toml configuration file")
                .value_hint(ValueHint::FilePath),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert between document formats (default command)")
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
                        .value_parser(clap::builder::PossibleValuesParser::new(AVAILABLE_FORMATS)),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .required(true)
                        .value_parser(clap::builder::PossibleValuesParser::new(AVAILABLE_FORMATS)),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("inspect")
                .about("Show the ADF tree built from a file")
                .arg(
                    Arg::new("path")
                        .help("Path to the input file, or - for stdin")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("transform")
                        .value_parser(clap::builder::PossibleValuesParser::new(
                            AVAILABLE_TRANSFORMS,
                        ))
                        .index(2)
                        .value_hint(ValueHint::Other),
                ),
        );

    // Generate completions for bash
    generate_to(Bash, &mut cmd, "adf", &outdir)?;

    // Generate completions for zsh
    generate_to(Zsh, &mut cmd, "adf", &outdir)?;

    // Generate completions for fish
    generate_to(Fish, &mut cmd, "adf", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
