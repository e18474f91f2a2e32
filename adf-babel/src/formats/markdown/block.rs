//! Block parsing (lines → blocks).
//!
//! A cursor walks the lines; at each position the matchers run in a fixed
//! priority and the first one that recognises the line consumes a contiguous
//! run of lines:
//!
//!     blank > fence > panel > expand > table > heading > rule > blockquote
//!           > bullet list > ordered list > paragraph
//!
//! Container bodies (blockquote, panel, expand, nested list content) are fed
//! back into [`parse_blocks`]. Nothing here fails: unterminated fences run to
//! the end of input and a table without a separator row is read as text.
//! Containers nested deeper than [`MAX_DEPTH`] are not opened; their lines
//! are kept as one literal paragraph.

use super::inline::parse_inline;
use crate::adf::{Block, Document, Expand, Inline, MediaSingle, Panel, PanelType};
use log::{debug, trace};
use once_cell::sync::Lazy;
use regex::Regex;

static ORDERED_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+\.[ \t]").expect("valid ordered list marker pattern"));

const CODE_FENCE: &str = "```";
const PANEL_FENCE: &str = ":::";
const EXPAND_FENCE: &str = "+++";

/// Deepest container nesting the parser builds.
pub const MAX_DEPTH: usize = 32;

/// Parse a whole markdown source into a document.
pub fn parse_markdown(source: &str) -> Document {
    let normalized = source.replace("\r\n", "\n");
    let lines: Vec<&str> = normalized.split('\n').collect();
    Document::new(parse_blocks(&lines))
}

/// Parse a run of lines into blocks.
pub fn parse_blocks(lines: &[&str]) -> Vec<Block> {
    parse_blocks_at(lines, 0)
}

fn parse_blocks_at(lines: &[&str], depth: usize) -> Vec<Block> {
    if depth >= MAX_DEPTH {
        return literal_paragraph(lines);
    }

    let mut blocks = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let trimmed = lines[i].trim();

        if trimmed.is_empty() {
            i += 1;
            continue;
        }

        if trimmed.starts_with(CODE_FENCE) {
            let (block, next) = parse_code_block(lines, i);
            blocks.push(block);
            i = next;
            continue;
        }

        if let Some(panel_type) = panel_opener(trimmed) {
            let (body, next) = fenced_body(lines, i, PANEL_FENCE);
            blocks.push(Block::Panel(Panel {
                panel_type,
                content: parse_blocks_at(body, depth + 1),
            }));
            i = next;
            continue;
        }

        if let Some(title) = trimmed.strip_prefix(EXPAND_FENCE) {
            let title = title.trim();
            let (body, next) = fenced_body(lines, i, EXPAND_FENCE);
            blocks.push(Block::Expand(Expand {
                title: (!title.is_empty()).then(|| title.to_string()),
                content: parse_blocks_at(body, depth + 1),
            }));
            i = next;
            continue;
        }

        if is_table_row(trimmed) {
            if table_starts_at(lines, i) {
                let (block, next) = parse_table(lines, i);
                blocks.push(block);
                i = next;
                continue;
            }
            debug!("line {} looks like a table row but has no separator", i + 1);
        }

        if let Some((level, text)) = heading(trimmed) {
            trace!("heading level {level} at line {}", i + 1);
            blocks.extend(hoist_media(parse_inline(text), |content| {
                Block::heading(level, content)
            }));
            i += 1;
            continue;
        }

        if is_rule(trimmed) {
            blocks.push(Block::Rule);
            i += 1;
            continue;
        }

        if trimmed.starts_with('>') {
            let (block, next) = parse_blockquote(lines, i, depth);
            blocks.push(block);
            i = next;
            continue;
        }

        if let Some((kind, _)) = list_item(trimmed) {
            let (block, next) = parse_list(lines, i, kind, depth);
            blocks.push(block);
            i = next;
            continue;
        }

        let (paragraph, next) = parse_paragraph(lines, i);
        blocks.extend(paragraph);
        i = next;
    }

    blocks
}

/// All non-blank lines of `lines` as a single unparsed paragraph.
fn literal_paragraph(lines: &[&str]) -> Vec<Block> {
    let parts: Vec<&str> = lines
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect();
    if parts.is_empty() {
        return Vec::new();
    }
    debug!("nesting deeper than {MAX_DEPTH} levels; keeping {} lines as text", parts.len());
    vec![Block::paragraph(vec![Inline::text(parts.join(" "))])]
}

/// Body lines between an opening fence at `start` and the next line that is
/// exactly `fence`, plus the index after the closing fence. Without a closing
/// fence the body runs to the end of input.
fn fenced_body<'l, 'a>(lines: &'l [&'a str], start: usize, fence: &str) -> (&'l [&'a str], usize) {
    let body_start = start + 1;
    match lines[body_start..]
        .iter()
        .position(|line| line.trim() == fence)
    {
        Some(offset) => {
            let end = body_start + offset;
            (&lines[body_start..end], end + 1)
        }
        None => {
            debug!(
                "unterminated `{fence}` block opened at line {}; consuming to end of input",
                start + 1
            );
            (&lines[body_start..], lines.len())
        }
    }
}

fn parse_code_block(lines: &[&str], start: usize) -> (Block, usize) {
    let info = lines[start].trim()[CODE_FENCE.len()..].trim();
    let language = (!info.is_empty()).then(|| info.to_string());
    let (body, next) = fenced_body(lines, start, CODE_FENCE);
    (Block::code_block(language, body.join("\n")), next)
}

fn panel_opener(trimmed: &str) -> Option<PanelType> {
    let rest = trimmed.strip_prefix(PANEL_FENCE)?;
    rest.split_whitespace().next().and_then(PanelType::parse)
}

fn is_table_row(trimmed: &str) -> bool {
    trimmed.len() >= 2 && trimmed.starts_with('|') && trimmed.ends_with('|')
}

fn is_table_separator(trimmed: &str) -> bool {
    trimmed.contains('-')
        && trimmed
            .chars()
            .all(|c| matches!(c, '|' | '-' | ':' | ' '))
}

/// A header row only counts when the following line is a separator row.
fn table_starts_at(lines: &[&str], i: usize) -> bool {
    is_table_row(lines[i].trim())
        && lines
            .get(i + 1)
            .is_some_and(|next| is_table_separator(next.trim()))
}

fn split_cells(trimmed: &str) -> impl Iterator<Item = &str> {
    trimmed[1..trimmed.len() - 1].split('|').map(str::trim)
}

fn cell_content(text: &str) -> Vec<Block> {
    hoist_media(parse_inline(text), Block::paragraph)
}

fn parse_table(lines: &[&str], start: usize) -> (Block, usize) {
    let header = Block::TableRow(
        split_cells(lines[start].trim())
            .map(|cell| Block::TableHeader(cell_content(cell)))
            .collect(),
    );
    let mut rows = vec![header];

    let mut i = start + 2;
    while i < lines.len() && is_table_row(lines[i].trim()) {
        rows.push(Block::TableRow(
            split_cells(lines[i].trim())
                .map(|cell| Block::TableCell(cell_content(cell)))
                .collect(),
        ));
        i += 1;
    }

    (Block::Table(rows), i)
}

/// `#`..`######` followed by end of line or a space.
fn heading(trimmed: &str) -> Option<(u8, &str)> {
    let level = trimmed.bytes().take_while(|&b| b == b'#').count();
    if level == 0 || level > 6 {
        return None;
    }
    let rest = &trimmed[level..];
    if rest.is_empty() || rest.starts_with(' ') {
        Some((level as u8, rest.trim()))
    } else {
        None
    }
}

/// Three or more of one of `-`, `*`, `_`, optionally separated by spaces.
fn is_rule(trimmed: &str) -> bool {
    let Some(marker) = trimmed.chars().next() else {
        return false;
    };
    trimmed.len() >= 3
        && matches!(marker, '-' | '*' | '_')
        && trimmed.chars().all(|c| c == marker || c == ' ')
        && trimmed.chars().filter(|&c| c == marker).count() >= 3
}

fn parse_blockquote(lines: &[&str], start: usize, depth: usize) -> (Block, usize) {
    let mut inner = Vec::new();
    let mut i = start;
    while i < lines.len() {
        let Some(rest) = lines[i].trim().strip_prefix('>') else {
            break;
        };
        inner.push(rest.strip_prefix(' ').unwrap_or(rest));
        i += 1;
    }
    (Block::Blockquote(parse_blocks_at(&inner, depth + 1)), i)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListKind {
    Bullet,
    Ordered,
}

/// Recognise a list item line, returning its kind and the text after the marker.
fn list_item(trimmed: &str) -> Option<(ListKind, &str)> {
    for marker in ["- ", "* ", "+ "] {
        if let Some(text) = trimmed.strip_prefix(marker) {
            return Some((ListKind::Bullet, text.trim_start()));
        }
    }
    ORDERED_MARKER
        .find(trimmed)
        .map(|m| (ListKind::Ordered, trimmed[m.end()..].trim_start()))
}

/// Indentation width, counting a tab as four columns.
fn indent(line: &str) -> usize {
    line.chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .map(|c| if c == '\t' { 4 } else { 1 })
        .sum()
}

fn next_non_blank(lines: &[&str], from: usize) -> Option<usize> {
    (from..lines.len()).find(|&j| !lines[j].trim().is_empty())
}

/// Whether a non-blank line after a blank gap still belongs to the list.
fn continues_list(line: &str, kind: ListKind, base: usize) -> bool {
    let depth = indent(line);
    depth > base
        || (depth == base && list_item(line.trim()).is_some_and(|(k, _)| k == kind))
}

/// End (exclusive) of the run of lines indented deeper than `base`, allowing
/// blank lines inside the run.
fn nested_end(lines: &[&str], start: usize, base: usize) -> usize {
    let mut j = start;
    while j < lines.len() {
        if lines[j].trim().is_empty() {
            match next_non_blank(lines, j) {
                Some(k) if indent(lines[k]) > base => j = k,
                _ => break,
            }
        } else if indent(lines[j]) > base {
            j += 1;
        } else {
            break;
        }
    }
    j
}

/// Strip the common leading whitespace of the non-blank lines.
fn dedent<'a>(lines: &[&'a str]) -> Vec<&'a str> {
    let leading = |line: &str| line.len() - line.trim_start_matches(&[' ', '\t'][..]).len();
    let width = lines
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|&line| leading(line))
        .min()
        .unwrap_or(0);
    lines
        .iter()
        .map(|&line| &line[leading(line).min(width)..])
        .collect()
}

fn parse_list(lines: &[&str], start: usize, kind: ListKind, depth: usize) -> (Block, usize) {
    let base = indent(lines[start]);
    let mut items: Vec<Vec<Block>> = Vec::new();
    let mut i = start;

    while i < lines.len() {
        let line = lines[i];
        let trimmed = line.trim();

        if trimmed.is_empty() {
            match next_non_blank(lines, i) {
                Some(j) if continues_list(lines[j], kind, base) => {
                    i = j;
                    continue;
                }
                _ => break,
            }
        }

        let depth = indent(line);
        if depth > base {
            let end = nested_end(lines, i, base);
            let nested = parse_blocks_at(&dedent(&lines[i..end]), depth + 1);
            if let Some(item) = items.last_mut() {
                item.extend(nested);
            }
            i = end;
            continue;
        }

        match list_item(trimmed) {
            Some((item_kind, text)) if item_kind == kind && depth == base => {
                items.push(hoist_media(parse_inline(text), Block::paragraph));
                i += 1;
            }
            _ => break,
        }
    }

    let items = items.into_iter().map(Block::ListItem).collect();
    let list = match kind {
        ListKind::Bullet => Block::BulletList(items),
        ListKind::Ordered => Block::OrderedList(items),
    };
    (list, i)
}

/// Whether the line at `i` would be claimed by a matcher other than the
/// paragraph fallback.
fn starts_other_block(lines: &[&str], i: usize) -> bool {
    let trimmed = lines[i].trim();
    trimmed.starts_with(CODE_FENCE)
        || panel_opener(trimmed).is_some()
        || trimmed.starts_with(EXPAND_FENCE)
        || table_starts_at(lines, i)
        || heading(trimmed).is_some()
        || is_rule(trimmed)
        || trimmed.starts_with('>')
        || list_item(trimmed).is_some()
}

fn parse_paragraph(lines: &[&str], start: usize) -> (Vec<Block>, usize) {
    let mut parts = vec![lines[start].trim()];
    let mut i = start + 1;
    while i < lines.len() && !lines[i].trim().is_empty() && !starts_other_block(lines, i) {
        parts.push(lines[i].trim());
        i += 1;
    }
    (hoist_media(parse_inline(&parts.join(" ")), Block::paragraph), i)
}

/// Wrap inline content in textblocks built by `wrap`, moving every media
/// node into its own `mediaSingle` block. Always yields at least one block.
fn hoist_media(inlines: Vec<Inline>, wrap: impl Fn(Vec<Inline>) -> Block) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut run = Vec::new();

    for inline in inlines {
        match inline {
            Inline::Media(media) => {
                if !is_blank_run(&run) {
                    blocks.push(wrap(std::mem::take(&mut run)));
                }
                run.clear();
                blocks.push(Block::MediaSingle(MediaSingle { media }));
            }
            other => run.push(other),
        }
    }

    if blocks.is_empty() || !is_blank_run(&run) {
        blocks.push(wrap(run));
    }
    blocks
}

fn is_blank_run(run: &[Inline]) -> bool {
    run.iter().all(|inline| match inline {
        Inline::Text(text) => text.is_plain() && text.text.trim().is_empty(),
        _ => false,
    })
}
