//! Inline parsing (text span → text/media leaves).
//!
//! At each cursor position the patterns below are tried in a fixed order and
//! the first match is consumed. Delimiters collide (`*` opens both bold and
//! italic), so the order is part of the grammar:
//!
//! | # | Syntax                                  | Result                          |
//! |---|-----------------------------------------|---------------------------------|
//! | 1 | `` `code` ``                            | text with the sole `code` mark  |
//! | 2 | `[text](url)`                           | text with the sole `link` mark  |
//! | 3 | `!media[id]`, `!media[collection:id]`   | media node                      |
//! | 4 | `**t**`, `__t__`                        | `t` parsed, `strong` composed   |
//! | 5 | `~~t~~`                                 | `t` parsed, `strike` composed   |
//! | 6 | `*t*`, `_t_`                            | `t` parsed, `em` composed       |
//! | 7 | anything else                           | plain run up to next special    |
//!
//! Emphasis spans must not start or end with whitespace, so `2 * 3 * 4`
//! stays plain text.

use super::marks::add_mark;
use crate::adf::{Inline, Mark, Media};
use once_cell::sync::Lazy;
use regex::Regex;

/// Characters that may open an inline construct.
const SPECIAL_CHARS: [char; 6] = ['`', '[', '*', '_', '~', '!'];

static CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^`([^`]+)`").expect("valid code pattern"));
static LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[([^\]]+)\]\(([^)\s]+)\)").expect("valid link pattern"));
static MEDIA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^!media\[([^\]]+)\]").expect("valid media pattern"));
static BOLD_STAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^\*\*(\S(?:.*?\S)??)\*\*").expect("valid bold pattern"));
static BOLD_UNDERSCORE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^__(\S(?:.*?\S)??)__").expect("valid bold pattern"));
static STRIKE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^~~(\S(?:.*?\S)??)~~").expect("valid strike pattern"));
static ITALIC_STAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^\*(\S(?:.*?\S)??)\*").expect("valid italic pattern"));
static ITALIC_UNDERSCORE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^_(\S(?:.*?\S)??)_").expect("valid italic pattern"));

/// Parse a span of text into inline nodes.
///
/// Never fails; an empty span yields no nodes.
pub fn parse_inline(text: &str) -> Vec<Inline> {
    let mut nodes = Vec::new();
    let mut pos = 0;

    while pos < text.len() {
        let rest = &text[pos..];
        match match_construct(rest) {
            Some((consumed, parsed)) => {
                nodes.extend(parsed);
                pos += consumed;
            }
            None => {
                let end = plain_run_end(rest);
                push_plain(&mut nodes, &rest[..end]);
                pos += end;
            }
        }
    }

    nodes
}

/// Try every construct at the start of `rest`, in priority order.
///
/// Returns the number of bytes consumed and the nodes produced.
fn match_construct(rest: &str) -> Option<(usize, Vec<Inline>)> {
    if let Some(caps) = CODE.captures(rest) {
        let node = Inline::marked(&caps[1], vec![Mark::Code]);
        return Some((caps[0].len(), vec![node]));
    }

    if let Some(caps) = LINK.captures(rest) {
        let node = Inline::marked(&caps[1], vec![Mark::link(&caps[2])]);
        return Some((caps[0].len(), vec![node]));
    }

    if let Some(caps) = MEDIA.captures(rest) {
        if let Some(media) = media_ref(&caps[1]) {
            return Some((caps[0].len(), vec![Inline::Media(media)]));
        }
    }

    let decorations: [(&Regex, Mark); 5] = [
        (&*BOLD_STAR, Mark::Strong),
        (&*BOLD_UNDERSCORE, Mark::Strong),
        (&*STRIKE, Mark::Strike),
        (&*ITALIC_STAR, Mark::Em),
        (&*ITALIC_UNDERSCORE, Mark::Em),
    ];
    for (pattern, mark) in decorations {
        if let Some(caps) = pattern.captures(rest) {
            let inner = parse_inline(&caps[1]);
            return Some((caps[0].len(), add_mark(inner, mark)));
        }
    }

    None
}

/// `id` or `collection:id`. A reference without an id is not media.
fn media_ref(reference: &str) -> Option<Media> {
    let (collection, id) = match reference.split_once(':') {
        Some((collection, id)) => (collection.trim(), id.trim()),
        None => ("", reference.trim()),
    };
    if id.is_empty() {
        return None;
    }
    Some(Media {
        id: id.to_string(),
        collection: (!collection.is_empty()).then(|| collection.to_string()),
    })
}

/// Byte length of the plain run at the start of `rest`: always at least one
/// character, then up to (not including) the next special character.
fn plain_run_end(rest: &str) -> usize {
    let first = rest.chars().next().map_or(0, char::len_utf8);
    rest[first..]
        .find(&SPECIAL_CHARS[..])
        .map_or(rest.len(), |offset| first + offset)
}

/// Append plain text, coalescing with a preceding unmarked text node.
fn push_plain(nodes: &mut Vec<Inline>, run: &str) {
    if let Some(Inline::Text(last)) = nodes.last_mut() {
        if last.is_plain() {
            last.text.push_str(run);
            return;
        }
    }
    nodes.push(Inline::text(run));
}
