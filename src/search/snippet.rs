//! Content excerpts around a match, with the highlight re-based onto the excerpt.

use super::locate::Match;
use crate::page::Page;

/// Longest excerpt taken from a line, in chars, before ellipses.
pub const SNIPPET_LENGTH: usize = 120;

const ELLIPSIS: &str = "...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet {
    pub content_str: String,
    /// `[start, length]` in chars within `content_str`.
    pub content_highlight: [usize; 2],
}

/// Cuts the line holding the match down to at most [`SNIPPET_LENGTH`] chars,
/// centered on the match, marking cut ends with `...`.
///
/// The match is located in the normalized content and mapped back onto the
/// original text before cutting. The line excludes its newline delimiters.
pub fn extract_snippet(page: &Page, matched: &Match) -> Snippet {
    snippet_at(page, page.content_span(matched.char_index, matched.term_length))
}

/// Snippet around a `[start, length]` span already in `page.content` chars.
pub(crate) fn snippet_at(page: &Page, [char_index, term_length]: [usize; 2]) -> Snippet {
    let chars: Vec<char> = page.content.chars().collect();
    let char_index = char_index.min(chars.len());

    let line_start = chars[..char_index]
        .iter()
        .rposition(|&c| c == '\n')
        .map_or(0, |i| i + 1);
    let line_end = chars[char_index..]
        .iter()
        .position(|&c| c == '\n')
        .map_or(chars.len(), |i| char_index + i);

    let line = &chars[line_start..line_end];
    let offset = char_index - line_start;

    if line.len() <= SNIPPET_LENGTH {
        return Snippet {
            content_str: line.iter().collect(),
            content_highlight: [offset, term_length],
        };
    }

    let lead = half_rounded(SNIPPET_LENGTH as i64 - term_length as i64);
    // A term longer than the budget would push the start past the match.
    let start = (offset as i64 - lead).clamp(0, offset as i64) as usize;
    let end = (start + SNIPPET_LENGTH).min(line.len());

    let mut content_str = String::with_capacity(SNIPPET_LENGTH + 2 * ELLIPSIS.len());
    let mut highlight_start = offset - start;
    if start > 0 {
        content_str.push_str(ELLIPSIS);
        highlight_start += ELLIPSIS.len();
    }
    content_str.extend(&line[start..end]);
    if end < line.len() {
        content_str.push_str(ELLIPSIS);
    }

    Snippet {
        content_str,
        content_highlight: [highlight_start, term_length],
    }
}

/// `n / 2` rounded half up: 119 → 60, -1 → 0.
const fn half_rounded(n: i64) -> i64 {
    n.div_euclid(2) + n.rem_euclid(2)
}
