//! Locating where a query hits inside a page: a heading or the body text.

use crate::page::Page;

/// Where a term was found. Offsets and lengths count chars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    /// `None` for a body content match.
    pub header_index: Option<usize>,
    /// Offset into the header's normalized title, or into the normalized content.
    pub char_index: usize,
    pub term_length: usize,
}

impl Match {
    pub const fn is_header(&self) -> bool {
        self.header_index.is_some()
    }
}

/// Char offset of the first occurrence of `needle` in `haystack`.
pub(crate) fn char_find(haystack: &str, needle: &str) -> Option<usize> {
    haystack
        .find(needle)
        .map(|byte_index| haystack[..byte_index].chars().count())
}

/// First header whose normalized title contains `term`.
pub fn header_match(page: &Page, term: &str) -> Option<Match> {
    page.headers.iter().enumerate().find_map(|(i, header)| {
        char_find(&header.normalized_title, term).map(|char_index| Match {
            header_index: Some(i),
            char_index,
            term_length: term.chars().count(),
        })
    })
}

pub fn content_match(page: &Page, term: &str) -> Option<Match> {
    if page.normalized_content.is_empty() {
        return None;
    }
    char_find(&page.normalized_content, term).map(|char_index| Match {
        header_index: None,
        char_index,
        term_length: term.chars().count(),
    })
}

/// Picks the match used to build a result's heading and snippet.
///
/// Each term is looked up in the headers first, then in the content. When
/// every term only hit headers, a header hit of the whole query is preferred;
/// otherwise a content hit of the whole query is. Falls back to the first
/// term hit of the same kind, so scattered terms still surface.
pub fn locate(page: &Page, normalized_query: &str, terms: &[String]) -> Option<Match> {
    let matches: Vec<Match> = terms
        .iter()
        .filter(|term| !term.is_empty())
        .filter_map(|term| header_match(page, term).or_else(|| content_match(page, term)))
        .collect();

    let first = *matches.first()?;

    if matches.iter().all(Match::is_header) {
        let phrase = non_empty(normalized_query).and_then(|q| header_match(page, q));
        return Some(phrase.unwrap_or(first));
    }

    non_empty(normalized_query)
        .and_then(|q| content_match(page, q))
        .or_else(|| matches.iter().find(|m| !m.is_header()).copied())
}

fn non_empty(s: &str) -> Option<&str> {
    (!s.is_empty()).then_some(s)
}
