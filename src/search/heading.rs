//! Breadcrumb headings: "Parent > Child > Section".

use super::locate::Match;
use crate::page::Page;

const SEPARATOR: &str = " > ";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Heading {
    pub heading_str: String,
    /// `[start, length]` in chars within `heading_str`, for header matches only.
    pub heading_highlight: Option<[usize; 2]>,
}

/// Builds the breadcrumb for `header_index`, or the page title when there is none.
///
/// Ancestors are found by walking back to the nearest earlier header one
/// level up, repeatedly, until a header has no such parent.
pub fn resolve_heading(
    page: &Page,
    header_index: Option<usize>,
    matched: Option<&Match>,
) -> Heading {
    let Some(index) = header_index.filter(|&i| i < page.headers.len()) else {
        return Heading {
            heading_str: page.title.clone(),
            heading_highlight: None,
        };
    };

    let mut path = vec![index];
    let mut current = index;
    while let Some(parent_level) = page.headers[current].level.checked_sub(1)
        && let Some(parent) = page.headers[..current]
            .iter()
            .rposition(|h| h.level == parent_level)
    {
        path.push(parent);
        current = parent;
    }
    path.reverse();

    let titles: Vec<&str> = path.iter().map(|&i| page.headers[i].title.as_str()).collect();
    let heading_str = titles.join(SEPARATOR);

    let heading_highlight = matched
        .filter(|m| m.header_index == Some(index))
        .map(|m| {
            let ancestors = &titles[..titles.len() - 1];
            let prefix_len: usize = ancestors.iter().map(|t| t.chars().count()).sum::<usize>()
                + ancestors.len() * SEPARATOR.len();
            // Match offsets count chars of the normalized title
            let [start, length] = page.headers[index].title_span(m.char_index, m.term_length);
            [start + prefix_len, length]
        });

    Heading {
        heading_str,
        heading_highlight,
    }
}
