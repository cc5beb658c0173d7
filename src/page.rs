//! Page corpus types supplied by the site generator.

use crate::error::Result;
use crate::search::normalize::source_span;
use crate::search::normalize_string;
use crate::search::tokenize::{contains_cjk, contains_cyrillic};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Script flags used to route a page into the extra partitions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Charsets {
    #[serde(default)]
    pub cyrillic: bool,
    #[serde(default)]
    pub cjk: bool,
}

impl Charsets {
    /// Detect which scripts occur in `text`.
    pub fn detect(text: &str) -> Self {
        Self {
            cyrillic: contains_cyrillic(text),
            cjk: contains_cjk(text),
        }
    }
}

/// The subset of page frontmatter the search layer cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frontmatter {
    /// `search: false` opts a page out of every index.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<bool>,
}

impl Frontmatter {
    pub const fn is_searchable(&self) -> bool {
        !matches!(self.search, Some(false))
    }
}

/// A section heading inside a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "HeaderRecord")]
pub struct Header {
    /// Nesting depth, 1-6. Consecutive headers may skip levels.
    pub level: u8,
    pub title: String,
    pub normalized_title: String,
    /// Anchor, unique within the page.
    pub slug: String,
    /// Char offset into the page content where this section begins.
    pub char_index: Option<usize>,
}

impl Header {
    pub fn new(level: u8, title: impl Into<String>, slug: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            level,
            normalized_title: normalize_string(&title),
            title,
            slug: slug.into(),
            char_index: None,
        }
    }

    pub fn at(mut self, char_index: usize) -> Self {
        self.char_index = Some(char_index);
        self
    }

    /// Maps a `[start, length]` char span of `normalized_title` onto `title`.
    pub fn title_span(&self, start: usize, length: usize) -> [usize; 2] {
        source_span(&self.title, &self.normalized_title, start, length)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct HeaderRecord {
    level: u8,
    #[serde(default)]
    title: String,
    #[serde(default)]
    normalized_title: Option<String>,
    #[serde(default)]
    slug: String,
    #[serde(default)]
    char_index: Option<usize>,
}

impl From<HeaderRecord> for Header {
    fn from(record: HeaderRecord) -> Self {
        let normalized_title = record
            .normalized_title
            .unwrap_or_else(|| normalize_string(&record.title));
        Self {
            level: record.level,
            title: record.title,
            normalized_title,
            slug: record.slug,
            char_index: record.char_index,
        }
    }
}

/// One searchable document. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "PageRecord")]
pub struct Page {
    /// Unique key, e.g. `/guide/install.html`.
    pub path: String,
    pub title: String,
    pub headers: Vec<Header>,
    /// Header titles joined for the `headersStr` field.
    pub headers_str: String,
    /// Plain text with markup already stripped.
    pub content: String,
    pub normalized_content: String,
    pub charsets: Charsets,
    pub frontmatter: Frontmatter,
}

impl Page {
    pub fn new(
        path: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        let content = content.into();
        Self {
            path: path.into(),
            title: title.into(),
            headers: Vec::new(),
            headers_str: String::new(),
            normalized_content: normalize_string(&content),
            charsets: Charsets::detect(&content),
            content,
            frontmatter: Frontmatter::default(),
        }
    }

    pub fn with_headers(mut self, headers: Vec<Header>) -> Self {
        self.headers_str = join_header_titles(&headers);
        self.headers = headers;
        self
    }

    pub fn with_frontmatter(mut self, frontmatter: Frontmatter) -> Self {
        self.frontmatter = frontmatter;
        self
    }

    pub const fn is_searchable(&self) -> bool {
        self.frontmatter.is_searchable()
    }

    /// Maps a `[start, length]` char span of `normalized_content` onto `content`.
    pub fn content_span(&self, start: usize, length: usize) -> [usize; 2] {
        source_span(&self.content, &self.normalized_content, start, length)
    }
}

fn join_header_titles(headers: &[Header]) -> String {
    headers
        .iter()
        .map(|h| h.title.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Page as emitted by the site generator; derived fields may be absent.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageRecord {
    path: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    headers: Vec<Header>,
    #[serde(default)]
    headers_str: Option<String>,
    #[serde(default)]
    content: String,
    #[serde(default)]
    normalized_content: Option<String>,
    #[serde(default)]
    charsets: Option<Charsets>,
    #[serde(default)]
    frontmatter: Option<Frontmatter>,
}

impl From<PageRecord> for Page {
    fn from(record: PageRecord) -> Self {
        let headers_str = record
            .headers_str
            .unwrap_or_else(|| join_header_titles(&record.headers));
        let normalized_content = record
            .normalized_content
            .unwrap_or_else(|| normalize_string(&record.content));
        let charsets = record
            .charsets
            .unwrap_or_else(|| Charsets::detect(&record.content));
        Self {
            path: record.path,
            title: record.title,
            headers: record.headers,
            headers_str,
            content: record.content,
            normalized_content,
            charsets,
            frontmatter: record.frontmatter.unwrap_or_default(),
        }
    }
}

/// Parse a JSON array of page records.
pub fn load_pages_json(json: &str) -> Result<Vec<Page>> {
    serde_json::from_str(json).context("Failed to parse page corpus JSON")
}

/// Read a corpus file written by the site generator.
pub async fn read_pages_file(path: &Path) -> Result<Vec<Page>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read page corpus at {}", path.display()))?;
    load_pages_json(&content).with_context(|| format!("Invalid page corpus in {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;

    #[test]
    fn test_new_page_derives_fields() {
        let page = Page::new("/ru/", "Главная", "Привет, Мир");
        check!(page.normalized_content == "привет, мир");
        check!(page.charsets.cyrillic);
        check!(!page.charsets.cjk);
        check!(page.is_searchable());
    }

    #[test]
    fn test_with_headers_joins_titles() {
        let page = Page::new("/guide/", "Guide", "").with_headers(vec![
            Header::new(1, "Guide", "guide"),
            Header::new(2, "Install", "install"),
        ]);
        check!(page.headers_str == "Guide Install");
    }

    #[test]
    fn test_deserialize_fills_missing_derived_fields() {
        let json = r##"[{
            "path": "/guide/",
            "title": "Guide",
            "headers": [{"level": 2, "title": "Café Setup", "slug": "cafe-setup", "charIndex": 6}],
            "content": "Intro\nCafé Setup\n日本語",
            "frontmatter": {"search": false}
        }]"##;
        let pages = load_pages_json(json).unwrap();
        let page = &pages[0];
        check!(page.headers[0].normalized_title == "cafe setup");
        check!(page.headers[0].char_index == Some(6));
        check!(page.headers_str == "Café Setup");
        check!(page.normalized_content == "intro\ncafe setup\n日本語");
        check!(page.charsets.cjk);
        check!(!page.is_searchable());
    }

    #[test]
    fn test_deserialize_keeps_supplied_fields() {
        let json = r#"[{
            "path": "/",
            "title": "Home",
            "content": "Hello",
            "normalizedContent": "precomputed",
            "charsets": {"cyrillic": true}
        }]"#;
        let pages = load_pages_json(json).unwrap();
        check!(pages[0].normalized_content == "precomputed");
        check!(pages[0].charsets == Charsets { cyrillic: true, cjk: false });
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        check!(load_pages_json("{not json").is_err());
    }
}
