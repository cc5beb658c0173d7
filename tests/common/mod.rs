//! Shared test fixtures and utilities for integration tests.
//!
//! # Available Fixtures
//!
//! - `guide_corpus`: The single-page `/guide/` site used by the end-to-end checks
//! - `docs_corpus`: A small multi-section site with headers, Cyrillic and CJK pages
//! - `docs_index`: `docs_corpus` built with default options
//!
//! [`TempWorkspace`] provides a temp directory for tests that load corpora or
//! config from disk.

use docsearch::{BuildOptions, Frontmatter, Header, IndexSet, Page};
use rstest::fixture;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary directory cleaned up on drop.
#[allow(dead_code)] // Methods used across different integration test crates
pub struct TempWorkspace {
    _temp: TempDir,
    root: PathBuf,
}

#[allow(dead_code)]
impl TempWorkspace {
    /// # Panics
    /// Panics if the temp directory cannot be created.
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let root = temp.path().to_path_buf();
        Self { _temp: temp, root }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Writes `content` to `path` relative to the workspace root and returns the full path.
    ///
    /// # Panics
    /// Panics if the file cannot be written.
    pub fn create_file(&self, path: &str, content: &str) -> PathBuf {
        let full_path = self.root.join(path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).unwrap_or_else(|e| {
                panic!("Failed to create parent directory for '{}': {}", path, e)
            });
        }
        std::fs::write(&full_path, content)
            .unwrap_or_else(|e| panic!("Failed to write file '{}': {}", path, e));
        full_path
    }
}

impl Default for TempWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

/// Owned query words, as a caller's tokenizer would hand them over.
#[allow(dead_code)]
pub fn terms(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| (*w).to_string()).collect()
}

#[fixture]
pub fn guide_corpus() -> Vec<Page> {
    docsearch::tracing::init();
    vec![
        Page::new("/guide/", "Guide", "Guide\nThis is a test of search.")
            .with_headers(vec![Header::new(1, "Guide", "guide").at(0)]),
    ]
}

#[fixture]
pub fn docs_corpus() -> Vec<Page> {
    docsearch::tracing::init();
    vec![
        Page::new("/", "Home", "Welcome to the documentation site."),
        Page::new(
            "/guide/",
            "Guide",
            concat!(
                "Guide\nStart here.\n",
                "Installation\nRun the installer to set up the Widget.\n",
                "Configuration\nEdit the config file.",
            ),
        )
        .with_headers(vec![
            Header::new(1, "Guide", "guide").at(0),
            Header::new(2, "Installation", "installation").at(18),
            Header::new(2, "Configuration", "configuration").at(71),
        ]),
        Page::new(
            "/guide/advanced.html",
            "Advanced usage",
            "Tuning the widget cache for large sites.",
        ),
        Page::new("/api/", "API", "Reference for every widget method."),
        Page::new("/ru/", "Документация", "Поиск по страницам документации."),
        Page::new("/zh/", "文档", "搜索文档页面"),
        Page::new("/drafts/", "Drafts", "Unpublished widget notes")
            .with_frontmatter(Frontmatter { search: Some(false) }),
    ]
}

#[fixture]
pub fn docs_index(docs_corpus: Vec<Page>) -> IndexSet {
    IndexSet::build(docs_corpus, &BuildOptions::default()).expect("Failed to build index")
}
