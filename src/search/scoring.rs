//! Result prioritization and deduplication.
//!
//! Each enriched result gets a priority from how the raw query string sits in
//! its snippet text. Lower is better; 0 means no pattern matched, which is
//! also what header-only results (no snippet) get.

use super::enrich::EnrichedResult;
use ahash::AHashSet;
use regex::Regex;

/// The five structural tiers, most to least specific.
struct TierPatterns {
    tiers: [Regex; 5],
}

impl TierPatterns {
    fn new(term: &str, case_insensitive: bool) -> Result<Self, regex::Error> {
        let flags = if case_insensitive { "(?i)" } else { "" };
        let t = regex::escape(term);
        let compile = |body: String| Regex::new(&format!("{}{}", flags, body));
        Ok(Self {
            tiers: [
                // Full: bounded by whitespace/punctuation or the string edges
                compile(format!(r"(?:^|\s){}(?:[.,\s]|$)", t))?,
                // Leading boundary
                compile(format!(r"(?:^|\s){}", t))?,
                // Trailing boundary
                compile(format!(r"{}(?:[.,\s]|$)", t))?,
                // Within 3 characters of other text
                compile(format!(r".{{0,3}}{}.{{0,3}}", t))?,
                // Word boundary
                compile(format!(r"\b{}\b", t))?,
            ],
        })
    }

    /// Index of the first tier matching `text`.
    fn first_match(&self, text: &str) -> Option<usize> {
        self.tiers.iter().position(|re| re.is_match(text))
    }
}

/// Compiled patterns for one query term.
pub struct Ranker {
    insensitive: TierPatterns,
    exact_case: TierPatterns,
}

impl Ranker {
    pub fn new(term: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            insensitive: TierPatterns::new(term, true)?,
            exact_case: TierPatterns::new(term, false)?,
        })
    }

    /// Priority of `content` for this term:
    /// - 1/2: full match (exact case / any case)
    /// - 3/4: leading boundary
    /// - 5/6: trailing boundary
    /// - 7/8: within 3 characters of other text
    /// - 9/10: word boundary
    /// - 0: no match
    ///
    /// The case-insensitive tiers classify first and an exact-case hit then
    /// overrides, so exact case always beats its insensitive counterpart.
    pub fn priority(&self, content: &str) -> u8 {
        let mut priority = 0;
        if let Some(tier) = self.insensitive.first_match(content) {
            priority = tier as u8 * 2 + 2;
        }
        if let Some(tier) = self.exact_case.first_match(content) {
            priority = tier as u8 * 2 + 1;
        }
        priority
    }
}

/// Assigns priorities, sorts ascending (stable) and keeps the first result per path.
pub fn rank_results(mut results: Vec<EnrichedResult>, term: &str) -> Vec<EnrichedResult> {
    match Ranker::new(term) {
        Ok(ranker) => {
            for result in &mut results {
                result.priority = ranker.priority(result.content_str.as_deref().unwrap_or(""));
            }
        }
        Err(e) => {
            tracing::warn!("Cannot rank results for '{}': {}", term, e);
            for result in &mut results {
                result.priority = 0;
            }
        }
    }

    results.sort_by_key(|r| r.priority);
    dedup_by_path(results)
}

/// Drops every result whose path already appeared earlier in the list.
pub fn dedup_by_path(results: Vec<EnrichedResult>) -> Vec<EnrichedResult> {
    let mut seen = AHashSet::with_capacity(results.len());
    results
        .into_iter()
        .filter(|r| seen.insert(r.path.clone()))
        .collect()
}
