//! Script-aware tokenization and term accumulation for the partition indexes.

use super::index::FieldIndex;
use super::normalize_string;
use crate::error::SearchError;
use ahash::AHashMap;
use regex::Regex;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Default word-boundary pattern: runs of non-ASCII-word characters.
///
/// Cyrillic and CJK text falls entirely into the separator class here,
/// which is why those scripts get their own partitions.
pub const DEFAULT_SPLIT: &str = r"[^0-9A-Za-z_]+";

/// Whitespace runs, used by the Cyrillic partition.
const WHITESPACE_SPLIT: &str = r"\s+";

/// Hangul jamo and syllables, CJK unified ideographs (with extension A,
/// compatibility ideographs and the supplementary-plane extensions), Hiragana
/// and Katakana. Every match is a single character.
static CJK_CHAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"[\x{3131}-\x{314e}\x{314f}-\x{3163}\x{ac00}-\x{d7a3}]",
        r"|[\x{4E00}-\x{9FCC}\x{3400}-\x{4DB5}\x{FA0E}\x{FA0F}\x{FA11}\x{FA13}\x{FA14}\x{FA1F}",
        r"\x{FA21}\x{FA23}\x{FA24}\x{FA27}-\x{FA29}]",
        r"|[\x{20000}-\x{2A6D6}\x{2A700}-\x{2B734}\x{2B740}-\x{2B81D}]",
        r"|[\x{3041}-\x{3096}]",
        r"|[\x{30A1}-\x{30FA}]",
    ))
    .expect("CJK character pattern is valid")
});

static CYRILLIC_CHAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\x{0400}-\x{04FF}]").expect("Cyrillic pattern is valid"));

pub(crate) fn contains_cjk(text: &str) -> bool {
    CJK_CHAR.is_match(text)
}

pub(crate) fn contains_cyrillic(text: &str) -> bool {
    CYRILLIC_CHAR.is_match(text)
}

/// How text is folded before it is split into words.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "EncodingName", into = "EncodingName")]
pub enum Encoding {
    /// Text is indexed exactly as written (`false` in configuration).
    None,
    /// Lowercase only.
    Icase,
    /// Lowercase plus accent stripping, see [`normalize_string`].
    #[default]
    Simple,
}

impl Encoding {
    fn apply(self, text: &str) -> String {
        match self {
            Self::None => text.to_owned(),
            Self::Icase => text.to_lowercase(),
            Self::Simple => normalize_string(text),
        }
    }
}

/// Configuration form of [`Encoding`]: either `false` or a name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum EncodingName {
    Flag(bool),
    Name(String),
}

impl TryFrom<EncodingName> for Encoding {
    type Error = String;

    fn try_from(value: EncodingName) -> Result<Self, Self::Error> {
        match value {
            EncodingName::Flag(false) => Ok(Self::None),
            EncodingName::Flag(true) => Ok(Self::default()),
            EncodingName::Name(name) => match name.as_str() {
                "none" | "false" => Ok(Self::None),
                "icase" => Ok(Self::Icase),
                "simple" => Ok(Self::Simple),
                other => Err(format!(
                    "unknown encoding '{}', expected one of: false, icase, simple",
                    other
                )),
            },
        }
    }
}

impl From<Encoding> for EncodingName {
    fn from(value: Encoding) -> Self {
        match value {
            Encoding::None => Self::Flag(false),
            Encoding::Icase => Self::Name("icase".to_string()),
            Encoding::Simple => Self::Name("simple".to_string()),
        }
    }
}

/// Which fragments of each word are written to the index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenizeMode {
    /// Whole words only.
    Strict,
    /// Every prefix, so partially typed words match.
    #[default]
    Forward,
    /// Every prefix and every suffix.
    Reverse,
    /// Every substring.
    Full,
}

impl TokenizeMode {
    fn expand(self, word: &str, out: &mut Vec<String>) {
        if word.is_empty() {
            return;
        }
        let bounds: Vec<usize> = word
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(word.len()))
            .collect();
        let last = bounds.len() - 1;

        match self {
            Self::Strict => out.push(word.to_owned()),
            Self::Forward => out.extend(bounds[1..].iter().map(|&end| word[..end].to_owned())),
            Self::Reverse => {
                out.extend(bounds[1..].iter().map(|&end| word[..end].to_owned()));
                // The full word is already present as the longest prefix.
                out.extend(bounds[1..last].iter().map(|&start| word[start..].to_owned()));
            }
            Self::Full => {
                for (i, &start) in bounds[..last].iter().enumerate() {
                    out.extend(bounds[i + 1..].iter().map(|&end| word[start..end].to_owned()));
                }
            }
        }
    }
}

/// Tokenizer for one partition, fixed when the partition is built.
#[derive(Debug, Clone)]
pub(crate) enum Tokenizer {
    Default {
        encoding: Encoding,
        mode: TokenizeMode,
        split: Regex,
    },
    /// Case-insensitive, whitespace-separated, forward prefixes.
    Cyrillic { split: Regex },
    /// One token per CJK character, no encoding.
    Cjk,
}

impl Tokenizer {
    pub(crate) fn default_script(
        encoding: Encoding,
        mode: TokenizeMode,
        split: &str,
    ) -> Result<Self, SearchError> {
        let split = Regex::new(split).map_err(|source| SearchError::InvalidSplitPattern {
            pattern: split.to_string(),
            source,
        })?;
        Ok(Self::Default {
            encoding,
            mode,
            split,
        })
    }

    pub(crate) fn cyrillic() -> Self {
        Self::Cyrillic {
            split: Regex::new(WHITESPACE_SPLIT).expect("whitespace pattern is valid"),
        }
    }

    /// Encoded words in order, before mode expansion.
    pub(crate) fn words(&self, text: &str) -> Vec<String> {
        match self {
            Self::Default {
                encoding, split, ..
            } => split_words(&encoding.apply(text), split),
            Self::Cyrillic { split } => split_words(&Encoding::Icase.apply(text), split),
            Self::Cjk => CJK_CHAR
                .find_iter(text)
                .map(|m| m.as_str().to_owned())
                .collect(),
        }
    }

    /// Tokens written to the index for `text`.
    pub(crate) fn index_tokens(&self, text: &str) -> Vec<String> {
        let mode = match self {
            Self::Default { mode, .. } => *mode,
            Self::Cyrillic { .. } => TokenizeMode::Forward,
            Self::Cjk => TokenizeMode::Strict,
        };

        let mut tokens = vec![];
        for word in self.words(text) {
            mode.expand(&word, &mut tokens);
        }
        tokens
    }

    /// Distinct tokens looked up for a query. Prefixes are already in the
    /// index, so query words are used whole.
    pub(crate) fn query_tokens(&self, query: &str) -> Vec<String> {
        let mut tokens = self.words(query);
        let mut seen = ahash::AHashSet::with_capacity(tokens.len());
        tokens.retain(|t| seen.insert(t.clone()));
        tokens
    }
}

fn split_words(text: &str, split: &Regex) -> Vec<String> {
    split
        .split(text)
        .filter(|w| !w.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Builder for accumulating term frequencies of one field before TF-IDF finalization.
#[derive(Default)]
pub(crate) struct TermBuilder {
    /// Flat map from (term, page slot) → raw term count
    term_docs: AHashMap<(String, usize), f32>,
    /// Map from page slot to document length (token count for normalization)
    doc_lengths: AHashMap<usize, usize>,
}

impl TermBuilder {
    /// Tokenizes `text` and records every token for the page in `slot`.
    pub(crate) fn add_terms(&mut self, text: &str, slot: usize, tokenizer: &Tokenizer) {
        let tokens = tokenizer.index_tokens(text);
        if tokens.is_empty() {
            return;
        }

        *self.doc_lengths.entry(slot).or_insert(0) += tokens.len();
        for token in tokens {
            *self.term_docs.entry((token, slot)).or_insert(0.0) += 1.0;
        }
    }

    /// Calculates IDF scores and produces the final field index.
    ///
    /// Score = ln(1 + tf_normalized) * ln(1 + total_docs / doc_freq), where
    /// tf_normalized divides the count by the document length relative to the average.
    pub(crate) fn finalize(self) -> FieldIndex {
        let total_docs = self.doc_lengths.len() as f32;
        let total_length: usize = self.doc_lengths.values().sum();
        let avg_doc_length = if self.doc_lengths.is_empty() {
            1.0
        } else {
            total_length as f32 / total_docs
        };

        let mut grouped: AHashMap<String, Vec<(usize, f32)>> = AHashMap::new();
        for ((term, slot), tf) in self.term_docs {
            grouped.entry(term).or_default().push((slot, tf));
        }

        let mut terms = AHashMap::with_capacity(grouped.len());
        for (term, doc_scores) in grouped {
            let idf = (1.0 + total_docs / doc_scores.len() as f32).ln();

            let mut scored: Vec<(usize, f32)> = doc_scores
                .into_iter()
                .map(|(slot, tf)| {
                    let doc_length = self.doc_lengths.get(&slot).copied().unwrap_or(1) as f32;
                    // Clamp to prevent over-penalizing long pages
                    let length_norm = (doc_length / avg_doc_length).max(0.5);
                    (slot, (1.0 + tf / length_norm).ln() * idf)
                })
                .collect();

            // Descending score, slot order on ties for deterministic output
            scored.sort_by(|(a_slot, a), (b_slot, b)| b.total_cmp(a).then(a_slot.cmp(b_slot)));
            terms.insert(term, scored);
        }

        FieldIndex::new(terms, self.doc_lengths.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use rstest::rstest;

    fn default_tokenizer(mode: TokenizeMode) -> Tokenizer {
        Tokenizer::default_script(Encoding::Simple, mode, DEFAULT_SPLIT).unwrap()
    }

    #[rstest]
    #[case(TokenizeMode::Strict, "cat", &["cat"])]
    #[case(TokenizeMode::Forward, "cat", &["c", "ca", "cat"])]
    #[case(TokenizeMode::Reverse, "cat", &["c", "ca", "cat", "at", "t"])]
    #[case(TokenizeMode::Full, "cat", &["c", "ca", "cat", "a", "at", "t"])]
    #[case(TokenizeMode::Forward, "ёж", &["ё", "ёж"])]
    fn test_mode_expansion(
        #[case] mode: TokenizeMode,
        #[case] word: &str,
        #[case] expected: &[&str],
    ) {
        let mut out = vec![];
        mode.expand(word, &mut out);
        check!(out == expected);
    }

    #[test]
    fn test_default_split_matches_ascii_word_boundaries() {
        let tokenizer = default_tokenizer(TokenizeMode::Strict);
        check!(
            tokenizer.words("Hello, World! snake_case café")
                == ["hello", "world", "snake_case", "cafe"]
        );
        // Cyrillic is a separator for the default partition
        check!(tokenizer.words("Привет мир").is_empty());
    }

    #[test]
    fn test_encoding_applies_before_split() {
        let strict =
            Tokenizer::default_script(Encoding::None, TokenizeMode::Strict, DEFAULT_SPLIT)
                .unwrap();
        check!(strict.words("Café Menu") == ["Caf", "Menu"]);
        let icase =
            Tokenizer::default_script(Encoding::Icase, TokenizeMode::Strict, DEFAULT_SPLIT)
                .unwrap();
        check!(icase.words("Café Menu") == ["caf", "menu"]);
    }

    #[test]
    fn test_cyrillic_splits_on_whitespace_only() {
        let tokenizer = Tokenizer::cyrillic();
        check!(tokenizer.words("Привет,  Мир\nтест") == ["привет,", "мир", "тест"]);
        check!(tokenizer.index_tokens("Мир") == ["м", "ми", "мир"]);
    }

    #[test]
    fn test_cjk_emits_one_token_per_character() {
        let tokenizer = Tokenizer::Cjk;
        check!(
            tokenizer.words("日本語 text ひらがな") == ["日", "本", "語", "ひ", "ら", "が", "な"]
        );
        check!(tokenizer.words("한국 カタカナ") == ["한", "국", "カ", "タ", "カ", "ナ"]);
        check!(tokenizer.words("plain ascii").is_empty());
    }

    #[test]
    fn test_query_tokens_are_deduplicated() {
        let tokenizer = default_tokenizer(TokenizeMode::Forward);
        check!(tokenizer.query_tokens("Test test TEST data") == ["test", "data"]);
    }

    #[test]
    fn test_invalid_split_pattern_is_rejected() {
        let err = Tokenizer::default_script(Encoding::Simple, TokenizeMode::Forward, "[unclosed");
        check!(matches!(err, Err(SearchError::InvalidSplitPattern { .. })));
    }

    #[rstest]
    #[case("日本語のテキスト", true, false)]
    #[case("Привет", false, true)]
    #[case("plain text", false, false)]
    fn test_script_detection(#[case] text: &str, #[case] cjk: bool, #[case] cyrillic: bool) {
        check!(contains_cjk(text) == cjk);
        check!(contains_cyrillic(text) == cyrillic);
    }

    #[rstest]
    #[case("false", Encoding::None)]
    #[case("\"icase\"", Encoding::Icase)]
    #[case("\"simple\"", Encoding::Simple)]
    fn test_encoding_names(#[case] json: &str, #[case] expected: Encoding) {
        let parsed: Encoding = serde_json::from_str(json).unwrap();
        check!(parsed == expected);
    }

    #[test]
    fn test_unknown_encoding_is_rejected() {
        check!(serde_json::from_str::<Encoding>("\"advanced\"").is_err());
    }

    #[test]
    fn test_finalize_orders_by_score() {
        let tokenizer = default_tokenizer(TokenizeMode::Strict);
        let mut builder = TermBuilder::default();
        builder.add_terms("search search search", 0, &tokenizer);
        builder.add_terms("search index", 1, &tokenizer);
        builder.add_terms("index only", 2, &tokenizer);
        let field = builder.finalize();

        check!(field.document_count() == 3);
        let hits = field.search(&["search".to_string()], 10);
        let slots: Vec<usize> = hits.iter().map(|(slot, _)| *slot).collect();
        check!(slots == [0, 1]);
    }
}
