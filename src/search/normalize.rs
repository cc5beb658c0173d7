//! Canonical text form shared by the index, the match locator and the UI.
//!
//! Normalizing changes the length of the text: leading whitespace is trimmed,
//! Hangul syllables decompose into jamo, and some kana keep a separate
//! voicing mark. [`NormalizedText`] records where every normalized char came
//! from so spans found in the normalized text can be shown on the original.

use unicode_normalization::char::{canonical_combining_class, decompose_canonical};

/// Combining Diacritical Marks block, removed after canonical decomposition.
const COMBINING_MARKS: std::ops::RangeInclusive<char> = '\u{0300}'..='\u{036f}';

/// Trims, lowercases and strips accents: `"  Café "` → `"cafe"`.
///
/// Idempotent, so callers may normalize user input before handing it to
/// the index without changing what it matches.
pub fn normalize_string(text: &str) -> String {
    NormalizedText::new(text).into_string()
}

/// Normalized text plus a char-level map back to its source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText {
    text: String,
    /// Source char offset of each normalized char
    origins: Vec<usize>,
    /// Source char offset just past each normalized char, including any
    /// stripped marks that followed it
    ends: Vec<usize>,
    source_len: usize,
}

impl NormalizedText {
    pub fn new(source: &str) -> Self {
        // Lowercase and fully decompose char by char, remembering the source offset
        let mut pieces: Vec<(char, usize)> = Vec::with_capacity(source.len());
        let mut source_len = 0;
        for (offset, c) in source.chars().enumerate() {
            for lower in c.to_lowercase() {
                decompose_canonical(lower, |d| pieces.push((d, offset)));
            }
            source_len = offset + 1;
        }
        canonical_order(&mut pieces);

        let mut kept: Vec<(char, usize, usize)> = Vec::with_capacity(pieces.len());
        for (c, origin) in pieces {
            if COMBINING_MARKS.contains(&c) {
                if let Some(last) = kept.last_mut() {
                    last.2 = last.2.max(origin + 1);
                }
                continue;
            }
            kept.push((c, origin, origin + 1));
        }

        let lead = kept.iter().take_while(|(c, ..)| c.is_whitespace()).count();
        let trail = kept[lead..]
            .iter()
            .rev()
            .take_while(|(c, ..)| c.is_whitespace())
            .count();
        let kept = &kept[lead..kept.len() - trail];

        Self {
            text: kept.iter().map(|(c, ..)| *c).collect(),
            origins: kept.iter().map(|(_, origin, _)| *origin).collect(),
            ends: kept.iter().map(|(.., end)| *end).collect(),
            source_len,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }

    /// Maps a `[start, length]` char span of the normalized text onto the
    /// source. A start past the end maps to an empty span at the source end.
    pub fn source_span(&self, start: usize, length: usize) -> [usize; 2] {
        if start >= self.origins.len() {
            return [self.source_len, 0];
        }
        let end = start + length.clamp(1, self.origins.len() - start);

        let from = self.origins[start..end]
            .iter()
            .copied()
            .min()
            .unwrap_or(self.origins[start]);
        if length == 0 {
            return [from, 0];
        }
        let to = self.ends[start..end]
            .iter()
            .copied()
            .max()
            .unwrap_or(from);
        [from, to - from]
    }
}

/// Stable-sorts every run of combining marks by combining class, which is
/// the reordering step of NFD.
fn canonical_order(pieces: &mut [(char, usize)]) {
    let mut i = 0;
    while i < pieces.len() {
        if canonical_combining_class(pieces[i].0) == 0 {
            i += 1;
            continue;
        }
        let run = pieces[i..]
            .iter()
            .take_while(|(c, _)| canonical_combining_class(*c) != 0)
            .count();
        pieces[i..i + run].sort_by_key(|(c, _)| canonical_combining_class(*c));
        i += run;
    }
}

/// Maps a span of `normalized` onto `source`.
///
/// `normalized` is usually derived from `source`; when it was supplied
/// separately and no longer matches, the span is only clamped to `source`.
pub(crate) fn source_span(
    source: &str,
    normalized: &str,
    start: usize,
    length: usize,
) -> [usize; 2] {
    let mapped = NormalizedText::new(source);
    if mapped.as_str() == normalized {
        return mapped.source_span(start, length);
    }

    let source_len = source.chars().count();
    let start = start.min(source_len);
    [start, length.min(source_len - start)]
}
