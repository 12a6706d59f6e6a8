//! Candidate scoring
//!
//! Two computations over one search response:
//!
//! - **Selection** ranks every candidate to pick the best one. Ties keep the
//!   first candidate, so the provider's own ranking breaks them.
//! - **Confidence** (0-100) is computed for the chosen candidate only and is
//!   compared against the adaptive threshold.
//!
//! Both are built from ordered tiers evaluated highest first:
//!
//! ```text
//!   acronym tiers        selection   confidence
//!   ─────────────        ─────────   ──────────
//!   Exact                1000        85
//!   Prefix                500        70
//!   Substring             200        50
//!   Shared(r)           r*100        min(r*40, 39)
//!
//!   text tiers
//!   ──────────
//!   Exact                1000        95
//!   Contains             1000        80
//!   Overlap(r)          r*500        r*60
//! ```
//!
//! Roman queries compare phonetically folded transliterations; Gurmukhi and
//! Devanagari queries compare matra-stripped Gurmukhi.

use gurbani_types::{SearchMode, VerseCandidate};

use crate::config::ScoringConfig;
use crate::normalize::{acronym_of_clean, clean, phonetic_fold, Query};

/// Acronyms shorter than this never contribute to confidence
pub const MIN_TRUSTED_ACRONYM: usize = 3;

/// Query words shorter than this are ignored for word overlap
const MIN_OVERLAP_WORD_CHARS: usize = 2;

// ============================================================================
// TIERS
// ============================================================================

/// How a candidate line's acronym relates to the query acronym
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AcronymTier {
    Exact,
    Prefix,
    Substring,
    /// Share of query-acronym letters that occur anywhere in the line acronym
    Shared(f64),
}

impl AcronymTier {
    pub fn classify(query_acronym: &str, line_acronym: &str) -> Self {
        if query_acronym.is_empty() {
            return AcronymTier::Shared(0.0);
        }
        if line_acronym == query_acronym {
            return AcronymTier::Exact;
        }
        if line_acronym.starts_with(query_acronym) {
            return AcronymTier::Prefix;
        }
        if line_acronym.contains(query_acronym) {
            return AcronymTier::Substring;
        }
        let total = query_acronym.chars().count();
        let shared = query_acronym
            .chars()
            .filter(|c| line_acronym.contains(*c))
            .count();
        AcronymTier::Shared(shared as f64 / total as f64)
    }

    pub fn selection_score(self) -> f64 {
        match self {
            AcronymTier::Exact => 1000.0,
            AcronymTier::Prefix => 500.0,
            AcronymTier::Substring => 200.0,
            AcronymTier::Shared(ratio) => ratio * 100.0,
        }
    }

    pub fn confidence(self) -> f64 {
        match self {
            AcronymTier::Exact => 85.0,
            AcronymTier::Prefix => 70.0,
            AcronymTier::Substring => 50.0,
            AcronymTier::Shared(ratio) => (ratio * 40.0).min(39.0),
        }
    }
}

/// How a candidate line's text relates to the full query text
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TextTier {
    Exact,
    Contains,
    /// Share of query words found inside the line
    Overlap(f64),
}

impl TextTier {
    pub fn selection_score(self) -> f64 {
        match self {
            TextTier::Exact | TextTier::Contains => 1000.0,
            TextTier::Overlap(ratio) => ratio * 500.0,
        }
    }

    pub fn confidence(self) -> f64 {
        match self {
            TextTier::Exact => 95.0,
            TextTier::Contains => 80.0,
            TextTier::Overlap(ratio) => ratio * 60.0,
        }
    }
}

// ============================================================================
// SCORER
// ============================================================================

/// Comparable forms of one candidate line
struct LineForms {
    /// Folded transliteration (Roman) or cleaned Gurmukhi
    text: String,
    /// Cleaned text before folding
    cleaned: String,
    acronym: String,
}

/// Query-side forms computed once per query
#[derive(Debug, Clone)]
pub struct Scorer {
    gurmukhi: bool,
    normalized: String,
    /// Folded (Roman) or cleaned (Gurmukhi) whole query
    text: String,
    /// Comparable forms of words long enough to count for overlap
    words: Vec<String>,
    acronym: String,
}

impl Scorer {
    pub fn new(query: &Query) -> Self {
        let gurmukhi = query.script().compares_gurmukhi();
        let normalized = query.normalized().to_string();
        // folding reads the unclean text so long vowels still fold
        let source = if gurmukhi {
            normalized.as_str()
        } else {
            query.search_text()
        };
        let text = if gurmukhi {
            normalized.clone()
        } else {
            phonetic_fold(source)
        };
        let words = source
            .split_whitespace()
            .filter(|w| w.chars().count() >= MIN_OVERLAP_WORD_CHARS)
            .map(|w| if gurmukhi { w.to_string() } else { phonetic_fold(w) })
            .filter(|w| !w.is_empty())
            .collect();

        Self {
            gurmukhi,
            normalized,
            text,
            words,
            acronym: query.acronym().to_string(),
        }
    }

    fn line_forms(&self, candidate: &VerseCandidate) -> LineForms {
        let source = if self.gurmukhi {
            &candidate.gurmukhi
        } else {
            &candidate.transliteration
        };
        let cleaned = clean(source);
        let text = if self.gurmukhi {
            cleaned.clone()
        } else {
            phonetic_fold(source)
        };
        LineForms {
            acronym: line_acronym(&cleaned),
            text,
            cleaned,
        }
    }

    fn acronym_tier(&self, line: &LineForms) -> AcronymTier {
        AcronymTier::classify(&self.acronym, &line.acronym)
    }

    fn text_tier(&self, line: &LineForms) -> TextTier {
        if !self.text.is_empty() && line.text == self.text {
            return TextTier::Exact;
        }
        if self.contains(line) {
            return TextTier::Contains;
        }
        if self.words.is_empty() {
            return TextTier::Overlap(0.0);
        }
        let found = self
            .words
            .iter()
            .filter(|w| line.text.contains(w.as_str()))
            .count();
        TextTier::Overlap(found as f64 / self.words.len() as f64)
    }

    fn contains(&self, line: &LineForms) -> bool {
        if self.text.is_empty() || line.text.is_empty() {
            return false;
        }
        if line.text.contains(&self.text) {
            return true;
        }
        if self.gurmukhi {
            // a transcript that runs past the line still names it
            return self.text.contains(&line.text);
        }
        // folding can merge letters across word edges; the cleaned text
        // still holds the literal query
        line.cleaned.contains(&self.normalized)
    }

    /// Selection score of one candidate under a search mode
    pub fn selection_score(&self, candidate: &VerseCandidate, mode: SearchMode) -> f64 {
        let line = self.line_forms(candidate);
        if mode.is_acronym() {
            self.acronym_tier(&line).selection_score()
        } else {
            self.text_tier(&line).selection_score()
        }
    }

    /// Index of the best candidate; the first one wins ties
    pub fn select_best(&self, candidates: &[VerseCandidate], mode: SearchMode) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (index, candidate) in candidates.iter().enumerate() {
            let score = self.selection_score(candidate, mode);
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((index, score));
            }
        }
        best.map(|(index, _)| index)
    }

    /// Confidence (0-100) for a chosen candidate.
    ///
    /// The acronym tier applies only when the query acronym is long enough
    /// to trust; the text tier only for full-text modes. The result is the
    /// larger of the tiers that apply.
    pub fn confidence(&self, candidate: &VerseCandidate, mode: SearchMode) -> u8 {
        let line = self.line_forms(candidate);
        let mut score: f64 = 0.0;
        if self.acronym.chars().count() >= MIN_TRUSTED_ACRONYM {
            score = score.max(self.acronym_tier(&line).confidence());
        }
        if !mode.is_acronym() {
            score = score.max(self.text_tier(&line).confidence());
        }
        score.round().clamp(0.0, 100.0) as u8
    }
}

/// First letters of a cleaned line, skipping verse-number tokens
fn line_acronym(cleaned: &str) -> String {
    let words: String = cleaned
        .split_whitespace()
        .filter(|w| !w.chars().all(|c| c.is_numeric()))
        .collect::<Vec<_>>()
        .join(" ");
    acronym_of_clean(&words)
}

/// Confidence a result must reach; longer utterances get a lower bar
pub fn threshold(config: &ScoringConfig, normalized_len: usize) -> u8 {
    if normalized_len > config.long_query_chars {
        config.long_query_threshold
    } else {
        config.short_query_threshold
    }
}
