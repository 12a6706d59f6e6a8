//! Continuation matching inside an already loaded composition
//!
//! While a composition is on screen, each new speech fragment is first
//! matched against the lines just ahead of the current one. No provider
//! call is made. The window starts at the current line and never wraps or
//! looks back.

use gurbani_types::{Composition, Script, Verse};

use crate::config::ContinuationConfig;
use crate::normalize::{acronym, clean, detect_script, phonetic_fold, Query};

/// Points for word overlap (scaled by the share of matched words)
const WORD_WEIGHT: f64 = 80.0;

/// Bonus when either acronym contains the other
const ACRONYM_BONUS: f64 = 20.0;

/// A line accepted as the continuation of the current one
#[derive(Debug, Clone, PartialEq)]
pub struct ContinuationMatch {
    /// Index into the composition's lines
    pub index: usize,
    pub verse_id: u32,
    pub confidence: u8,
}

#[derive(Debug, Clone)]
pub struct ContinuationMatcher {
    window: usize,
    accept_score: f64,
    soft_accept_score: f64,
}

impl Default for ContinuationMatcher {
    fn default() -> Self {
        Self::new(&ContinuationConfig::default())
    }
}

impl ContinuationMatcher {
    pub fn new(config: &ContinuationConfig) -> Self {
        Self {
            window: config.window,
            accept_score: config.accept_score,
            soft_accept_score: config.soft_accept_score,
        }
    }

    /// Line indices considered when the current line sits at `current`
    pub fn window(&self, current: usize, len: usize) -> std::ops::Range<usize> {
        let start = current.min(len);
        start..current.saturating_add(self.window).min(len)
    }

    /// First line in the forward window that the fragment continues into.
    ///
    /// An unknown `current_verse_id` starts the window at the first line.
    pub fn next_line(
        &self,
        composition: &Composition,
        current_verse_id: u32,
        fragment: &str,
    ) -> Option<ContinuationMatch> {
        let spoken = clean(fragment);
        if spoken.is_empty() {
            return None;
        }
        let spoken_acronym = acronym(fragment);
        let spoken_words: Vec<&str> = spoken.split_whitespace().collect();
        let gurmukhi = detect_script(&spoken) == Script::Native;

        let current = composition.position(current_verse_id).unwrap_or(0);
        for index in self.window(current, composition.lines.len()) {
            let line = &composition.lines[index];
            let source = if gurmukhi && !line.gurmukhi.is_empty() {
                &line.gurmukhi
            } else {
                &line.transliteration
            };
            let line_text = clean(source);
            let line_acronym = acronym(source);

            let matched = spoken_words
                .iter()
                .filter(|w| w.chars().count() > 1 && line_text.contains(*w))
                .count();
            let mut score = matched as f64 / spoken_words.len() as f64 * WORD_WEIGHT;
            if acronyms_overlap(&spoken_acronym, &line_acronym) {
                score += ACRONYM_BONUS;
            }

            if score >= self.accept_score || (matched > 0 && score >= self.soft_accept_score) {
                return Some(ContinuationMatch {
                    index,
                    verse_id: line.id,
                    confidence: score.round().min(100.0) as u8,
                });
            }
        }
        None
    }
}

fn acronyms_overlap(a: &str, b: &str) -> bool {
    !a.is_empty() && !b.is_empty() && (a.contains(b) || b.contains(a))
}

/// Index of the line sharing the most query words, for opening a whole
/// composition at the spoken line. Falls back to the first line; only a
/// strictly higher count replaces the current best.
pub fn locate_line(query: &Query, lines: &[Verse]) -> usize {
    let normalized = query.normalized();
    let gurmukhi = query.script().compares_gurmukhi();
    let min_chars = if normalized.chars().count() <= 5 { 1 } else { 2 };

    let words: Vec<String> = normalized
        .split_whitespace()
        .filter(|w| w.chars().count() >= min_chars)
        .map(|w| if gurmukhi { w.to_string() } else { phonetic_fold(w) })
        .filter(|w| !w.is_empty())
        .collect();
    if words.is_empty() {
        return 0;
    }

    let mut best = (0, 0);
    for (index, line) in lines.iter().enumerate() {
        let text = if gurmukhi {
            clean(&line.gurmukhi)
        } else {
            phonetic_fold(&line.transliteration)
        };
        let score = words.iter().filter(|w| text.contains(w.as_str())).count();
        if score > best.1 {
            best = (index, score);
        }
    }
    best.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use gurbani_types::CompositionRef;

    fn verse(id: u32, gurmukhi: &str, transliteration: &str) -> Verse {
        Verse {
            id,
            gurmukhi: gurmukhi.to_string(),
            transliteration: transliteration.to_string(),
            transliteration_hi: String::new(),
            translation: String::new(),
            composition_id: Some(1),
        }
    }

    fn numbered(n: u32) -> Composition {
        Composition {
            reference: CompositionRef::shabad(1),
            name: "Numbered".into(),
            lines: (0..n)
                .map(|i| verse(i, "", &format!("line{i}")))
                .collect(),
        }
    }

    fn shabad() -> Composition {
        Composition {
            reference: CompositionRef::shabad(1),
            name: "Fixture".into(),
            lines: vec![
                verse(10, "ਸੋ ਸਤਿਗੁਰੁ ਪਿਆਰਾ ਮੇਰੈ ਨਾਲਿ ਹੈ", "so satigur piaaraa merai naal hai"),
                verse(11, "ਜਿਥੈ ਕਿਥੈ ਮੈਨੋ ਲਏ ਛਡਾਈ", "jithai kithai maino le chhaddaaee"),
                verse(12, "ਤਿਸੁ ਗੁਰ ਕਉ ਹਉ ਸਦਾ ਘੁਮਾਇਆ", "tis gur kau hau sadaa ghumaaiaa"),
                verse(13, "ਥਿਰੁ ਘਰਿ ਬੈਸਹੁ ਹਰਿ ਜਨ ਪਿਆਰੇ", "thir ghar baisahu har jan piaare"),
            ],
        }
    }

    #[test]
    fn test_window_bounds() {
        let matcher = ContinuationMatcher::default();
        assert_eq!(matcher.window(0, 40), 0..15);
        assert_eq!(matcher.window(30, 40), 30..40);
        assert_eq!(matcher.window(39, 40), 39..40);
        assert_eq!(matcher.window(0, 3), 0..3);
    }

    #[test]
    fn test_never_looks_backward() {
        let composition = numbered(40);
        let matcher = ContinuationMatcher::default();
        // line 5 is behind the current line 20
        assert_eq!(matcher.next_line(&composition, 20, "line5"), None);
        // line 34 is the last one in the window
        let hit = matcher
            .next_line(&composition, 20, "line34")
            .unwrap();
        assert_eq!(hit.index, 34);
        // line 35 is outside it
        assert_eq!(matcher.next_line(&composition, 20, "line35"), None);
    }

    #[test]
    fn test_roman_continuation() {
        let matcher = ContinuationMatcher::default();
        let hit = matcher
            .next_line(&shabad(), 10, "tis gur kau hau sada")
            .unwrap();
        assert_eq!(hit.verse_id, 12);
        assert_eq!(hit.index, 2);
        assert!(hit.confidence >= 60);
    }

    #[test]
    fn test_gurmukhi_continuation_ignores_matras() {
        let matcher = ContinuationMatcher::default();
        let hit = matcher.next_line(&shabad(), 11, "ਥਿਰ ਘਰ ਬੈਸਹੁ").unwrap();
        assert_eq!(hit.verse_id, 13);
    }

    #[test]
    fn test_unknown_current_line_starts_at_top() {
        let matcher = ContinuationMatcher::default();
        let hit = matcher
            .next_line(&shabad(), 999, "so satigur piaara")
            .unwrap();
        assert_eq!(hit.index, 0);
    }

    #[test]
    fn test_soft_band_needs_a_real_word() {
        let matcher = ContinuationMatcher::default();
        assert_eq!(matcher.next_line(&shabad(), 10, "zzxq flkk"), None);
        assert_eq!(matcher.next_line(&shabad(), 10, "  "), None);
    }

    #[test]
    fn test_locate_line() {
        let lines = shabad().lines;
        assert_eq!(locate_line(&Query::text("thir ghar baiso"), &lines), 3);
        assert_eq!(locate_line(&Query::text("ਤਿਸੁ ਗੁਰ ਕਉ"), &lines), 2);
        // nothing overlaps: first line
        assert_eq!(locate_line(&Query::text("zzxq"), &lines), 0);
        assert_eq!(locate_line(&Query::text("japji sahib"), &lines), 0);
    }
}
