//! Text normalization for Gurbani matching
//!
//! Turns noisy transcripts and typed input into comparable text:
//! - Unicode NFC fold
//! - Devanagari → Gurmukhi transliteration (once, first)
//! - Lowercase conversion and vowel-run collapse ("waaheguru" → "waheguru")
//! - Strip everything except ASCII letters, digits, whitespace and Gurmukhi
//! - Strip Gurmukhi matras (akhars only, plus Iri/Ura/Ek Onkar)
//! - Spoken ordinals to digits ("pehla" → "1"), Roman tokens only
//! - Whitespace collapsing

pub mod fold;
pub mod script;

pub use fold::phonetic_fold;
pub use script::{detect_script, strip_matras, transliterate_secondary_to_native};

use gurbani_types::Script;
use unicode_normalization::UnicodeNormalization;

/// Spoken number words mapped to digits
const NUMERAL_WORDS: &[(&str, &str)] = &[
    ("pahila", "1"),
    ("pehla", "1"),
    ("one", "1"),
    ("dooja", "2"),
    ("duja", "2"),
    ("two", "2"),
    ("teeja", "3"),
    ("trija", "3"),
    ("three", "3"),
    ("chautha", "4"),
    ("four", "4"),
];

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

/// Collapse runs of the same vowel to a single vowel
fn collapse_vowel_runs(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev: Option<char> = None;
    for c in text.chars() {
        if is_vowel(c) && prev == Some(c) {
            continue;
        }
        out.push(c);
        prev = Some(c);
    }
    out
}

fn is_kept(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() || script::is_gurmukhi(c)
}

/// Digit for a spoken number word.
///
/// Keys go through the same vowel-run collapse as the text, so "dooja"
/// still matches after the text became "doja".
fn numeral_for(token: &str) -> Option<&'static str> {
    if !token.chars().all(|c| c.is_ascii_lowercase()) {
        return None;
    }
    NUMERAL_WORDS
        .iter()
        .find(|(word, _)| collapse_vowel_runs(word) == token)
        .map(|(_, digit)| *digit)
}

/// Normalize text for matching.
///
/// # Examples
///
/// ```
/// use gurbani_search::normalize::clean;
///
/// assert_eq!(clean("  Waaheguru   JI!! "), "waheguru ji");
/// assert_eq!(clean("pehla salok"), "1 salok");
/// assert_eq!(clean("ਸਤਿਗੁਰੁ ਪ੍ਰਸਾਦਿ ॥"), "ਸਤਗਰ ਪਰਸਦ");
/// ```
pub fn clean(text: &str) -> String {
    let nfc: String = text.nfc().collect();
    let native = match detect_script(&nfc) {
        Script::SecondaryIndic => transliterate_secondary_to_native(&nfc)
            .nfc()
            .collect::<String>(),
        _ => nfc,
    };

    let lowered = native.to_lowercase();
    let collapsed = collapse_vowel_runs(&lowered);

    let kept: String = collapsed
        .chars()
        .filter(|c| is_kept(*c) && !script::is_matra(*c))
        .collect();

    kept.split_whitespace()
        .map(|token| numeral_for(token).unwrap_or(token))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whitespace tokens of the cleaned text
pub fn tokens(text: &str) -> Vec<String> {
    clean(text).split_whitespace().map(str::to_string).collect()
}

/// First character of every cleaned token, concatenated.
///
/// ```
/// use gurbani_search::normalize::acronym;
///
/// assert_eq!(acronym("Waheguru Ji Ka Khalsa"), "wjkk");
/// assert_eq!(acronym("   "), "");
/// ```
pub fn acronym(text: &str) -> String {
    acronym_of_clean(&clean(text))
}

/// Acronym of text that is already cleaned
pub fn acronym_of_clean(cleaned: &str) -> String {
    cleaned
        .split_whitespace()
        .filter_map(|token| token.chars().next())
        .collect()
}

/// A caller query with every derived field computed once
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    raw: String,
    /// Trimmed, lower-cased, whitespace-collapsed, transliterated to
    /// Gurmukhi when typed in Devanagari. Sent to the provider.
    search_text: String,
    /// `clean` output, used for scoring and thresholds
    normalized: String,
    script: Script,
    acronym: String,
    explicit_acronym: bool,
}

impl Query {
    /// Build a query. A caller-supplied acronym wins over the derived one.
    pub fn new(raw: &str, acronym: Option<&str>, explicit_acronym: bool) -> Self {
        let script = detect_script(raw);
        let nfc: String = raw.nfc().collect();
        let native = match script {
            Script::SecondaryIndic => transliterate_secondary_to_native(&nfc),
            _ => nfc,
        };
        let search_text = native
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        let normalized = clean(&native);

        // text asserted to be an acronym already is one, minus the spaces
        let derived = if explicit_acronym {
            normalized.split_whitespace().collect()
        } else {
            acronym_of_clean(&normalized)
        };
        let acronym = acronym
            .map(|a| a.split_whitespace().collect::<String>().to_lowercase())
            .filter(|a| !a.is_empty())
            .unwrap_or(derived);

        Self {
            raw: raw.to_string(),
            search_text,
            normalized,
            script,
            acronym,
            explicit_acronym,
        }
    }

    pub fn text(raw: &str) -> Self {
        Self::new(raw, None, false)
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    pub fn script(&self) -> Script {
        self.script
    }

    pub fn acronym(&self) -> &str {
        &self.acronym
    }

    pub fn is_explicit_acronym(&self) -> bool {
        self.explicit_acronym
    }

    pub fn token_count(&self) -> usize {
        self.search_text.split_whitespace().count()
    }

    /// Character count of the normalized text
    pub fn normalized_len(&self) -> usize {
        self.normalized.chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_basic() {
        assert_eq!(clean("  Thir   Ghar Baiso  "), "thir ghar baiso");
        assert_eq!(clean("sooooo"), "so");
        assert_eq!(clean("hello, world!"), "hello world");
        assert_eq!(clean("café"), "caf");
    }

    #[test]
    fn test_clean_numerals_on_word_boundaries() {
        assert_eq!(clean("salok mahala nine"), "salok mahala nine");
        assert_eq!(clean("pauri one"), "pauri 1");
        assert_eq!(clean("someone"), "someone");
        assert_eq!(clean("dooja teeja"), "2 3");
        assert_eq!(clean("Chautha"), "4");
    }

    #[test]
    fn test_clean_gurmukhi_strips_matras() {
        assert_eq!(clean("ਵਾਹਿਗੁਰੂ"), "ਵਹਗਰ");
        assert_eq!(clean("ੴ ਸਤਿ ਨਾਮੁ"), "ੴ ਸਤ ਨਮ");
    }

    #[test]
    fn test_clean_devanagari_is_transliterated() {
        assert_eq!(clean("वाहेगुरु"), clean("ਵਾਹੇਗੁਰੁ"));
        assert_eq!(clean("वाहेगुरु"), "ਵਹਗਰ");
    }

    #[test]
    fn test_clean_is_stable() {
        for input in ["Waaheguru Ji", "ਸਤਿਗੁਰੁ ਪ੍ਰਸਾਦਿ", "pehla  dooja", "w w w"] {
            let once = clean(input);
            assert_eq!(clean(&once), once);
        }
    }

    #[test]
    fn test_acronym() {
        assert_eq!(acronym("thir ghar baiso"), "tgb");
        assert_eq!(acronym("W W W"), "www");
        assert_eq!(acronym("ਸੋ ਸਤਿਗੁਰੁ ਪਿਆਰਾ"), "ਸਸਪ");
        assert_eq!(acronym(" \t \n "), "");
    }

    #[test]
    fn test_acronym_of_acronym_stream_is_lowercased_identity() {
        let letters = "A B C D";
        let first = acronym(&clean(letters));
        assert_eq!(first, "abcd");
        // a single-letter stream abbreviates to itself
        assert_eq!(acronym(&clean("a b c d")), first);
    }

    #[test]
    fn test_query_derived_fields() {
        let q = Query::text("  Thir Ghar  Baiso ");
        assert_eq!(q.search_text(), "thir ghar baiso");
        assert_eq!(q.normalized(), "thir ghar baiso");
        assert_eq!(q.acronym(), "tgb");
        assert_eq!(q.script(), Script::Roman);
        assert_eq!(q.token_count(), 3);
        assert!(!q.is_explicit_acronym());
    }

    #[test]
    fn test_query_caller_acronym_wins() {
        let q = Query::new("waheguru ji ka khalsa", Some("W J K K"), false);
        assert_eq!(q.acronym(), "wjkk");
        let q = Query::new("w w w", Some("  "), true);
        assert_eq!(q.acronym(), "www");
        assert!(q.is_explicit_acronym());
    }

    #[test]
    fn test_query_explicit_acronym_keeps_letters() {
        let q = Query::new("TGB", None, true);
        assert_eq!(q.acronym(), "tgb");
        let q = Query::new("tgb", None, false);
        assert_eq!(q.acronym(), "t");
    }

    #[test]
    fn test_query_devanagari() {
        let q = Query::text("वाहेगुरु");
        assert_eq!(q.script(), Script::SecondaryIndic);
        assert_eq!(q.search_text(), "ਵਾਹੇਗੁਰੁ");
        assert_eq!(q.normalized(), "ਵਹਗਰ");
    }
}
