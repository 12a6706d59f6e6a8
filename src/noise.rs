//! Noise classifier for live speech fragments
//!
//! Decides whether an incremental transcript fragment is worth a search
//! call. Stays permissive: a filler that slips through simply fails to
//! match, while a discarded line of scripture is lost for good.

/// Conversational fillers that dominate non-scripture speech
const FILLER_WORDS: &[&str] = &[
    "yeah", "okay", "hello", "hi", "testing", "mic", "check", "the", "and", "but", "actually",
    "maybe", "sorry", "wait", "um", "ah", "like", "know", "right", "just", "so", "then", "well",
    "think",
];

/// Same character repeated this many times in a row marks a fragment as noise
const REPEAT_RUN: usize = 4;

fn is_filler(word: &str) -> bool {
    FILLER_WORDS.contains(&word)
}

fn has_repeated_run(text: &str) -> bool {
    let mut run = 0;
    let mut prev = None;
    for c in text.chars() {
        if Some(c) == prev {
            run += 1;
        } else {
            run = 1;
            prev = Some(c);
        }
        if run >= REPEAT_RUN {
            return true;
        }
    }
    false
}

/// True when a fragment is unlikely to be scripture
pub fn is_noise(fragment: &str) -> bool {
    let text = fragment.trim().to_lowercase();
    if text.chars().count() < 2 {
        return true;
    }

    let words: Vec<&str> = text.split_whitespace().collect();
    let fillers = words.iter().filter(|w| is_filler(w)).count();
    if fillers * 2 > words.len() {
        return true;
    }

    has_repeated_run(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_fragments_are_noise() {
        assert!(is_noise(""));
        assert!(is_noise("   "));
        assert!(is_noise("a"));
        assert!(!is_noise("ek"));
    }

    #[test]
    fn test_filler_majority() {
        assert!(is_noise("okay testing mic check"));
        assert!(is_noise("Yeah so um"));
        // exactly half is not a majority
        assert!(!is_noise("so sachiar"));
        assert!(!is_noise("the sach"));
        assert!(!is_noise("thir ghar baiso"));
    }

    #[test]
    fn test_repeated_runs() {
        assert!(is_noise("hmmmm"));
        assert!(is_noise("aaaa"));
        assert!(!is_noise("aaa vaah"));
        assert!(is_noise("ਵਾਾਾਾ"));
    }

    #[test]
    fn test_scripture_passes() {
        assert!(!is_noise("ਸੋ ਸਤਿਗੁਰੁ ਪਿਆਰਾ ਮੇਰੈ ਨਾਲਿ ਹੈ"));
        assert!(!is_noise("waheguru"));
        assert!(!is_noise("sach kahon sun leho sabhai"));
    }
}
