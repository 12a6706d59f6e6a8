//! Phonetic fold for Roman transliteration
//!
//! Lossy; used only to compare a query with candidate transliterations.
//! Long/short vowel spellings and aspirated/unaspirated consonant pairs
//! collapse to one form, `w` becomes `v`, and everything that is not ASCII
//! alphanumeric is dropped.

/// Digraph rewrites, applied left to right within one pass
const DIGRAPHS: &[(&str, &str)] = &[
    ("aa", "a"),
    ("ee", "i"),
    ("oo", "u"),
    ("dh", "d"),
    ("th", "t"),
    ("bh", "b"),
    ("kh", "k"),
    ("gh", "g"),
    ("jh", "j"),
    ("ph", "p"),
    ("ch", "c"),
    ("sh", "s"),
    ("rh", "r"),
];

/// Fold Roman text for comparison.
///
/// Runs the rewrite pass to a fixpoint, so `phonetic_fold(phonetic_fold(x))
/// == phonetic_fold(x)` for every input. Every rewrite shortens the string
/// or removes a `w`, so the loop terminates.
pub fn phonetic_fold(text: &str) -> String {
    let mut current: String = text
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| if c == 'w' { 'v' } else { c })
        .filter(char::is_ascii_alphanumeric)
        .collect();

    loop {
        let next = fold_pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn fold_pass(text: &str) -> String {
    DIGRAPHS
        .iter()
        .fold(text.to_string(), |acc, (from, to)| acc.replace(from, to))
}
