//! Script detection, Devanagari → Gurmukhi transliteration, matra stripping

use gurbani_types::Script;

/// Gurmukhi Unicode block
pub const GURMUKHI_BLOCK: std::ops::RangeInclusive<char> = '\u{0A00}'..='\u{0A7F}';

/// Devanagari Unicode block
pub const DEVANAGARI_BLOCK: std::ops::RangeInclusive<char> = '\u{0900}'..='\u{097F}';

/// Classify text: any Gurmukhi code point wins, then any Devanagari code
/// point, otherwise Roman.
pub fn detect_script(text: &str) -> Script {
    if text.chars().any(|c| GURMUKHI_BLOCK.contains(&c)) {
        Script::Native
    } else if text.chars().any(|c| DEVANAGARI_BLOCK.contains(&c)) {
        Script::SecondaryIndic
    } else {
        Script::Roman
    }
}

pub fn is_gurmukhi(c: char) -> bool {
    GURMUKHI_BLOCK.contains(&c)
}

/// Gurmukhi combining marks removed for comparison.
///
/// Iri (U+0A72), Ura (U+0A73) and Ek Onkar (U+0A74) are letters in their own
/// right and are kept.
pub fn is_matra(c: char) -> bool {
    matches!(c,
        '\u{0A01}'..='\u{0A03}'
        | '\u{0A3C}'
        | '\u{0A3E}'..='\u{0A4D}'
        | '\u{0A51}'
        | '\u{0A70}'..='\u{0A71}'
        | '\u{0A75}')
}

/// Remove matras and diacritics, keeping akhars
pub fn strip_matras(text: &str) -> String {
    text.chars().filter(|c| !is_matra(*c)).collect()
}

/// Devanagari code point → Gurmukhi replacement
const DEVANAGARI_TO_GURMUKHI: &[(char, &str)] = &[
    // Signs
    ('\u{0901}', "\u{0A01}"), // candrabindu → adak bindi
    ('\u{0902}', "\u{0A02}"), // anusvara → bindi
    ('\u{0903}', "\u{0A03}"), // visarga
    // Independent vowels
    ('अ', "ਅ"),
    ('आ', "ਆ"),
    ('इ', "ਇ"),
    ('ई', "ਈ"),
    ('उ', "ਉ"),
    ('ऊ', "ਊ"),
    ('ऋ', "ਰਿ"),
    ('ए', "ਏ"),
    ('ऐ', "ਐ"),
    ('ओ', "ਓ"),
    ('औ', "ਔ"),
    // Consonants
    ('क', "ਕ"),
    ('ख', "ਖ"),
    ('ग', "ਗ"),
    ('घ', "ਘ"),
    ('ङ', "ਙ"),
    ('च', "ਚ"),
    ('छ', "ਛ"),
    ('ज', "ਜ"),
    ('झ', "ਝ"),
    ('ञ', "ਞ"),
    ('ट', "ਟ"),
    ('ठ', "ਠ"),
    ('ड', "ਡ"),
    ('ढ', "ਢ"),
    ('ण', "ਣ"),
    ('त', "ਤ"),
    ('थ', "ਥ"),
    ('द', "ਦ"),
    ('ध', "ਧ"),
    ('न', "ਨ"),
    ('प', "ਪ"),
    ('फ', "ਫ"),
    ('ब', "ਬ"),
    ('भ', "ਭ"),
    ('म', "ਮ"),
    ('य', "ਯ"),
    ('र', "ਰ"),
    ('ल', "ਲ"),
    ('ळ', "ਲ਼"),
    ('व', "ਵ"),
    ('श', "ਸ਼"),
    ('ष', "ਸ਼"),
    ('स', "ਸ"),
    ('ह', "ਹ"),
    // Nukta consonants (only reached when input was not NFC-decomposed)
    ('\u{0958}', "ਕ"),
    ('\u{0959}', "ਖ਼"),
    ('\u{095A}', "ਗ਼"),
    ('\u{095B}', "ਜ਼"),
    ('\u{095C}', "ੜ"),
    ('\u{095D}', "ਢ"),
    ('\u{095E}', "ਫ਼"),
    ('\u{095F}', "ਯ"),
    // Dependent vowel signs
    ('\u{093C}', "\u{0A3C}"), // nukta
    ('\u{093E}', "\u{0A3E}"), // aa
    ('\u{093F}', "\u{0A3F}"), // i
    ('\u{0940}', "\u{0A40}"), // ii
    ('\u{0941}', "\u{0A41}"), // u
    ('\u{0942}', "\u{0A42}"), // uu
    ('\u{0947}', "\u{0A47}"), // e
    ('\u{0948}', "\u{0A48}"), // ai
    ('\u{094B}', "\u{0A4B}"), // o
    ('\u{094C}', "\u{0A4C}"), // au
    ('\u{094D}', "\u{0A4D}"), // virama
    // Digits
    ('०', "੦"),
    ('१', "੧"),
    ('२', "੨"),
    ('३', "੩"),
    ('४', "੪"),
    ('५', "੫"),
    ('६', "੬"),
    ('७', "੭"),
    ('८', "੮"),
    ('९', "੯"),
];

fn devanagari_to_gurmukhi(c: char) -> Option<&'static str> {
    DEVANAGARI_TO_GURMUKHI
        .iter()
        .find(|(from, _)| *from == c)
        .map(|(_, to)| *to)
}

/// Character-by-character Devanagari → Gurmukhi substitution.
/// Characters without a mapping pass through unchanged.
pub fn transliterate_secondary_to_native(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match devanagari_to_gurmukhi(c) {
            Some(mapped) => out.push_str(mapped),
            None => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_script() {
        assert_eq!(detect_script("thir ghar baiso"), Script::Roman);
        assert_eq!(detect_script("ਥਿਰੁ ਘਰਿ"), Script::Native);
        assert_eq!(detect_script("वाहेगुरु"), Script::SecondaryIndic);
        // Gurmukhi wins over Devanagari
        assert_eq!(detect_script("वाहे ਗੁਰੂ"), Script::Native);
        assert_eq!(detect_script(""), Script::Roman);
    }

    #[test]
    fn test_transliterate_waheguru() {
        assert_eq!(transliterate_secondary_to_native("वाहेगुरु"), "ਵਾਹੇਗੁਰੁ");
    }

    #[test]
    fn test_transliterate_passes_unknown_through() {
        assert_eq!(transliterate_secondary_to_native("ॐ abc ।"), "ॐ abc ।");
    }

    #[test]
    fn test_strip_matras_keeps_load_bearing_letters() {
        assert_eq!(strip_matras("ਸਤਿਗੁਰੁ"), "ਸਤਗਰ");
        assert_eq!(strip_matras("ੴ ੲ ੳ"), "ੴ ੲ ੳ");
        assert_eq!(strip_matras("ਅੰਮ੍ਰਿਤ"), "ਅਮਰਤ");
    }
}
