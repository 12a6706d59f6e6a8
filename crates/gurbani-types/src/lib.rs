//! Shared Types for gurbani-search
//!
//! Every type that crosses a boundary lives here: the scripture provider
//! (search hits, compositions, catalog entries), the resolution engine, and
//! the HTTP surface.
//!
//! ## Boundaries
//!
//! ```text
//! ┌──────────────────┐  JSON   ┌──────────────────┐  JSON   ┌──────────────────┐
//! │  BaniDB / fixture│ ──────► │  QueryEngine     │ ──────► │  Projector UI    │
//! │  (provider)      │         │  (resolver)      │         │  (out of tree)   │
//! └──────────────────┘         └──────────────────┘         └──────────────────┘
//! ```
//!
//! ## Rules
//!
//! 1. Provider wire shapes are decoded in `banidb-client`; only the clean
//!    forms below leave that crate.
//! 2. Tagged enums only: `#[serde(tag = "type")]`.
//! 3. Request/response field names are camelCase for the browser client.

pub mod resolve;

pub use resolve::*;

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// SCRIPT
// ============================================================================

/// Writing system a query was typed or transcribed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Script {
    /// Gurmukhi, the script of the corpus
    Native,
    /// Devanagari input, transliterated to Gurmukhi before matching
    SecondaryIndic,
    /// Roman transliteration (the default)
    Roman,
}

impl Script {
    /// Native and secondary-Indic queries are compared against Gurmukhi text
    pub fn compares_gurmukhi(self) -> bool {
        !matches!(self, Script::Roman)
    }
}

// ============================================================================
// SEARCH MODE
// ============================================================================

/// Provider search-type codes used by the strategy cascade
///
/// Serialized as the bare integer code the provider expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum SearchMode {
    /// First letters of each word, Gurmukhi letters
    GurmukhiFirstLetters,
    /// First letters of each word, Roman letters
    EnglishFirstLetters,
    /// Full-word romanized search
    FullWord,
    /// Broad (looser) full-text search
    Broad,
}

impl SearchMode {
    pub fn code(self) -> i32 {
        match self {
            SearchMode::GurmukhiFirstLetters => 0,
            SearchMode::EnglishFirstLetters => 1,
            SearchMode::FullWord => 4,
            SearchMode::Broad => 8,
        }
    }

    /// True for the first-letter (acronym) modes
    pub fn is_acronym(self) -> bool {
        matches!(
            self,
            SearchMode::GurmukhiFirstLetters | SearchMode::EnglishFirstLetters
        )
    }
}

impl From<SearchMode> for i32 {
    fn from(mode: SearchMode) -> Self {
        mode.code()
    }
}

impl TryFrom<i32> for SearchMode {
    type Error = UnknownSearchMode;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(SearchMode::GurmukhiFirstLetters),
            1 => Ok(SearchMode::EnglishFirstLetters),
            4 => Ok(SearchMode::FullWord),
            8 => Ok(SearchMode::Broad),
            other => Err(UnknownSearchMode(other)),
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SearchMode::GurmukhiFirstLetters => "gurmukhi-first-letters",
            SearchMode::EnglishFirstLetters => "english-first-letters",
            SearchMode::FullWord => "full-word",
            SearchMode::Broad => "broad",
        };
        write!(f, "{label}({})", self.code())
    }
}

/// Returned when decoding a search-type code the cascade never issues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownSearchMode(pub i32);

impl fmt::Display for UnknownSearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown search type code {}", self.0)
    }
}

impl std::error::Error for UnknownSearchMode {}

// ============================================================================
// CORPUS
// ============================================================================

/// Banis and shabads live behind different provider endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositionKind {
    /// Named liturgical composition from the catalog (Japji, Rehras, ...)
    Bani,
    /// Hymn that a search hit belongs to
    Shabad,
}

/// Address of a composition at the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompositionRef {
    pub kind: CompositionKind,
    pub id: u32,
}

impl CompositionRef {
    pub fn bani(id: u32) -> Self {
        Self {
            kind: CompositionKind::Bani,
            id,
        }
    }

    pub fn shabad(id: u32) -> Self {
        Self {
            kind: CompositionKind::Shabad,
            id,
        }
    }
}

impl fmt::Display for CompositionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            CompositionKind::Bani => write!(f, "bani/{}", self.id),
            CompositionKind::Shabad => write!(f, "shabad/{}", self.id),
        }
    }
}

/// A single line of scripture
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verse {
    pub id: u32,
    /// Gurmukhi (Unicode) text
    pub gurmukhi: String,
    /// Roman transliteration
    #[serde(default)]
    pub transliteration: String,
    /// Devanagari transliteration
    #[serde(default)]
    pub transliteration_hi: String,
    /// English translation
    #[serde(default)]
    pub translation: String,
    /// Shabad this line belongs to, when the provider says so
    #[serde(default)]
    pub composition_id: Option<u32>,
}

/// Named, ordered run of verses; line order is meaningful
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Composition {
    pub reference: CompositionRef,
    pub name: String,
    pub lines: Vec<Verse>,
}

impl Composition {
    /// Index of a line by verse id
    pub fn position(&self, verse_id: u32) -> Option<usize> {
        self.lines.iter().position(|line| line.id == verse_id)
    }

    /// Line by verse id
    pub fn line(&self, verse_id: u32) -> Option<&Verse> {
        self.lines.iter().find(|line| line.id == verse_id)
    }

    pub fn first_line(&self) -> Option<&Verse> {
        self.lines.first()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// One hit from a provider search response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerseCandidate {
    pub verse_id: u32,
    pub shabad_id: u32,
    pub gurmukhi: String,
    pub transliteration: String,
}

/// Catalog entry for a named composition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: u32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub gurmukhi: Option<String>,
    #[serde(default)]
    pub transliteration: Option<String>,
    #[serde(default)]
    pub english: Option<String>,
}

impl CatalogEntry {
    /// All non-empty display names, in preference order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        [
            self.name.as_deref(),
            self.transliteration.as_deref(),
            self.gurmukhi.as_deref(),
            self.english.as_deref(),
        ]
        .into_iter()
        .flatten()
        .filter(|name| !name.trim().is_empty())
    }

    /// Best display name (falls back to "Gurbani")
    pub fn display_name(&self) -> &str {
        self.names().next().unwrap_or("Gurbani")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_mode_codes() {
        for mode in [
            SearchMode::GurmukhiFirstLetters,
            SearchMode::EnglishFirstLetters,
            SearchMode::FullWord,
            SearchMode::Broad,
        ] {
            assert_eq!(SearchMode::try_from(mode.code()), Ok(mode));
        }
        assert_eq!(SearchMode::try_from(3), Err(UnknownSearchMode(3)));
    }

    #[test]
    fn test_search_mode_serializes_as_code() {
        let json = serde_json::to_string(&SearchMode::Broad).unwrap();
        assert_eq!(json, "8");
        let mode: SearchMode = serde_json::from_str("1").unwrap();
        assert_eq!(mode, SearchMode::EnglishFirstLetters);
        assert!(serde_json::from_str::<SearchMode>("7").is_err());
    }

    #[test]
    fn test_acronym_modes() {
        assert!(SearchMode::GurmukhiFirstLetters.is_acronym());
        assert!(SearchMode::EnglishFirstLetters.is_acronym());
        assert!(!SearchMode::FullWord.is_acronym());
        assert!(!SearchMode::Broad.is_acronym());
    }

    #[test]
    fn test_catalog_entry_names_skip_blanks() {
        let entry = CatalogEntry {
            id: 2,
            name: None,
            gurmukhi: Some("ਜਪੁਜੀ ਸਾਹਿਬ".into()),
            transliteration: Some("  ".into()),
            english: Some("Japji Sahib".into()),
        };
        let names: Vec<&str> = entry.names().collect();
        assert_eq!(names, vec!["ਜਪੁਜੀ ਸਾਹਿਬ", "Japji Sahib"]);
        assert_eq!(entry.display_name(), "ਜਪੁਜੀ ਸਾਹਿਬ");
    }

    #[test]
    fn test_composition_lookup() {
        let verse = |id| Verse {
            id,
            gurmukhi: format!("line {id}"),
            transliteration: String::new(),
            transliteration_hi: String::new(),
            translation: String::new(),
            composition_id: Some(7),
        };
        let composition = Composition {
            reference: CompositionRef::shabad(7),
            name: "Test".into(),
            lines: vec![verse(10), verse(11), verse(12)],
        };
        assert_eq!(composition.position(11), Some(1));
        assert_eq!(composition.line(12).map(|v| v.id), Some(12));
        assert!(composition.line(99).is_none());
        assert_eq!(composition.reference.to_string(), "shabad/7");
    }
}
