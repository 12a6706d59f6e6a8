//! Resolve API Types
//!
//! Request/response pair for the engine entry point, shared by the HTTP
//! surface, the CLI and the live tracker.

use serde::{Deserialize, Serialize};

use crate::{Composition, SearchMode, Verse};

/// Search-type code reported for composition commands
pub const COMPOSITION_COMMAND_CODE: i32 = 99;

/// Search-type code reported for shortcut hits and for no match
pub const NO_SEARCH_CODE: i32 = -1;

/// How a match was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MatchStrategy {
    /// The query named a whole composition
    CompositionCommand,
    /// The query hit the static keyword shortcut table
    ExplicitShortcut,
    /// A cascade search strategy cleared the threshold
    Search { mode: SearchMode },
}

impl MatchStrategy {
    pub fn search_type_code(self) -> i32 {
        match self {
            MatchStrategy::CompositionCommand => COMPOSITION_COMMAND_CODE,
            MatchStrategy::ExplicitShortcut => NO_SEARCH_CODE,
            MatchStrategy::Search { mode } => mode.code(),
        }
    }
}

/// Request to resolve a phrase into a verse
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveRequest {
    pub query: String,
    /// Acronym already derived by the caller
    #[serde(default)]
    pub acronym: Option<String>,
    /// Caller asserts the query already is an acronym
    #[serde(default)]
    pub is_acronym: bool,
}

impl ResolveRequest {
    pub fn text(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            acronym: None,
            is_acronym: false,
        }
    }

    pub fn acronym(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            acronym: None,
            is_acronym: true,
        }
    }
}

/// Resolution outcome; `matched` and `composition` are both set or both absent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveResponse {
    #[serde(rename = "match")]
    pub matched: Option<Verse>,
    /// 0-100
    pub confidence: u8,
    pub strategy: Option<MatchStrategy>,
    pub search_type_used: i32,
    pub composition: Option<Composition>,
}

impl ResolveResponse {
    pub fn no_match() -> Self {
        Self {
            matched: None,
            confidence: 0,
            strategy: None,
            search_type_used: NO_SEARCH_CODE,
            composition: None,
        }
    }

    pub fn matched(
        verse: Verse,
        composition: Composition,
        confidence: u8,
        strategy: MatchStrategy,
    ) -> Self {
        Self {
            matched: Some(verse),
            confidence: confidence.min(100),
            strategy: Some(strategy),
            search_type_used: strategy.search_type_code(),
            composition: Some(composition),
        }
    }

    pub fn is_match(&self) -> bool {
        self.matched.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_accepts_browser_field_names() {
        let req: ResolveRequest =
            serde_json::from_str(r#"{"query":"w w w","isAcronym":true}"#).unwrap();
        assert!(req.is_acronym);
        assert!(req.acronym.is_none());
        assert_eq!(req.query, "w w w");
    }

    #[test]
    fn test_no_match_shape() {
        let json = serde_json::to_value(ResolveResponse::no_match()).unwrap();
        assert!(json["match"].is_null());
        assert!(json["composition"].is_null());
        assert_eq!(json["searchTypeUsed"], -1);
    }

    #[test]
    fn test_strategy_codes() {
        assert_eq!(MatchStrategy::CompositionCommand.search_type_code(), 99);
        assert_eq!(MatchStrategy::ExplicitShortcut.search_type_code(), -1);
        assert_eq!(
            MatchStrategy::Search {
                mode: SearchMode::FullWord
            }
            .search_type_code(),
            4
        );
        let json = serde_json::to_value(MatchStrategy::Search {
            mode: SearchMode::Broad,
        })
        .unwrap();
        assert_eq!(json["type"], "search");
        assert_eq!(json["mode"], 8);
    }
}
