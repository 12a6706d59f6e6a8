//! Command resolution: does a query name a whole composition, or hit an
//! explicit shortcut?
//!
//! Static tables are compared on `clean`-normalized keys, so Gurmukhi keys
//! match whether or not the speaker's transcript carries matras.

use std::sync::Arc;

use gurbani_types::{CatalogEntry, CompositionRef, Script};
use tracing::debug;

use crate::catalog::CatalogCache;
use crate::normalize::{clean, detect_script, phonetic_fold, Query};

/// Priority command phrases → bani id
const PRIORITY_COMMANDS: &[(&str, u32)] = &[
    ("japji", 2),
    ("japji sahib", 2),
    ("jaap", 4),
    ("jaap sahib", 4),
    ("tav prasad", 6),
    ("savaiye", 6),
    ("chaupai", 9),
    ("chaupai sahib", 9),
    ("anand", 10),
    ("anand sahib", 10),
    ("rehras", 21),
    ("rehras sahib", 21),
    ("sohila", 23),
    ("kirtan sohila", 23),
    ("sohila sahib", 23),
    ("ardaas", 24),
    ("ardaas sahib", 24),
    ("sukhmani", 31),
    ("sukhmani sahib", 31),
    ("asa di var", 11),
    ("shabad hazare", 3),
    ("shabad hazaare", 3),
    ("salok mahala 9", 30),
    // bare Gurmukhi names that also occur inside verses need a second word
    ("ਜਪੁਜੀ", 2),
    ("ਜਪੁਜੀ ਸਾਹਿਬ", 2),
    ("ਜਾਪੁ ਸਾਹਿਬ", 4),
    ("ਚੌਪਈ ਸਾਹਿਬ", 9),
    ("ਅਨੰਦੁ ਸਾਹਿਬ", 10),
    ("ਰਹਰਾਸਿ ਸਾਹਿਬ", 21),
    ("ਕੀਰਤਨ ਸੋਹਿਲਾ", 23),
    ("ਸੁਖਮਨੀ ਸਾਹਿਬ", 31),
];

/// Shabad opened directly by a keyword, bypassing search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shortcut {
    pub shabad_id: u32,
    /// Line to open on; `None` means the first line
    pub verse_id: Option<u32>,
}

const SIMRAN: Shortcut = Shortcut {
    shabad_id: 31020,
    verse_id: None,
};

const SHORTCUTS: &[(&str, Shortcut)] = &[
    ("waheguru", SIMRAN),
    ("w w w", SIMRAN),
    ("www", SIMRAN),
    ("simran", SIMRAN),
];

/// Catalog names this short are only accepted through the fuzzy path
const MIN_LITERAL_NAME_CHARS: usize = 4;

/// Weight of edit-distance similarity; token overlap gets the rest
const EDIT_WEIGHT: f64 = 0.6;

/// Which resolution path named the composition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandSource {
    PriorityTable,
    CatalogLiteral,
    CatalogFuzzy,
}

/// A query resolved to a whole composition
#[derive(Debug, Clone, PartialEq)]
pub struct CommandMatch {
    pub reference: CompositionRef,
    /// Catalog display name, when the catalog knows the id
    pub name: Option<String>,
    pub source: CommandSource,
    /// 1.0 for table and literal hits, the similarity for fuzzy hits
    pub score: f64,
}

pub struct CommandResolver {
    catalog: Arc<CatalogCache>,
    /// Normalized keys, longest first
    priority: Vec<(String, u32)>,
    shortcuts: Vec<(String, Shortcut)>,
    fuzzy_threshold: f64,
}

impl CommandResolver {
    pub fn new(catalog: Arc<CatalogCache>, fuzzy_threshold: f64) -> Self {
        let mut priority: Vec<(String, u32)> = PRIORITY_COMMANDS
            .iter()
            .map(|(key, id)| (clean(key), *id))
            .collect();
        // stable sort keeps table order among equal lengths
        priority.sort_by(|a, b| b.0.chars().count().cmp(&a.0.chars().count()));

        let shortcuts = SHORTCUTS
            .iter()
            .map(|(key, shortcut)| (clean(key), *shortcut))
            .collect();

        Self {
            catalog,
            priority,
            shortcuts,
            fuzzy_threshold,
        }
    }

    /// Composition named by the query, if any.
    ///
    /// The priority table is consulted before the catalog so an exact
    /// command phrase always beats a fuzzy catalog near-match.
    pub async fn resolve_composition(&self, query: &Query) -> Option<CommandMatch> {
        let normalized = query.normalized();
        if normalized.is_empty() {
            return None;
        }
        let catalog = self.catalog.entries().await;

        if let Some(id) = self.priority_match(normalized) {
            let name = catalog
                .iter()
                .find(|entry| entry.id == id)
                .map(|entry| entry.display_name().to_string());
            debug!(bani_id = id, "Priority command matched");
            return Some(CommandMatch {
                reference: CompositionRef::bani(id),
                name,
                source: CommandSource::PriorityTable,
                score: 1.0,
            });
        }

        best_catalog_match(normalized, &catalog, self.fuzzy_threshold)
    }

    /// Longest priority key contained in the normalized query. Run-together
    /// transcripts ("anandsahib") still match.
    pub fn priority_match(&self, normalized: &str) -> Option<u32> {
        self.priority
            .iter()
            .find(|(key, _)| !key.is_empty() && normalized.contains(key.as_str()))
            .map(|(_, id)| *id)
    }

    /// Shortcut keyed by the normalized query, or by the acronym when the
    /// caller asserts acronym input
    pub fn shortcut(&self, query: &Query) -> Option<Shortcut> {
        let lookup = |needle: &str| {
            self.shortcuts
                .iter()
                .find(|(key, _)| key == needle)
                .map(|(_, shortcut)| *shortcut)
        };
        lookup(query.normalized()).or_else(|| {
            if query.is_explicit_acronym() {
                lookup(query.acronym())
            } else {
                None
            }
        })
    }
}

/// Best catalog entry for the query; literal hits beat fuzzy ones, ties keep
/// catalog order
fn best_catalog_match(
    normalized: &str,
    catalog: &[CatalogEntry],
    threshold: f64,
) -> Option<CommandMatch> {
    let mut best: Option<CommandMatch> = None;

    for entry in catalog {
        for name in entry.names() {
            let candidate = if literal_match(normalized, name) {
                Some((CommandSource::CatalogLiteral, 1.0))
            } else {
                let score = name_similarity(normalized, name);
                (score >= threshold).then_some((CommandSource::CatalogFuzzy, score))
            };

            let Some((source, score)) = candidate else {
                continue;
            };
            let better = match &best {
                None => true,
                Some(current) => {
                    score > current.score
                        || (source == CommandSource::CatalogLiteral
                            && current.source == CommandSource::CatalogFuzzy
                            && score >= current.score)
                }
            };
            if better {
                best = Some(CommandMatch {
                    reference: CompositionRef::bani(entry.id),
                    name: Some(entry.display_name().to_string()),
                    source,
                    score,
                });
            }
        }
    }

    if let Some(hit) = &best {
        debug!(bani_id = hit.reference.id, score = hit.score, source = ?hit.source, "Catalog command matched");
    }
    best
}

/// Query equals the name, or starts with the name followed by more words
fn literal_match(normalized: &str, name: &str) -> bool {
    let name = clean(name);
    if name.chars().count() < MIN_LITERAL_NAME_CHARS {
        return false;
    }
    normalized == name
        || normalized
            .strip_prefix(name.as_str())
            .is_some_and(|rest| rest.starts_with(' '))
}

/// Comparable form of a name: phonetic fold for Roman text, cleaned text
/// without spaces for Gurmukhi
fn comparable(text: &str) -> String {
    match detect_script(text) {
        Script::Roman => phonetic_fold(text),
        _ => clean(text).split_whitespace().collect(),
    }
}

/// Weighted similarity in 0.0..=1.0: normalized Levenshtein over the
/// comparable forms plus the share of name tokens present in the query
pub fn name_similarity(normalized_query: &str, name: &str) -> f64 {
    let query_form = comparable(normalized_query);
    let name_form = comparable(name);
    if query_form.is_empty() || name_form.is_empty() {
        return 0.0;
    }
    let edit = strsim::normalized_levenshtein(&query_form, &name_form);

    let name_clean = clean(name);
    let name_tokens: Vec<&str> = name_clean.split_whitespace().collect();
    let query_tokens: Vec<&str> = normalized_query.split_whitespace().collect();
    let shared = name_tokens
        .iter()
        .filter(|token| query_tokens.contains(token))
        .count();
    let denominator = name_tokens.len().max(query_tokens.len()).max(1);
    let overlap = shared as f64 / denominator as f64;

    EDIT_WEIGHT * edit + (1.0 - EDIT_WEIGHT) * overlap
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CatalogConfig;
    use banidb_client::InMemoryProvider;

    fn entry(id: u32, name: &str, gurmukhi: Option<&str>) -> CatalogEntry {
        CatalogEntry {
            id,
            name: Some(name.to_string()),
            gurmukhi: gurmukhi.map(str::to_string),
            transliteration: None,
            english: None,
        }
    }

    fn resolver(catalog: Vec<CatalogEntry>) -> CommandResolver {
        let provider = Arc::new(InMemoryProvider::new().with_catalog(catalog));
        let cache = Arc::new(CatalogCache::new(provider, &CatalogConfig::default()));
        CommandResolver::new(cache, 0.6)
    }

    #[test]
    fn test_priority_is_longest_first() {
        let r = resolver(vec![]);
        assert_eq!(r.priority_match("kirtan sohila"), Some(23));
        assert_eq!(r.priority_match("please start japji sahib"), Some(2));
        assert_eq!(r.priority_match("salok mahala 9"), Some(30));
        assert_eq!(r.priority_match("thir ghar baiso"), None);
    }

    #[test]
    fn test_priority_matches_run_together_transcripts() {
        let r = resolver(vec![]);
        assert_eq!(r.priority_match("anandsahib"), Some(10));
        assert_eq!(r.priority_match("japjisahib"), Some(2));
        assert_eq!(r.priority_match("sukhmanisahib ji"), Some(31));
    }

    #[test]
    fn test_priority_gurmukhi_keys_ignore_matras() {
        let r = resolver(vec![]);
        assert_eq!(r.priority_match(&clean("ਜਪੁਜੀ ਸਾਹਿਬ")), Some(2));
        assert_eq!(r.priority_match(&clean("ਜਪਜੀ")), Some(2));
        assert_eq!(r.priority_match(&clean("ਸੁਖਮਨੀ ਸਾਹਿਬ")), Some(31));
    }

    #[tokio::test]
    async fn test_static_keyword_beats_fuzzy_catalog() {
        let r = resolver(vec![entry(77, "Anand Sahib Ji", None)]);
        let hit = r
            .resolve_composition(&Query::text("anand sahib ji"))
            .await
            .unwrap();
        assert_eq!(hit.reference, CompositionRef::bani(10));
        assert_eq!(hit.source, CommandSource::PriorityTable);
    }

    #[tokio::test]
    async fn test_run_together_keyword_beats_fuzzy_catalog() {
        let r = resolver(vec![entry(77, "Anandsahib Path", None)]);
        let hit = r
            .resolve_composition(&Query::text("anandsahib"))
            .await
            .unwrap();
        assert_eq!(hit.reference, CompositionRef::bani(10));
        assert_eq!(hit.source, CommandSource::PriorityTable);
    }

    #[tokio::test]
    async fn test_catalog_literal_and_fuzzy() {
        let r = resolver(vec![
            entry(90, "Baarah Maaha", None),
            entry(91, "Dukh Bhanjani Sahib", None),
        ]);

        let literal = r
            .resolve_composition(&Query::text("Baarah Maaha shuru karo"))
            .await
            .unwrap();
        assert_eq!(literal.reference.id, 90);
        assert_eq!(literal.source, CommandSource::CatalogLiteral);

        let fuzzy = r
            .resolve_composition(&Query::text("dukh bhanjni sahib"))
            .await
            .unwrap();
        assert_eq!(fuzzy.reference.id, 91);
        assert_eq!(fuzzy.source, CommandSource::CatalogFuzzy);
        assert_eq!(fuzzy.name.as_deref(), Some("Dukh Bhanjani Sahib"));
    }

    #[tokio::test]
    async fn test_ordinary_verse_is_not_a_command() {
        let r = resolver(vec![
            entry(90, "Baarah Maaha", None),
            entry(91, "Dukh Bhanjani Sahib", None),
        ]);
        assert!(r
            .resolve_composition(&Query::text("thir ghar baiso"))
            .await
            .is_none());
    }

    #[test]
    fn test_name_similarity_bounds() {
        assert!((name_similarity("japji sahib", "Japji Sahib") - 1.0).abs() < 1e-9);
        assert_eq!(name_similarity("", "Japji Sahib"), 0.0);
        let s = name_similarity("zzxq flkk", "Japji Sahib");
        assert!((0.0..0.6).contains(&s));
    }

    #[test]
    fn test_shortcut_lookup() {
        let r = resolver(vec![]);
        assert_eq!(r.shortcut(&Query::text("Waheguru")), Some(SIMRAN));
        assert_eq!(r.shortcut(&Query::text("waheguru ji")), None);
        assert_eq!(r.shortcut(&Query::new("w w w", None, true)), Some(SIMRAN));
        assert_eq!(
            r.shortcut(&Query::new("w w", Some("www"), true)),
            Some(SIMRAN)
        );
        assert_eq!(r.shortcut(&Query::new("w w", Some("www"), false)), None);
    }
}
