//! In-process provider over fixture data
//!
//! Deterministic stand-in for the HTTP provider: canned search responses per
//! (text, mode), a fallback that returns every shabad line, failure
//! injection, and a call log so tests can assert what the cascade issued.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use gurbani_types::{
    CatalogEntry, Composition, CompositionKind, CompositionRef, SearchMode, VerseCandidate,
};

use crate::{ProviderError, Result, ScriptureProvider, SearchRequest};

#[derive(Default)]
pub struct InMemoryProvider {
    compositions: Vec<Composition>,
    catalog: Vec<CatalogEntry>,
    canned: HashMap<(String, SearchMode), Vec<VerseCandidate>>,
    failing_modes: HashSet<SearchMode>,
    catalog_unavailable: bool,
    search_log: Mutex<Vec<SearchRequest>>,
    catalog_fetches: AtomicUsize,
    composition_fetches: AtomicUsize,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_composition(mut self, composition: Composition) -> Self {
        self.compositions.push(composition);
        self
    }

    pub fn with_catalog(mut self, catalog: Vec<CatalogEntry>) -> Self {
        self.catalog = catalog;
        self
    }

    /// Fixed response for an exact (text, mode) pair
    pub fn with_search_results(
        mut self,
        text: impl Into<String>,
        mode: SearchMode,
        results: Vec<VerseCandidate>,
    ) -> Self {
        self.canned.insert((text.into(), mode), results);
        self
    }

    /// Every search in `mode` fails with a 503
    pub fn failing_mode(mut self, mode: SearchMode) -> Self {
        self.failing_modes.insert(mode);
        self
    }

    /// Catalog fetches fail with a 503
    pub fn catalog_unavailable(mut self) -> Self {
        self.catalog_unavailable = true;
        self
    }

    /// Searches issued so far, in order
    pub fn searches(&self) -> Vec<SearchRequest> {
        self.search_log
            .lock()
            .map(|log| log.clone())
            .unwrap_or_default()
    }

    pub fn catalog_fetches(&self) -> usize {
        self.catalog_fetches.load(Ordering::SeqCst)
    }

    pub fn composition_fetches(&self) -> usize {
        self.composition_fetches.load(Ordering::SeqCst)
    }

    /// Every shabad line as a candidate, in fixture order
    fn all_shabad_lines(&self, limit: usize) -> Vec<VerseCandidate> {
        self.compositions
            .iter()
            .filter(|c| c.reference.kind == CompositionKind::Shabad)
            .flat_map(|c| {
                c.lines.iter().map(move |line| VerseCandidate {
                    verse_id: line.id,
                    shabad_id: c.reference.id,
                    gurmukhi: line.gurmukhi.clone(),
                    transliteration: line.transliteration.clone(),
                })
            })
            .take(limit)
            .collect()
    }

    fn unavailable() -> ProviderError {
        ProviderError::Status {
            status: 503,
            body: "fixture provider unavailable".into(),
        }
    }
}

#[async_trait]
impl ScriptureProvider for InMemoryProvider {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<VerseCandidate>> {
        if let Ok(mut log) = self.search_log.lock() {
            log.push(request.clone());
        }
        if self.failing_modes.contains(&request.mode) {
            return Err(Self::unavailable());
        }
        match self.canned.get(&(request.text.clone(), request.mode)) {
            Some(results) => Ok(results.iter().take(request.limit).cloned().collect()),
            None => Ok(self.all_shabad_lines(request.limit)),
        }
    }

    async fn fetch_composition(&self, reference: &CompositionRef) -> Result<Option<Composition>> {
        self.composition_fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .compositions
            .iter()
            .find(|c| c.reference == *reference)
            .cloned())
    }

    async fn fetch_catalog(&self) -> Result<Vec<CatalogEntry>> {
        self.catalog_fetches.fetch_add(1, Ordering::SeqCst);
        if self.catalog_unavailable {
            return Err(Self::unavailable());
        }
        Ok(self.catalog.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gurbani_types::Verse;

    fn shabad() -> Composition {
        Composition {
            reference: CompositionRef::shabad(5),
            name: "Fixture".into(),
            lines: vec![Verse {
                id: 50,
                gurmukhi: "ਵਾਹਿਗੁਰੂ".into(),
                transliteration: "vaahiguroo".into(),
                transliteration_hi: String::new(),
                translation: String::new(),
                composition_id: Some(5),
            }],
        }
    }

    #[tokio::test]
    async fn test_fallback_search_returns_shabad_lines() {
        let provider = InMemoryProvider::new().with_composition(shabad());
        let hits = provider
            .search(&SearchRequest::new("anything", SearchMode::FullWord))
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].shabad_id, 5);
        assert_eq!(provider.searches().len(), 1);
    }

    #[tokio::test]
    async fn test_canned_and_failing_modes() {
        let provider = InMemoryProvider::new()
            .with_composition(shabad())
            .with_search_results("www", SearchMode::EnglishFirstLetters, vec![])
            .failing_mode(SearchMode::Broad);

        let canned = provider
            .search(&SearchRequest::new("www", SearchMode::EnglishFirstLetters))
            .await
            .unwrap();
        assert!(canned.is_empty());

        let failed = provider
            .search(&SearchRequest::new("www", SearchMode::Broad))
            .await;
        assert!(matches!(failed, Err(ProviderError::Status { status: 503, .. })));
    }

    #[tokio::test]
    async fn test_catalog_counts_fetches() {
        let provider = InMemoryProvider::new().catalog_unavailable();
        assert!(provider.fetch_catalog().await.is_err());
        assert!(provider.fetch_catalog().await.is_err());
        assert_eq!(provider.catalog_fetches(), 2);
    }
}
