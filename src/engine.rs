//! Query engine: the single entry point that turns a request into a match
//!
//! ```text
//!   ResolveRequest
//!        │
//!        ▼
//!   empty? ── yes ──► EngineError::EmptyQuery
//!        │
//!        ▼
//!   CommandResolver::resolve_composition ── hit ──► fetch bani ──► locate_line
//!        │ miss / fetch failed                         (confidence 100)
//!        ▼
//!   CommandResolver::shortcut ── hit ──► fetch shabad ──► shortcut line
//!        │ miss                                          (confidence 100)
//!        ▼
//!   StrategyCascade::run ── hit ──► fetch shabad ──► re-resolve line by id
//!        │ miss                                       (cascade confidence)
//!        ▼
//!   no match
//! ```
//!
//! The matched verse always comes out of the fetched composition, never
//! from the search response, so the two always agree.

use std::sync::Arc;
use std::time::Duration;

use banidb_client::ScriptureProvider;
use gurbani_types::{
    Composition, CompositionRef, MatchStrategy, ResolveRequest, ResolveResponse,
};
use tracing::{debug, info, instrument, warn};

use crate::cascade::StrategyCascade;
use crate::catalog::{CatalogCache, CommandResolver, Shortcut};
use crate::config::ResolverConfig;
use crate::continuation::{locate_line, ContinuationMatcher};
use crate::error::EngineError;
use crate::normalize::Query;

/// Confidence reported for command and shortcut hits
pub const DIRECT_CONFIDENCE: u8 = 100;

pub struct QueryEngine {
    provider: Arc<dyn ScriptureProvider>,
    commands: CommandResolver,
    cascade: StrategyCascade,
    continuation: ContinuationMatcher,
    fetch_timeout: Duration,
}

impl QueryEngine {
    /// Engine with its own catalog cache on the wall clock
    pub fn new(provider: Arc<dyn ScriptureProvider>, config: &ResolverConfig) -> Self {
        let catalog = Arc::new(CatalogCache::new(provider.clone(), &config.catalog));
        Self::with_catalog(provider, catalog, config)
    }

    /// Engine sharing an existing catalog cache
    pub fn with_catalog(
        provider: Arc<dyn ScriptureProvider>,
        catalog: Arc<CatalogCache>,
        config: &ResolverConfig,
    ) -> Self {
        Self {
            commands: CommandResolver::new(catalog, config.catalog.fuzzy_threshold),
            cascade: StrategyCascade::new(provider.clone(), config),
            continuation: ContinuationMatcher::new(&config.continuation),
            fetch_timeout: config.cascade.call_timeout(),
            provider,
        }
    }

    /// Resolve a request into a match, or a normal "no match" response
    #[instrument(skip(self, request), fields(query = %request.query, is_acronym = request.is_acronym))]
    pub async fn resolve(&self, request: &ResolveRequest) -> Result<ResolveResponse, EngineError> {
        if request.query.trim().is_empty() {
            return Err(EngineError::EmptyQuery);
        }
        let query = Query::new(
            &request.query,
            request.acronym.as_deref(),
            request.is_acronym,
        );
        debug!(
            normalized = query.normalized(),
            acronym = query.acronym(),
            script = ?query.script(),
            "Query normalized"
        );

        if let Some(command) = self.commands.resolve_composition(&query).await {
            match self.fetch(&command.reference).await {
                Some(mut composition) => {
                    if let Some(name) = command.name {
                        composition.name = name;
                    }
                    let index = locate_line(&query, &composition.lines);
                    let verse = composition.lines[index].clone();
                    info!(
                        composition = %composition.reference,
                        verse_id = verse.id,
                        source = ?command.source,
                        "Composition command"
                    );
                    return Ok(ResolveResponse::matched(
                        verse,
                        composition,
                        DIRECT_CONFIDENCE,
                        MatchStrategy::CompositionCommand,
                    ));
                }
                None => warn!(
                    composition = %command.reference,
                    "Composition unavailable, falling back to search"
                ),
            }
        }

        if let Some(shortcut) = self.commands.shortcut(&query) {
            return Ok(self.open_shortcut(&query, shortcut).await);
        }

        let Some(hit) = self.cascade.run(&query).await else {
            return Ok(ResolveResponse::no_match());
        };
        let Some(composition) = self.fetch(&CompositionRef::shabad(hit.candidate.shabad_id)).await
        else {
            return Ok(ResolveResponse::no_match());
        };
        let verse = match composition.line(hit.candidate.verse_id) {
            Some(line) => line.clone(),
            None => {
                debug!(
                    verse_id = hit.candidate.verse_id,
                    "Matched verse missing from shabad, using first line"
                );
                composition.lines[0].clone()
            }
        };
        Ok(ResolveResponse::matched(
            verse,
            composition,
            hit.confidence,
            MatchStrategy::Search { mode: hit.mode },
        ))
    }

    async fn open_shortcut(&self, query: &Query, shortcut: Shortcut) -> ResolveResponse {
        let Some(composition) = self.fetch(&CompositionRef::shabad(shortcut.shabad_id)).await
        else {
            return ResolveResponse::no_match();
        };
        let index = shortcut
            .verse_id
            .and_then(|id| composition.position(id))
            .unwrap_or_else(|| locate_line(query, &composition.lines));
        let verse = composition.lines[index].clone();
        info!(
            shabad_id = shortcut.shabad_id,
            verse_id = verse.id,
            "Shortcut"
        );
        ResolveResponse::matched(
            verse,
            composition,
            DIRECT_CONFIDENCE,
            MatchStrategy::ExplicitShortcut,
        )
    }

    /// Non-empty composition, or `None` on any failure
    async fn fetch(&self, reference: &CompositionRef) -> Option<Composition> {
        match tokio::time::timeout(self.fetch_timeout, self.provider.fetch_composition(reference))
            .await
        {
            Ok(Ok(Some(composition))) if !composition.is_empty() => Some(composition),
            Ok(Ok(_)) => {
                warn!(composition = %reference, "Composition missing or empty");
                None
            }
            Ok(Err(e)) => {
                warn!(composition = %reference, error = %e, "Composition fetch failed");
                None
            }
            Err(_) => {
                warn!(composition = %reference, "Composition fetch timed out");
                None
            }
        }
    }

    /// Advance within the current composition without a provider call
    pub fn continue_from(
        &self,
        current: &ResolveResponse,
        fragment: &str,
    ) -> Option<ResolveResponse> {
        let composition = current.composition.as_ref()?;
        let verse = current.matched.as_ref()?;
        let strategy = current.strategy?;
        let hit = self.continuation.next_line(composition, verse.id, fragment)?;
        let line = composition.lines.get(hit.index)?.clone();
        debug!(from = verse.id, to = line.id, confidence = hit.confidence, "Continuation");
        Some(ResolveResponse::matched(
            line,
            composition.clone(),
            hit.confidence,
            strategy,
        ))
    }
}
