//! Strategy cascade for free-form queries
//!
//! Builds an ordered list of (search text, search mode) pairs and runs them
//! one at a time against the provider:
//!
//! ```text
//!   explicit acronym?  ── yes ──► acronym variants only
//!          │ no
//!          ▼
//!   FullWord(text) → Broad(text) → [tokens > 1] acronym variants
//!
//!   acronym variants: Roman          → EnglishFirstLetters, GurmukhiFirstLetters
//!                     Gurmukhi input → GurmukhiFirstLetters
//! ```
//!
//! Every call waits out the pacing delay first and is bounded by the
//! per-call timeout. Timeouts, provider errors and empty responses skip to
//! the next strategy. The first strategy whose best candidate clears the
//! threshold wins.

use std::sync::Arc;
use std::time::Duration;

use banidb_client::{ScriptureProvider, SearchRequest};
use gurbani_types::{Script, SearchMode, VerseCandidate};
use tracing::{debug, info, instrument, warn};

use crate::config::{ResolverConfig, ScoringConfig};
use crate::normalize::Query;
use crate::scoring::{threshold, Scorer};

/// One planned search call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Strategy {
    pub text: String,
    pub mode: SearchMode,
}

impl Strategy {
    fn new(text: &str, mode: SearchMode) -> Self {
        Self {
            text: text.to_string(),
            mode,
        }
    }
}

/// Candidate that cleared the threshold
#[derive(Debug, Clone, PartialEq)]
pub struct CascadeHit {
    pub candidate: VerseCandidate,
    pub confidence: u8,
    pub mode: SearchMode,
}

/// Acronym search modes worth trying for a script
fn acronym_modes(script: Script) -> &'static [SearchMode] {
    match script {
        Script::Roman => &[
            SearchMode::EnglishFirstLetters,
            SearchMode::GurmukhiFirstLetters,
        ],
        Script::Native | Script::SecondaryIndic => &[SearchMode::GurmukhiFirstLetters],
    }
}

/// Ordered strategies for a query
pub fn build_strategies(query: &Query) -> Vec<Strategy> {
    let acronym_variants = || {
        let acronym = query.acronym();
        acronym_modes(query.script())
            .iter()
            .filter(move |_| !acronym.is_empty())
            .map(move |mode| Strategy::new(acronym, *mode))
    };

    if query.is_explicit_acronym() {
        return acronym_variants().collect();
    }

    let text = query.search_text();
    let mut strategies = Vec::new();
    if !text.is_empty() {
        strategies.push(Strategy::new(text, SearchMode::FullWord));
        strategies.push(Strategy::new(text, SearchMode::Broad));
    }
    if query.token_count() > 1 {
        strategies.extend(acronym_variants());
    }
    strategies
}

pub struct StrategyCascade {
    provider: Arc<dyn ScriptureProvider>,
    pacing_delay: Duration,
    call_timeout: Duration,
    source: String,
    result_limit: usize,
    scoring: ScoringConfig,
}

impl StrategyCascade {
    pub fn new(provider: Arc<dyn ScriptureProvider>, config: &ResolverConfig) -> Self {
        Self {
            provider,
            pacing_delay: config.cascade.pacing_delay(),
            call_timeout: config.cascade.call_timeout(),
            source: config.provider.source.clone(),
            result_limit: config.provider.result_limit,
            scoring: config.scoring.clone(),
        }
    }

    /// Candidates for one strategy; `None` means skip
    async fn attempt(&self, strategy: &Strategy) -> Option<Vec<VerseCandidate>> {
        tokio::time::sleep(self.pacing_delay).await;

        let request = SearchRequest::new(&strategy.text, strategy.mode)
            .with_source(&self.source)
            .with_limit(self.result_limit);

        match tokio::time::timeout(self.call_timeout, self.provider.search(&request)).await {
            Ok(Ok(candidates)) if candidates.is_empty() => {
                debug!(mode = %strategy.mode, "No candidates");
                None
            }
            Ok(Ok(candidates)) => Some(candidates),
            Ok(Err(e)) => {
                warn!(mode = %strategy.mode, error = %e, "Search failed, skipping strategy");
                None
            }
            Err(_) => {
                warn!(
                    mode = %strategy.mode,
                    timeout_ms = self.call_timeout.as_millis() as u64,
                    "Search timed out, skipping strategy"
                );
                None
            }
        }
    }

    /// Run the cascade; `None` when no strategy clears the threshold
    #[instrument(skip(self, query), fields(query = %query.search_text(), script = ?query.script()))]
    pub async fn run(&self, query: &Query) -> Option<CascadeHit> {
        let strategies = build_strategies(query);
        let scorer = Scorer::new(query);
        let required = threshold(&self.scoring, query.normalized_len());
        debug!(
            strategies = strategies.len(),
            threshold = required,
            "Starting cascade"
        );

        for strategy in &strategies {
            let Some(candidates) = self.attempt(strategy).await else {
                continue;
            };
            let Some(best) = scorer.select_best(&candidates, strategy.mode) else {
                continue;
            };
            let candidate = &candidates[best];
            let confidence = scorer.confidence(candidate, strategy.mode);
            debug!(
                mode = %strategy.mode,
                verse_id = candidate.verse_id,
                confidence,
                "Best candidate"
            );

            if confidence >= required {
                info!(
                    mode = %strategy.mode,
                    verse_id = candidate.verse_id,
                    shabad_id = candidate.shabad_id,
                    confidence,
                    "Cascade matched"
                );
                return Some(CascadeHit {
                    candidate: candidate.clone(),
                    confidence,
                    mode: strategy.mode,
                });
            }
        }

        info!("Cascade exhausted without a match");
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use banidb_client::InMemoryProvider;
    use gurbani_types::{CatalogEntry, Composition, CompositionRef};

    fn modes(strategies: &[Strategy]) -> Vec<SearchMode> {
        strategies.iter().map(|s| s.mode).collect()
    }

    #[test]
    fn test_roman_sentence_strategies() {
        let strategies = build_strategies(&Query::text("Thir Ghar Baiso"));
        assert_eq!(
            modes(&strategies),
            vec![
                SearchMode::FullWord,
                SearchMode::Broad,
                SearchMode::EnglishFirstLetters,
                SearchMode::GurmukhiFirstLetters,
            ]
        );
        assert_eq!(strategies[0].text, "thir ghar baiso");
        assert_eq!(strategies[2].text, "tgb");
    }

    #[test]
    fn test_single_word_skips_acronym() {
        let strategies = build_strategies(&Query::text("sachiaar"));
        assert_eq!(modes(&strategies), vec![SearchMode::FullWord, SearchMode::Broad]);
    }

    #[test]
    fn test_explicit_acronym_skips_full_text() {
        let strategies = build_strategies(&Query::new("t g b", None, true));
        assert_eq!(
            modes(&strategies),
            vec![
                SearchMode::EnglishFirstLetters,
                SearchMode::GurmukhiFirstLetters
            ]
        );
        assert!(strategies.iter().all(|s| s.text == "tgb"));
    }

    #[test]
    fn test_gurmukhi_uses_gurmukhi_letters_only() {
        let strategies = build_strategies(&Query::text("ਸੋ ਸਤਿਗੁਰੁ ਪਿਆਰਾ"));
        assert_eq!(
            modes(&strategies),
            vec![
                SearchMode::FullWord,
                SearchMode::Broad,
                SearchMode::GurmukhiFirstLetters
            ]
        );
        assert_eq!(strategies[2].text, "ਸਸਪ");
    }

    #[test]
    fn test_devanagari_searches_transliterated_text() {
        let strategies = build_strategies(&Query::text("वाहेगुरु"));
        assert_eq!(strategies[0].text, "ਵਾਹੇਗੁਰੁ");
    }

    fn quick_config() -> ResolverConfig {
        let mut config = ResolverConfig::default();
        config.cascade.pacing_delay_ms = 0;
        config
    }

    fn hit(verse_id: u32, transliteration: &str) -> VerseCandidate {
        VerseCandidate {
            verse_id,
            shabad_id: 900,
            gurmukhi: String::new(),
            transliteration: transliteration.to_string(),
        }
    }

    #[tokio::test]
    async fn test_failures_and_empty_results_are_skipped() {
        let provider = Arc::new(
            InMemoryProvider::new()
                .failing_mode(SearchMode::FullWord)
                .with_search_results("thir ghar baiso", SearchMode::Broad, vec![])
                .with_search_results(
                    "tgb",
                    SearchMode::EnglishFirstLetters,
                    vec![hit(1, "thir ghar baiso har jan")],
                ),
        );
        let cascade = StrategyCascade::new(provider.clone(), &quick_config());
        let result = cascade.run(&Query::text("thir ghar baiso")).await.unwrap();

        assert_eq!(result.mode, SearchMode::EnglishFirstLetters);
        assert_eq!(result.candidate.verse_id, 1);
        assert_eq!(result.confidence, 70);
        assert_eq!(provider.searches().len(), 3);
    }

    #[tokio::test]
    async fn test_stops_at_first_strategy_over_threshold() {
        let provider = Arc::new(InMemoryProvider::new().with_search_results(
            "thir ghar baiso",
            SearchMode::FullWord,
            vec![hit(1, "sach kahon"), hit(2, "thir ghar baiso har jan piaare")],
        ));
        let cascade = StrategyCascade::new(provider.clone(), &quick_config());
        let result = cascade.run(&Query::text("thir ghar baiso")).await.unwrap();

        assert_eq!(result.candidate.verse_id, 2);
        assert_eq!(result.mode, SearchMode::FullWord);
        assert!(result.confidence >= 80);
        assert_eq!(provider.searches().len(), 1);
        assert_eq!(provider.searches()[0].source, "all");
        assert_eq!(provider.searches()[0].limit, 50);
    }

    /// Full-word searches stall past the call timeout; other modes answer
    struct StalledFullWord {
        results: Vec<VerseCandidate>,
    }

    #[async_trait]
    impl ScriptureProvider for StalledFullWord {
        async fn search(
            &self,
            request: &SearchRequest,
        ) -> banidb_client::Result<Vec<VerseCandidate>> {
            if request.mode == SearchMode::FullWord {
                tokio::time::sleep(Duration::from_secs(60)).await;
            }
            Ok(self.results.clone())
        }

        async fn fetch_composition(
            &self,
            _: &CompositionRef,
        ) -> banidb_client::Result<Option<Composition>> {
            Ok(None)
        }

        async fn fetch_catalog(&self) -> banidb_client::Result<Vec<CatalogEntry>> {
            Ok(vec![])
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_timed_out_strategy_is_skipped() {
        let provider = Arc::new(StalledFullWord {
            results: vec![hit(7, "thir ghar baiso har jan piaare")],
        });
        let cascade = StrategyCascade::new(provider, &ResolverConfig::default());
        let started = tokio::time::Instant::now();

        let result = cascade.run(&Query::text("thir ghar baiso")).await.unwrap();

        assert_eq!(result.mode, SearchMode::Broad);
        assert_eq!(result.candidate.verse_id, 7);
        assert!(result.confidence >= 80);
        // two paced calls plus one 5 s timeout, never the 60 s stall
        assert!(started.elapsed() >= Duration::from_secs(5));
        assert!(started.elapsed() < Duration::from_secs(60));
    }

    #[tokio::test(start_paused = true)]
    async fn test_pacing_delay_precedes_each_call() {
        let provider = Arc::new(InMemoryProvider::new());
        let cascade = StrategyCascade::new(provider.clone(), &ResolverConfig::default());
        let started = tokio::time::Instant::now();

        assert!(cascade.run(&Query::text("zzxq flkk")).await.is_none());
        assert_eq!(provider.searches().len(), 4);
        assert!(started.elapsed() >= Duration::from_millis(1200));
    }
}
