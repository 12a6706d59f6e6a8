//! Live tracker for a continuous speech transcript
//!
//! The speech-to-text layer hands over its growing transcript. The tracker
//! cuts off the part already consumed by the last match, drops noise and
//! half-words, tries to continue inside the current composition, and only
//! then runs a full resolution. A newer fragment aborts the resolution still
//! in flight; the aborted call reports `Superseded`.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use gurbani_types::{ResolveRequest, ResolveResponse};
use tokio::task::AbortHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::engine::QueryEngine;
use crate::noise::is_noise;

/// Why a transcript update did not trigger any matching
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Nothing new since the last match
    NothingNew,
    Noise,
    /// Too little speech to search on yet
    TooShort,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TrackOutcome {
    Ignored(IgnoreReason),
    /// Matched a nearby line of the current composition
    Continued(ResolveResponse),
    /// Full resolution found a new match
    Resolved(ResolveResponse),
    NoMatch,
    /// A newer fragment replaced this one before it finished
    Superseded,
}

#[derive(Default)]
struct TrackerState {
    current: Option<ResolveResponse>,
    /// Transcript as it stood at the last successful match
    consumed: String,
    in_flight: Option<AbortHandle>,
    generation: u64,
}

/// At least two words, or one word longer than two characters
pub fn should_search(fragment: &str) -> bool {
    let words: Vec<&str> = fragment.split_whitespace().collect();
    match words.as_slice() {
        [] => false,
        [word] => word.chars().count() > 2,
        _ => true,
    }
}

#[derive(Clone)]
pub struct LiveTracker {
    id: Uuid,
    engine: Arc<QueryEngine>,
    state: Arc<Mutex<TrackerState>>,
}

impl LiveTracker {
    pub fn new(engine: Arc<QueryEngine>) -> Self {
        Self {
            id: Uuid::new_v4(),
            engine,
            state: Arc::new(Mutex::new(TrackerState::default())),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    fn state(&self) -> MutexGuard<'_, TrackerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current match, if any
    pub fn current(&self) -> Option<ResolveResponse> {
        self.state().current.clone()
    }

    /// Forget the consumed transcript, e.g. when listening stops. The current
    /// match stays so continuation still works after a restart.
    pub fn reset(&self) {
        let mut state = self.state();
        state.consumed.clear();
        if let Some(handle) = state.in_flight.take() {
            handle.abort();
        }
    }

    /// Part of the transcript not yet consumed by a match
    pub fn unmatched_speech(&self, transcript: &str) -> String {
        let state = self.state();
        transcript
            .strip_prefix(state.consumed.as_str())
            .unwrap_or(transcript)
            .trim()
            .to_string()
    }

    /// Feed the latest full transcript
    pub async fn handle_transcript(&self, transcript: &str) -> TrackOutcome {
        let fragment = self.unmatched_speech(transcript);
        if fragment.is_empty() {
            return TrackOutcome::Ignored(IgnoreReason::NothingNew);
        }
        if is_noise(&fragment) {
            debug!(tracker = %self.id, fragment, "Ignored as noise");
            return TrackOutcome::Ignored(IgnoreReason::Noise);
        }
        if !should_search(&fragment) {
            return TrackOutcome::Ignored(IgnoreReason::TooShort);
        }

        let current = self.current();
        if let Some(next) = current
            .as_ref()
            .and_then(|current| self.engine.continue_from(current, &fragment))
        {
            let mut state = self.state();
            state.current = Some(next.clone());
            state.consumed = transcript.to_string();
            return TrackOutcome::Continued(next);
        }

        self.resolve(transcript, fragment).await
    }

    async fn resolve(&self, transcript: &str, fragment: String) -> TrackOutcome {
        let (handle, generation) = {
            let mut state = self.state();
            if let Some(previous) = state.in_flight.take() {
                previous.abort();
            }
            state.generation += 1;
            let engine = self.engine.clone();
            let request = ResolveRequest::text(fragment);
            let handle = tokio::spawn(async move { engine.resolve(&request).await });
            state.in_flight = Some(handle.abort_handle());
            (handle, state.generation)
        };

        let result = handle.await;
        let mut state = self.state();
        if state.generation == generation {
            state.in_flight = None;
        }

        match result {
            Err(e) if e.is_cancelled() => TrackOutcome::Superseded,
            Err(e) => {
                warn!(tracker = %self.id, error = %e, "Resolution task failed");
                TrackOutcome::NoMatch
            }
            Ok(Err(e)) => {
                warn!(tracker = %self.id, error = %e, "Resolution rejected");
                TrackOutcome::NoMatch
            }
            Ok(Ok(_)) if state.generation != generation => TrackOutcome::Superseded,
            Ok(Ok(response)) if response.is_match() => {
                info!(tracker = %self.id, confidence = response.confidence, "Resolved");
                state.current = Some(response.clone());
                state.consumed = transcript.to_string();
                TrackOutcome::Resolved(response)
            }
            Ok(Ok(_)) => TrackOutcome::NoMatch,
        }
    }
}
