//! Gurbani Search - resolves noisy spoken or typed phrases to a line of Gurbani
//!
//! ## Architecture
//!
//! ```text
//!   transcript ──► LiveTracker ──► noise / continuation ──┐
//!                                                         │
//!   POST /api/search ─────────────────────────────────────┼──► QueryEngine
//!                                                         │
//!   QueryEngine:  normalize ─► commands ─► shortcuts ─► StrategyCascade ─► Scorer
//!                                  │                          │
//!                             CatalogCache              ScriptureProvider
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use banidb_client::HttpProvider;
//! use gurbani_search::{QueryEngine, ResolveRequest, ResolverConfig};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = ResolverConfig::from_env()?;
//! let provider = Arc::new(HttpProvider::new(config.provider.http())?);
//! let engine = QueryEngine::new(provider, &config);
//! let response = engine.resolve(&ResolveRequest::text("thir ghar baiso")).await?;
//! println!("{:?}", response.matched);
//! # Ok(())
//! # }
//! ```

// Core error handling
pub mod error;

// Configuration (YAML + environment overrides)
pub mod config;

// Text handling
pub mod noise;
pub mod normalize;

// Composition commands, shortcuts and the catalog cache
pub mod catalog;

// Free-form search
pub mod cascade;
pub mod scoring;

// Same-composition continuation
pub mod continuation;

// Entry points
pub mod engine;
pub mod session;

// REST API
pub mod api;

pub use config::ResolverConfig;
pub use engine::QueryEngine;
pub use error::{ConfigError, EngineError};
pub use gurbani_types::{
    Composition, CompositionRef, MatchStrategy, ResolveRequest, ResolveResponse, Script,
    SearchMode, Verse, VerseCandidate,
};
pub use normalize::Query;
pub use session::{LiveTracker, TrackOutcome};
