//! ScriptureProvider trait: the sole API boundary between the resolver and
//! the verse corpus. The resolver depends on this crate, never on a concrete
//! HTTP service.
//!
//! Three consumed interfaces:
//! - verse search (query text + search-type code → candidate verses)
//! - composition fetch (bani or shabad id → ordered lines)
//! - catalog fetch (all named compositions)

pub mod http;
pub mod memory;
pub mod wire;

pub use http::{HttpProvider, HttpProviderConfig};
pub use memory::InMemoryProvider;

use async_trait::async_trait;
use gurbani_types::{CatalogEntry, Composition, CompositionRef, SearchMode, VerseCandidate};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProviderError>;

/// Default corpus scope
pub const DEFAULT_SOURCE: &str = "all";

/// Default result limit per search call
pub const DEFAULT_RESULT_LIMIT: usize = 50;

/// Failures talking to a provider
///
/// Callers in the resolver treat every variant as "no candidates"; the
/// variants exist so logs can tell a timeout from a bad payload.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed provider response: {0}")]
    Malformed(String),

    #[error("invalid provider url: {0}")]
    Url(#[from] url::ParseError),
}

/// One verse search call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub text: String,
    pub mode: SearchMode,
    /// Corpus scope
    pub source: String,
    pub limit: usize,
}

impl SearchRequest {
    pub fn new(text: impl Into<String>, mode: SearchMode) -> Self {
        Self {
            text: text.into(),
            mode,
            source: DEFAULT_SOURCE.to_string(),
            limit: DEFAULT_RESULT_LIMIT,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

#[async_trait]
pub trait ScriptureProvider: Send + Sync {
    /// Verse search; an empty list means no hits
    async fn search(&self, request: &SearchRequest) -> Result<Vec<VerseCandidate>>;

    /// Whole composition in line order; `None` when the provider has no such id
    async fn fetch_composition(&self, reference: &CompositionRef) -> Result<Option<Composition>>;

    /// Full catalog of named compositions
    async fn fetch_catalog(&self) -> Result<Vec<CatalogEntry>>;
}
