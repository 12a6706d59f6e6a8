//! Time-bounded cache of the provider's composition catalog
//!
//! Process-wide, read by every request, written only by the refresh path.
//! A refresh replaces the whole snapshot; two overlapping requests may both
//! refetch, and the later write wins. Provider failures never escape: the
//! cache serves the stale snapshot if it has one, else an empty list.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use banidb_client::ScriptureProvider;
use chrono::{DateTime, Utc};
use gurbani_types::CatalogEntry;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::config::CatalogConfig;

/// Source of "now" for freshness checks
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: chrono::Duration) {
        if let Ok(mut now) = self.now.lock() {
            *now += by;
        }
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.lock().map(|now| *now).unwrap_or_else(|_| Utc::now())
    }
}

#[derive(Debug, Clone)]
struct Snapshot {
    entries: Arc<Vec<CatalogEntry>>,
    fetched_at: DateTime<Utc>,
}

pub struct CatalogCache {
    provider: Arc<dyn ScriptureProvider>,
    clock: Arc<dyn Clock>,
    ttl: chrono::Duration,
    fetch_timeout: Duration,
    snapshot: RwLock<Option<Snapshot>>,
}

impl CatalogCache {
    pub fn new(provider: Arc<dyn ScriptureProvider>, config: &CatalogConfig) -> Self {
        Self {
            provider,
            clock: Arc::new(SystemClock),
            ttl: config.ttl(),
            fetch_timeout: config.fetch_timeout(),
            snapshot: RwLock::new(None),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// An empty snapshot is never fresh
    fn is_fresh(&self, snapshot: &Snapshot, now: DateTime<Utc>) -> bool {
        !snapshot.entries.is_empty()
            && now.signed_duration_since(snapshot.fetched_at) < self.ttl
    }

    /// Current catalog, refreshing first when empty or expired
    pub async fn entries(&self) -> Arc<Vec<CatalogEntry>> {
        let now = self.clock.now();
        {
            let guard = self.snapshot.read().await;
            if let Some(snapshot) = guard.as_ref() {
                if self.is_fresh(snapshot, now) {
                    return snapshot.entries.clone();
                }
            }
        }

        match tokio::time::timeout(self.fetch_timeout, self.provider.fetch_catalog()).await {
            Ok(Ok(entries)) => {
                info!(count = entries.len(), "Catalog refreshed");
                let entries = Arc::new(entries);
                *self.snapshot.write().await = Some(Snapshot {
                    entries: entries.clone(),
                    fetched_at: now,
                });
                return entries;
            }
            Ok(Err(e)) => warn!(error = %e, "Catalog refresh failed"),
            Err(_) => warn!(
                timeout_ms = self.fetch_timeout.as_millis() as u64,
                "Catalog refresh timed out"
            ),
        }

        match self.snapshot.read().await.as_ref() {
            Some(stale) => {
                debug!(fetched_at = %stale.fetched_at, "Serving stale catalog");
                stale.entries.clone()
            }
            None => Arc::new(Vec::new()),
        }
    }

    /// When the current snapshot was fetched, if there is one
    pub async fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.snapshot.read().await.as_ref().map(|s| s.fetched_at)
    }
}
