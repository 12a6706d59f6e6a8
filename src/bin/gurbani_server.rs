//! Gurbani Search REST API Server
//!
//! ## Usage
//!
//! ```bash
//! # Start the server
//! cargo run --bin gurbani_server --features server
//!
//! # Resolve a phrase
//! curl -X POST http://localhost:3000/api/search \
//!   -H "Content-Type: application/json" \
//!   -d '{"query": "thir ghar baiso", "isAcronym": false}'
//!
//! curl http://localhost:3000/health
//! ```
//!
//! Configuration comes from `GURBANI_SEARCH_CONFIG` (default
//! `config/gurbani_search.yaml`), with `BANIDB_BASE_URL` and
//! `GURBANI_SEARCH_ADDR` overriding single fields.

use std::sync::Arc;

use anyhow::Context;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use banidb_client::HttpProvider;
use gurbani_search::api::create_search_router;
use gurbani_search::{QueryEngine, ResolverConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gurbani_search=info,banidb_client=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ResolverConfig::from_env().context("loading configuration")?;
    tracing::info!(
        provider = %config.provider.base_url,
        pacing_ms = config.cascade.pacing_delay_ms,
        catalog_ttl_hours = config.catalog.ttl_hours,
        "Configuration loaded"
    );

    let provider = Arc::new(HttpProvider::new(config.provider.http())?);
    let engine = Arc::new(QueryEngine::new(provider, &config));

    let app = create_search_router(engine)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&config.server.addr)
        .await
        .with_context(|| format!("binding {}", config.server.addr))?;
    tracing::info!(addr = %config.server.addr, "Gurbani search server listening");

    axum::serve(listener, app).await?;
    Ok(())
}
