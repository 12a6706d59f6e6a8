//! One-shot query tool
//!
//! ```bash
//! cargo run --bin gurbani_cli --features cli -- "thir ghar baiso"
//! cargo run --bin gurbani_cli --features cli -- "w w w" --is-acronym
//! ```
//!
//! Prints the resolution as pretty JSON.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use banidb_client::HttpProvider;
use gurbani_search::{QueryEngine, ResolveRequest, ResolverConfig};

#[derive(Parser, Debug)]
#[command(name = "gurbani_cli", about = "Resolve a phrase into a line of Gurbani")]
struct Args {
    /// Phrase to resolve (Gurmukhi, Devanagari or Roman)
    query: String,

    /// Acronym already derived from the phrase
    #[arg(long)]
    acronym: Option<String>,

    /// Treat the phrase itself as a first-letter acronym
    #[arg(long)]
    is_acronym: bool,

    /// Provider base URL
    #[arg(long, env = "BANIDB_BASE_URL")]
    base_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gurbani_search=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let mut config = ResolverConfig::from_env().context("loading configuration")?;
    if let Some(base_url) = args.base_url {
        config.provider.base_url = base_url;
        config.validate()?;
    }

    let provider = Arc::new(HttpProvider::new(config.provider.http())?);
    let engine = QueryEngine::new(provider, &config);

    let request = ResolveRequest {
        query: args.query,
        acronym: args.acronym,
        is_acronym: args.is_acronym,
    };
    let response = engine.resolve(&request).await?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
