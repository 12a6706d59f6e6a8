//! BaniDB HTTP provider
//!
//! reqwest client with a fixed per-call timeout. Non-success statuses and
//! undecodable bodies surface as errors; the resolver decides how to degrade.

use std::time::Duration;

use async_trait::async_trait;
use gurbani_types::{CatalogEntry, Composition, CompositionKind, CompositionRef, VerseCandidate};
use reqwest::Client;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::{wire, ProviderError, Result, ScriptureProvider, SearchRequest};

pub const DEFAULT_BASE_URL: &str = "https://api.banidb.com/v2";
pub const DEFAULT_USER_AGENT: &str = "GurbaniProjector/1.0";
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Connection settings for [`HttpProvider`]
#[derive(Debug, Clone)]
pub struct HttpProviderConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for HttpProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

pub struct HttpProvider {
    client: Client,
    base_url: Url,
}

impl HttpProvider {
    pub fn new(config: HttpProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .build()?;

        // A trailing slash keeps `join`/path pushes relative to the version prefix
        let mut base_url = Url::parse(&config.base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build `{base}/{segments...}` with each segment percent-encoded
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ProviderError::Malformed("base url cannot be a base".into()))?;
            path.pop_if_empty();
            for segment in segments {
                path.push(segment);
            }
        }
        Ok(url)
    }

    pub fn search_url(&self, request: &SearchRequest) -> Result<Url> {
        let mut url = self.endpoint(&["search", &request.text])?;
        url.query_pairs_mut()
            .append_pair("searchtype", &request.mode.code().to_string())
            .append_pair("source", &request.source)
            .append_pair("results", &request.limit.to_string());
        Ok(url)
    }

    pub fn composition_url(&self, reference: &CompositionRef) -> Result<Url> {
        let id = reference.id.to_string();
        match reference.kind {
            CompositionKind::Bani => self.endpoint(&["banis", &id]),
            CompositionKind::Shabad => self.endpoint(&["shabads", &id]),
        }
    }

    async fn get_json(&self, url: Url) -> Result<Value> {
        debug!(%url, "GET");
        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| ProviderError::Malformed(e.to_string()))
    }
}

#[async_trait]
impl ScriptureProvider for HttpProvider {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<VerseCandidate>> {
        let body = self.get_json(self.search_url(request)?).await?;
        wire::parse_search(&body).map_err(ProviderError::Malformed)
    }

    async fn fetch_composition(&self, reference: &CompositionRef) -> Result<Option<Composition>> {
        let body = self.get_json(self.composition_url(reference)?).await?;
        Ok(wire::parse_composition(&body, *reference))
    }

    async fn fetch_catalog(&self) -> Result<Vec<CatalogEntry>> {
        let body = self.get_json(self.endpoint(&["banis"])?).await?;
        wire::parse_catalog(&body).map_err(ProviderError::Malformed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gurbani_types::SearchMode;

    fn provider() -> HttpProvider {
        HttpProvider::new(HttpProviderConfig::default()).unwrap()
    }

    #[test]
    fn test_search_url_encodes_query() {
        let url = provider()
            .search_url(&SearchRequest::new("thir ghar baiso", SearchMode::FullWord))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.banidb.com/v2/search/thir%20ghar%20baiso?searchtype=4&source=all&results=50"
        );
    }

    #[test]
    fn test_composition_urls() {
        let p = provider();
        assert_eq!(
            p.composition_url(&CompositionRef::bani(2)).unwrap().as_str(),
            "https://api.banidb.com/v2/banis/2"
        );
        assert_eq!(
            p.composition_url(&CompositionRef::shabad(31020))
                .unwrap()
                .as_str(),
            "https://api.banidb.com/v2/shabads/31020"
        );
    }

    #[test]
    fn test_base_url_with_trailing_slash() {
        let p = HttpProvider::new(HttpProviderConfig {
            base_url: "http://localhost:8080/v2/".into(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(
            p.endpoint(&["banis"]).unwrap().as_str(),
            "http://localhost:8080/v2/banis"
        );
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let result = HttpProvider::new(HttpProviderConfig {
            base_url: "not a url".into(),
            ..Default::default()
        });
        assert!(matches!(result, Err(ProviderError::Url(_))));
    }
}
