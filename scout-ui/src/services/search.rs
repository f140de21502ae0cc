//! Image search client
//!
//! Wraps the Custom Search JSON API in image mode. One call per user
//! action, no caching, no retry.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

const SEARCH_BASE_URL: &str = "https://www.googleapis.com/customsearch/v1";
const USER_AGENT: &str = concat!("PrintScout/", env!("CARGO_PKG_VERSION"));

/// Search client errors
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Search service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Search API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// One ranked image-search result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageResult {
    pub title: String,
    pub link: String,
    pub thumbnail: Option<String>,
    pub display_source: String,
}

/// Capability: image search by query text
#[async_trait]
pub trait ImageSearch: Send + Sync {
    /// Return up to `count` ranked results for `query`.
    ///
    /// An empty or whitespace query yields an empty result set without
    /// issuing a call.
    async fn search(&self, query: &str, count: u8) -> Result<Vec<ImageResult>, SearchError>;
}

/// Custom Search API response (image mode)
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    title: String,
    link: String,
    #[serde(rename = "displayLink")]
    display_link: String,
    pagemap: Option<PageMap>,
}

#[derive(Debug, Deserialize)]
struct PageMap {
    #[serde(rename = "cse_thumbnail", default)]
    cse_thumbnail: Vec<CseThumbnail>,
}

#[derive(Debug, Deserialize)]
struct CseThumbnail {
    src: Option<String>,
}

impl SearchItem {
    fn into_result(self) -> ImageResult {
        let thumbnail = self
            .pagemap
            .and_then(|p| p.cse_thumbnail.into_iter().next())
            .and_then(|t| t.src);

        ImageResult {
            title: self.title,
            link: self.link,
            thumbnail,
            display_source: self.display_link,
        }
    }
}

/// Custom Search API client
pub struct GoogleSearchClient {
    http_client: reqwest::Client,
    api_key: String,
    engine_id: String,
}

impl GoogleSearchClient {
    pub fn new(api_key: String, engine_id: String) -> Result<Self, SearchError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| SearchError::ServiceUnavailable(e.to_string()))?;

        Ok(Self {
            http_client,
            api_key,
            engine_id,
        })
    }
}

#[async_trait]
impl ImageSearch for GoogleSearchClient {
    async fn search(&self, query: &str, count: u8) -> Result<Vec<ImageResult>, SearchError> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let count = count.to_string();
        let params = [
            ("key", self.api_key.as_str()),
            ("cx", self.engine_id.as_str()),
            ("q", query),
            ("searchType", "image"),
            ("num", count.as_str()),
        ];

        tracing::debug!(query = query, "Querying image search API");

        let response = self
            .http_client
            .get(SEARCH_BASE_URL)
            .query(&params)
            .send()
            .await
            .map_err(|e| SearchError::ServiceUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SearchError::Api(status.as_u16(), error_text));
        }

        let search_response: SearchResponse = response
            .json()
            .await
            .map_err(|e| SearchError::Parse(e.to_string()))?;

        Ok(search_response
            .items
            .into_iter()
            .map(SearchItem::into_result)
            .collect())
    }
}
