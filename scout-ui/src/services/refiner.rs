//! Query refiner client
//!
//! Sends a fixed instructional prompt plus the user's raw idea to the
//! Generative Language API and returns the trimmed suggestion. The reply
//! is passed through as-is beyond whitespace trimming; an empty or
//! malformed completion becomes the empty string.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

const GENERATE_BASE_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent";
const USER_AGENT: &str = concat!("PrintScout/", env!("CARGO_PKG_VERSION"));

/// Refiner client errors
#[derive(Debug, Error)]
pub enum RefinerError {
    #[error("Refiner service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Refiner API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Capability: free text in, search-oriented phrase out
#[async_trait]
pub trait QueryRefiner: Send + Sync {
    /// Refine raw user text into a search query.
    ///
    /// The call is issued even for empty input; whatever the model says
    /// comes back trimmed, with no further validation.
    async fn refine(&self, raw_text: &str) -> Result<String, RefinerError>;
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GenerateResponse {
    /// First candidate's text, trimmed; empty when the reply carries none.
    fn into_text(self) -> String {
        self.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<String>()
            })
            .unwrap_or_default()
            .trim()
            .to_string()
    }
}

/// Build the fixed instructional prompt around the user's idea
fn build_prompt(original_query: &str) -> String {
    format!(
        r#"
    You are a helpful search assistant for a kid who wants to 3D print something.
    Your job is to take the user's raw idea and turn it into a concise, effective search query for finding 3D models.
    The query should use terms common in the 3D printing world.
    For example, if the user says "a fast car", a good refined query would be "racing car model print-in-place".
    If the user says "a little box for my toys", a good refined query would be "small toy container with lid".

    User's idea: "{}"

    Refined search query:
    "#,
        original_query
    )
}

/// Generative Language API client
pub struct GeminiClient {
    http_client: reqwest::Client,
    api_key: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Result<Self, RefinerError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| RefinerError::ServiceUnavailable(e.to_string()))?;

        Ok(Self {
            http_client,
            api_key,
        })
    }
}

#[async_trait]
impl QueryRefiner for GeminiClient {
    async fn refine(&self, raw_text: &str) -> Result<String, RefinerError> {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: build_prompt(raw_text),
                }],
            }],
        };

        tracing::debug!("Querying generative language API");

        let response = self
            .http_client
            .post(GENERATE_BASE_URL)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| RefinerError::ServiceUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(RefinerError::Api(status.as_u16(), error_text));
        }

        let generate_response: GenerateResponse = response
            .json()
            .await
            .map_err(|e| RefinerError::Parse(e.to_string()))?;

        Ok(generate_response.into_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_creation() {
        assert!(GeminiClient::new("key".to_string()).is_ok());
    }

    #[test]
    fn prompt_embeds_raw_idea() {
        let prompt = build_prompt("a fast car");
        assert!(prompt.contains(r#"User's idea: "a fast car""#));
        assert!(prompt.contains("3D print"));
    }

    #[test]
    fn prompt_passes_empty_input_through() {
        // Passthrough contract: empty input still produces a full prompt
        let prompt = build_prompt("");
        assert!(prompt.contains(r#"User's idea: """#));
    }

    #[test]
    fn response_text_is_trimmed() {
        let payload = r#"{
            "candidates": [{
                "content": {"parts": [{"text": "  racing car model print-in-place\n"}]}
            }]
        }"#;

        let response: GenerateResponse = serde_json::from_str(payload).unwrap();
        assert_eq!(response.into_text(), "racing car model print-in-place");
    }

    #[test]
    fn multi_part_reply_concatenates() {
        let payload = r#"{
            "candidates": [{
                "content": {"parts": [{"text": "small toy "}, {"text": "container with lid"}]}
            }]
        }"#;

        let response: GenerateResponse = serde_json::from_str(payload).unwrap();
        assert_eq!(response.into_text(), "small toy container with lid");
    }

    #[test]
    fn empty_or_malformed_reply_becomes_empty_string() {
        let no_candidates: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(no_candidates.into_text(), "");

        let no_content: GenerateResponse =
            serde_json::from_str(r#"{"candidates": [{}]}"#).unwrap();
        assert_eq!(no_content.into_text(), "");
    }
}
