use axum::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use super::{
    caption_prompt, parse_story_score, recommendations_prompt, story_prompt, AssistantError,
    TravelAssistant,
};

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const API_KEY_HEADER: &str = "x-goog-api-key";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the Gemini `generateContent` REST endpoint
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self, AssistantError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
            base_url: BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// The key travels in a header so it never shows up in a URL
    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", self.base_url, self.model)
    }

    async fn generate(&self, prompt: String) -> Result<String, AssistantError> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        debug!("Sending Gemini request to model {}", self.model);
        let response = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
            let message = serde_json::from_str::<ErrorWrapper>(&body_text)
                .ok()
                .and_then(|wrapper| wrapper.error.message)
                .unwrap_or(body_text);
            warn!("Gemini API returned {}: {}", status, message);
            return Err(AssistantError::Api { status, message });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(reqwest::Error::without_url)?;
        extract_text(parsed)
    }
}

#[async_trait]
impl TravelAssistant for GeminiClient {
    async fn generate_caption(&self, image_url: &str) -> Result<String, AssistantError> {
        let caption = self.generate(caption_prompt(image_url)).await?;
        Ok(caption.trim().to_string())
    }

    async fn score_story(&self, transcript: &str) -> Result<i32, AssistantError> {
        let reply = self.generate(story_prompt(transcript)).await?;
        Ok(parse_story_score(&reply))
    }

    async fn travel_recommendations(
        &self,
        interests: &[String],
        visited_locations: &[String],
    ) -> Result<String, AssistantError> {
        self.generate(recommendations_prompt(interests, visited_locations))
            .await
    }
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

fn extract_text(response: GenerateContentResponse) -> Result<String, AssistantError> {
    response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().find_map(|part| part.text))
        .ok_or(AssistantError::EmptyResponse)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: "hello".to_string(),
                }],
            }],
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"contents": [{"parts": [{"text": "hello"}]}]})
        );
    }

    #[test]
    fn test_extract_first_candidate_text() {
        let response: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [
                {"content": {"parts": [{"text": "Sunset over Bodrum"}]}},
                {"content": {"parts": [{"text": "ignored"}]}}
            ]
        }))
        .unwrap();
        assert_eq!(extract_text(response).unwrap(), "Sunset over Bodrum");
    }

    #[test]
    fn test_extract_without_candidates_fails() {
        let response: GenerateContentResponse =
            serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(matches!(
            extract_text(response),
            Err(AssistantError::EmptyResponse)
        ));
    }

    #[test]
    fn test_endpoint_and_debug_hide_key() {
        let client = GeminiClient::new("secret-key", "gemini-1.5-flash")
            .unwrap()
            .with_base_url("http://localhost:9999/models");
        assert_eq!(
            client.endpoint(),
            "http://localhost:9999/models/gemini-1.5-flash:generateContent"
        );
        assert!(!format!("{:?}", client).contains("secret-key"));
    }

    #[tokio::test]
    async fn test_transport_error_does_not_carry_key() {
        let client = GeminiClient::new("SUPER-SECRET-KEY", "gemini-1.5-flash")
            .unwrap()
            .with_base_url("http://127.0.0.1:1/models");

        let err = client.generate_caption("https://example.com/a.jpg").await.unwrap_err();

        assert!(matches!(err, AssistantError::Request(_)));
        let text = format!("{} {:?}", err, err);
        assert!(!text.contains("SUPER-SECRET-KEY"), "key leaked: {}", text);
    }
}
