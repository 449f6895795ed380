//! Generative-text helpers: post captions, story scoring and destination
//! recommendations.

pub mod controller;
pub mod gemini;

use axum::async_trait;
use axum::http::StatusCode;

use crate::controller::ApiError;

pub const DEFAULT_STORY_SCORE: i32 = 5;

#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error("AI assistant is not configured")]
    NotConfigured,

    #[error("Gemini request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Gemini API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Gemini returned no text")]
    EmptyResponse,
}

impl ApiError for AssistantError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
            Self::Request(_) | Self::Api { .. } | Self::EmptyResponse => StatusCode::BAD_GATEWAY,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::NotConfigured => "AI_UNAVAILABLE",
            Self::Request(_) | Self::Api { .. } | Self::EmptyResponse => "AI_ERROR",
        }
    }

    fn public_message(&self) -> String {
        match self {
            Self::NotConfigured => self.to_string(),
            _ => "AI assistant request failed".to_string(),
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TravelAssistant: Send + Sync {
    async fn generate_caption(&self, image_url: &str) -> Result<String, AssistantError>;

    /// Score a travel story from 1 to 10
    async fn score_story(&self, transcript: &str) -> Result<i32, AssistantError>;

    async fn travel_recommendations(
        &self,
        interests: &[String],
        visited_locations: &[String],
    ) -> Result<String, AssistantError>;
}

pub fn caption_prompt(image_url: &str) -> String {
    format!(
        "Write a short, engaging caption for a travel photo. The photo is at: {}",
        image_url
    )
}

pub fn story_prompt(transcript: &str) -> String {
    format!(
        "Please analyze this travel story and rate it on a scale of 1-10 based on its \
         informativeness, engagement, and storytelling quality: \"{}\"",
        transcript
    )
}

pub fn recommendations_prompt(interests: &[String], visited_locations: &[String]) -> String {
    format!(
        "Based on the user's interests: {} and previously visited locations: {}, \
         suggest 3 new travel destinations with brief descriptions.",
        interests.join(", "),
        visited_locations.join(", ")
    )
}

/// First integer in the model's reply, clamped to 1..=10.
/// Falls back to the default score when the reply has no number.
pub fn parse_story_score(reply: &str) -> i32 {
    let digits: String = reply
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();

    match digits.parse::<i64>() {
        Ok(0) | Err(_) => DEFAULT_STORY_SCORE,
        Ok(score) => score.clamp(1, 10) as i32,
    }
}
