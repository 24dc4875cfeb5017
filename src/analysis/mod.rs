pub mod gemini;
pub mod models;
pub mod prompt;
pub mod schema;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::youtube;

pub use gemini::{GeminiClient, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use models::{
    ChannelAnalysis, GroundingUrl, Language, RelatedVideo, SummaryLength, VideoData,
    VideoTimestamp,
};

/// Why an analysis request failed.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Gemini API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("No data received from Gemini")]
    EmptyResponse,

    #[error("Analysis payload did not match the expected schema: {0}")]
    Decode(#[from] serde_json::Error),
}

impl AnalysisError {
    /// True when the failure is about the video itself (the model found
    /// nothing, or produced a payload we refuse to accept) rather than
    /// about reaching the API. Callers word their messages off this split.
    pub fn is_analysis_failure(&self) -> bool {
        matches!(
            self,
            AnalysisError::EmptyResponse | AnalysisError::Decode(_)
        )
    }
}

/// A completed analysis: the structured payload plus the web sources the
/// model consulted while grounding it.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub data: VideoData,
    pub sources: Vec<GroundingUrl>,
}

/// High-level entry point: assembles the prompt, calls Gemini with the
/// response schema attached, validates the payload, extracts sources.
pub struct AnalysisClient {
    gemini: GeminiClient,
}

impl AnalysisClient {
    pub fn new(gemini: GeminiClient) -> Self {
        Self { gemini }
    }

    pub fn model(&self) -> &str {
        self.gemini.model()
    }

    /// Analyze one video. Every failure path is an `Err`; a successful
    /// return always carries a fully-populated payload.
    pub fn analyze(
        &self,
        url: &str,
        length: SummaryLength,
        language: Language,
    ) -> Result<Analysis, AnalysisError> {
        let video_id = youtube::extract_video_id(url);
        debug!(
            "analyzing {} (id: {})",
            url,
            video_id.as_deref().unwrap_or("none")
        );

        let prompt = prompt::build_prompt(url, video_id.as_deref(), length, language);
        let response = self
            .gemini
            .generate(&prompt, schema::video_analysis_schema())?;

        let text = response.text();
        if text.is_empty() {
            return Err(AnalysisError::EmptyResponse);
        }

        let data: VideoData = serde_json::from_str(&text)?;
        let sources = response.grounding_urls();

        Ok(Analysis { data, sources })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_kinds_split_between_video_and_transport() {
        assert!(AnalysisError::EmptyResponse.is_analysis_failure());

        let decode: AnalysisError = serde_json::from_str::<VideoData>("not json")
            .unwrap_err()
            .into();
        assert!(decode.is_analysis_failure());

        let api = AnalysisError::Api {
            status: 429,
            body: "quota exceeded".into(),
        };
        assert!(!api.is_analysis_failure());
    }

    #[test]
    fn api_error_keeps_status_and_body_visible() {
        let err = AnalysisError::Api {
            status: 403,
            body: "key not valid".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("403"));
        assert!(msg.contains("key not valid"));
    }
}
