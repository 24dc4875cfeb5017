use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::analysis::models::GroundingUrl;
use crate::analysis::AnalysisError;

pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Low-level client for the Gemini generateContent REST endpoint.
pub struct GeminiClient {
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::blocking::Client,
}

impl GeminiClient {
    pub fn new(api_key: String, model: Option<String>, base_url: Option<String>) -> Self {
        Self {
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            client: reqwest::blocking::Client::new(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// One schema-constrained generateContent call with the Google Search
    /// grounding tool attached. Blocks until the model responds.
    pub(crate) fn generate(
        &self,
        prompt: &str,
        schema: Value,
    ) -> Result<GenerateContentResponse, AnalysisError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            tools: vec![serde_json::json!({ "googleSearch": {} })],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: schema,
            },
        };

        debug!("POST {}:generateContent", self.model);
        let resp = self.client.post(&url).json(&body).send()?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().unwrap_or_default();
            warn!("Gemini API returned {status}: {text}");
            return Err(AnalysisError::Api {
                status: status.as_u16(),
                body: text,
            });
        }

        Ok(resp.json()?)
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    tools: Vec<Value>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: &'static str,
    #[serde(rename = "responseSchema")]
    response_schema: Value,
}

// The response envelope is Option-heavy on purpose: the endpoint omits
// whole subtrees (no candidates on safety blocks, no grounding metadata
// when search was not used), and none of that may fail the decode.
#[derive(Debug, Deserialize)]
pub(crate) struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
    #[serde(rename = "groundingMetadata")]
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Option<Vec<ResponsePart>>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GroundingMetadata {
    #[serde(rename = "groundingChunks")]
    grounding_chunks: Option<Vec<GroundingChunk>>,
}

#[derive(Debug, Deserialize)]
struct GroundingChunk {
    web: Option<WebSource>,
}

#[derive(Debug, Deserialize)]
struct WebSource {
    uri: Option<String>,
    title: Option<String>,
}

impl GenerateContentResponse {
    /// Text payload: all text parts of the first candidate, concatenated.
    /// Empty when there is no candidate or no text.
    pub(crate) fn text(&self) -> String {
        self.candidates
            .as_ref()
            .and_then(|c| c.first())
            .and_then(|c| c.content.as_ref())
            .and_then(|c| c.parts.as_ref())
            .map(|parts| {
                parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }

    /// Web sources from the first candidate's grounding metadata. A chunk
    /// counts only when both uri and title are present and non-empty;
    /// everything else is dropped without reordering the rest.
    pub(crate) fn grounding_urls(&self) -> Vec<GroundingUrl> {
        let chunks = self
            .candidates
            .as_ref()
            .and_then(|c| c.first())
            .and_then(|c| c.grounding_metadata.as_ref())
            .and_then(|m| m.grounding_chunks.as_ref());

        let mut sources = Vec::new();
        if let Some(chunks) = chunks {
            for chunk in chunks {
                if let Some(ref web) = chunk.web {
                    if let (Some(uri), Some(title)) = (&web.uri, &web.title) {
                        if !uri.is_empty() && !title.is_empty() {
                            sources.push(GroundingUrl {
                                title: title.clone(),
                                uri: uri.clone(),
                            });
                        }
                    }
                }
            }
        }
        sources
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(raw: &str) -> GenerateContentResponse {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn text_concatenates_parts_of_the_first_candidate() {
        let resp = decode(
            r#"{"candidates": [
                {"content": {"parts": [{"text": "{\"a\":"}, {"text": "1}"}]}},
                {"content": {"parts": [{"text": "ignored"}]}}
            ]}"#,
        );
        assert_eq!(resp.text(), "{\"a\":1}");
    }

    #[test]
    fn text_is_empty_without_candidates_or_parts() {
        assert_eq!(decode(r#"{}"#).text(), "");
        assert_eq!(decode(r#"{"candidates": []}"#).text(), "");
        assert_eq!(decode(r#"{"candidates": [{"content": {}}]}"#).text(), "");
        assert_eq!(
            decode(r#"{"candidates": [{"content": {"parts": [{}]}}]}"#).text(),
            ""
        );
    }

    #[test]
    fn grounding_keeps_only_complete_web_chunks_in_order() {
        let resp = decode(
            r#"{"candidates": [{
                "content": {"parts": [{"text": "x"}]},
                "groundingMetadata": {"groundingChunks": [
                    {"web": {"uri": "https://a.example", "title": "A"}},
                    {"web": {"uri": "https://no-title.example"}},
                    {"web": {"title": "No uri"}},
                    {"web": {"uri": "", "title": "Empty uri"}},
                    {"retrievedContext": {"uri": "https://not-web.example"}},
                    {"web": {"uri": "https://b.example", "title": "B"}}
                ]}
            }]}"#,
        );

        let sources = resp.grounding_urls();
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].title, "A");
        assert_eq!(sources[0].uri, "https://a.example");
        assert_eq!(sources[1].title, "B");
    }

    #[test]
    fn grounding_is_empty_when_metadata_is_absent() {
        let resp = decode(r#"{"candidates": [{"content": {"parts": [{"text": "x"}]}}]}"#);
        assert!(resp.grounding_urls().is_empty());
        assert!(decode(r#"{}"#).grounding_urls().is_empty());
    }
}
