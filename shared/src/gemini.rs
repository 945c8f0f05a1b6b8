//! Wire format for the `generateContent` REST endpoint.
//!
//! Platform-independent so any shell (web, mobile, native) can build the
//! request body and read the response the same way.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::capabilities::{GenerateOperation, GenerationError};

pub const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub system_instruction: Content,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<Blob>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blob {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationConfig {
    pub temperature: f32,
}

impl From<&GenerateOperation> for GenerateContentRequest {
    /// Images first, then the task prompt, in a single user turn.
    fn from(op: &GenerateOperation) -> Self {
        let mut parts: Vec<Part> = op
            .images
            .iter()
            .map(|img| Part {
                text: None,
                inline_data: Some(Blob {
                    mime_type: img.media_type.clone(),
                    data: img.data.clone(),
                }),
            })
            .collect();
        parts.push(Part {
            text: Some(op.prompt.clone()),
            inline_data: None,
        });

        Self {
            contents: vec![Content {
                role: Some("user".into()),
                parts,
            }],
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: Some(op.system_instruction.clone()),
                    inline_data: None,
                }],
            },
            generation_config: GenerationConfig {
                temperature: op.temperature,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate; empty when there is none.
    #[must_use]
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }

    /// Why the first candidate stopped, e.g. `STOP` or `SAFETY`.
    #[must_use]
    pub fn finish_reason(&self) -> Option<&str> {
        self.candidates.first().and_then(|c| c.finish_reason.as_deref())
    }

    pub fn from_slice(body: &[u8]) -> Result<Self, GenerationError> {
        serde_json::from_slice(body).map_err(|e| GenerationError::MalformedResponse {
            reason: e.to_string(),
        })
    }
}

/// `{api_base}/v1beta/models/{model}:generateContent`
pub fn endpoint(api_base: &str, model: &str) -> Result<Url, GenerationError> {
    let base = Url::parse(api_base).map_err(|e| GenerationError::Transport {
        reason: format!("invalid API base: {e}"),
    })?;
    base.join(&format!("/v1beta/models/{model}:generateContent"))
        .map_err(|e| GenerationError::Transport {
            reason: format!("invalid model path: {e}"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::InlineImage;
    use serde_json::json;

    fn operation() -> GenerateOperation {
        GenerateOperation {
            api_base: "https://generativelanguage.googleapis.com".into(),
            model: "gemini-2.5-flash".into(),
            temperature: 0.5,
            system_instruction: "be brief".into(),
            prompt: "describe".into(),
            images: vec![InlineImage {
                media_type: "image/png".into(),
                data: "iVBORw0KGgo=".into(),
            }],
        }
    }

    #[test]
    fn request_body_shape() {
        let body = serde_json::to_value(GenerateContentRequest::from(&operation())).unwrap();
        assert_eq!(
            body,
            json!({
                "contents": [{
                    "role": "user",
                    "parts": [
                        { "inlineData": { "mimeType": "image/png", "data": "iVBORw0KGgo=" } },
                        { "text": "describe" }
                    ]
                }],
                "systemInstruction": { "parts": [{ "text": "be brief" }] },
                "generationConfig": { "temperature": 0.5 }
            })
        );
    }

    #[test]
    fn response_text_joins_parts_of_first_candidate() {
        let body = br#"{
            "candidates": [
                {"content": {"role": "model", "parts": [{"text": "Solid oak. "}, {"text": "Call now!"}]},
                 "finishReason": "STOP"},
                {"content": {"parts": [{"text": "ignored"}]}}
            ]
        }"#;
        let response = GenerateContentResponse::from_slice(body).unwrap();
        assert_eq!(response.text(), "Solid oak. Call now!");
        assert_eq!(response.finish_reason(), Some("STOP"));
    }

    #[test]
    fn empty_candidates_yield_empty_text() {
        let response = GenerateContentResponse::from_slice(b"{}").unwrap();
        assert_eq!(response.text(), "");

        let blocked = GenerateContentResponse::from_slice(
            br#"{"candidates": [{"finishReason": "SAFETY"}]}"#,
        )
        .unwrap();
        assert_eq!(blocked.text(), "");
        assert_eq!(blocked.finish_reason(), Some("SAFETY"));
    }

    #[test]
    fn garbage_is_malformed() {
        assert!(matches!(
            GenerateContentResponse::from_slice(b"<html>"),
            Err(GenerationError::MalformedResponse { .. })
        ));
    }

    #[test]
    fn endpoint_for_model() {
        let url = endpoint("https://generativelanguage.googleapis.com", "gemini-2.5-flash").unwrap();
        assert_eq!(
            url.as_str(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );

        let proxied = endpoint("https://proxy.example.com", "gemini-2.5-pro").unwrap();
        assert_eq!(
            proxied.as_str(),
            "https://proxy.example.com/v1beta/models/gemini-2.5-pro:generateContent"
        );
    }
}
