//! Shared Gemini payload types used across the chat, image, and intent modules.

use crate::models::{Attachment, ChatTurn, Role};
use serde::{Deserialize, Serialize};

/// Gemini content container used in both requests and responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    pub fn system(text: &str) -> Self {
        Self {
            role: None,
            parts: vec![Part::text(text)],
        }
    }

    pub fn user(parts: Vec<Part>) -> Self {
        Self {
            role: Some("user".to_string()),
            parts,
        }
    }
}

impl From<&ChatTurn> for Content {
    fn from(turn: &ChatTurn) -> Self {
        let role = match turn.role {
            Role::User => "user",
            Role::Model => "model",
        };
        Self {
            role: Some(role.to_string()),
            parts: turn
                .parts
                .iter()
                .map(|p| Part {
                    text: p.text.clone(),
                    thought: None,
                    inline_data: p.inline_data.clone().map(InlineData::from),
                })
                .collect(),
        }
    }
}

/// One content segment. Gemini co-locates the `thought` flag with `text`
/// rather than using a separate field, so this is a struct of optionals
/// instead of an enum.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thought: Option<bool>,
    #[serde(rename = "inlineData", skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

impl Part {
    pub fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            thought: None,
            inline_data: None,
        }
    }

    pub fn inline(attachment: &Attachment) -> Self {
        Self {
            text: None,
            thought: None,
            inline_data: Some(InlineData::from(attachment.clone())),
        }
    }
}

/// Base64 inline payload used for image/vision requests and responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

impl From<Attachment> for InlineData {
    fn from(attachment: Attachment) -> Self {
        Self {
            mime_type: attachment.mime_type,
            data: attachment.data,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GenerateContentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    pub contents: Vec<Content>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
    #[serde(rename = "safetySettings", skip_serializing_if = "Option::is_none")]
    pub safety_settings: Option<Vec<SafetySetting>>,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_modalities: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_config: Option<ImageConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageConfig {
    pub aspect_ratio: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SafetySetting {
    pub category: String,
    pub threshold: String,
}

/// Every harm category at the most permissive threshold.
pub fn permissive_safety_settings() -> Vec<SafetySetting> {
    [
        "HARM_CATEGORY_HARASSMENT",
        "HARM_CATEGORY_HATE_SPEECH",
        "HARM_CATEGORY_SEXUALLY_EXPLICIT",
        "HARM_CATEGORY_DANGEROUS_CONTENT",
    ]
    .iter()
    .map(|category| SafetySetting {
        category: category.to_string(),
        threshold: "BLOCK_NONE".to_string(),
    })
    .collect()
}

/// Top-level `generateContent` response envelope.
///
/// Every field is optional: some deployments return the structured
/// `candidates` shape, others a flat `text` string, and usage metadata is
/// not always present. The normalizer handles all of these.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub text: Option<String>,
    pub usage_metadata: Option<UsageMetadata>,
}

/// Candidate completion item returned by Gemini.
#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<Content>,
    #[serde(rename = "finishReason")]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    pub prompt_token_count: Option<u32>,
    pub candidates_token_count: Option<u32>,
    pub total_token_count: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TurnPart;

    #[test]
    fn test_chat_turn_converts_to_content() {
        let turn = ChatTurn {
            role: Role::Model,
            parts: vec![TurnPart {
                text: Some("hi".to_string()),
                inline_data: None,
            }],
        };

        let content = Content::from(&turn);
        assert_eq!(content.role.as_deref(), Some("model"));
        assert_eq!(content.parts.len(), 1);
        assert_eq!(content.parts[0].text.as_deref(), Some("hi"));
    }

    #[test]
    fn test_request_serializes_camel_case_fields() {
        let request = GenerateContentRequest {
            system_instruction: Some(Content::system("sys")),
            contents: vec![Content::user(vec![Part::text("hi")])],
            generation_config: Some(GenerationConfig {
                max_output_tokens: Some(100),
                response_modalities: Some(vec!["TEXT".to_string(), "IMAGE".to_string()]),
                image_config: Some(ImageConfig {
                    aspect_ratio: "16:9".to_string(),
                }),
            }),
            safety_settings: Some(permissive_safety_settings()),
        };

        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"generationConfig\""));
        assert!(json.contains("\"maxOutputTokens\":100"));
        assert!(json.contains("\"responseModalities\":[\"TEXT\",\"IMAGE\"]"));
        assert!(json.contains("\"aspectRatio\":\"16:9\""));
        assert!(json.contains("\"safetySettings\""));
        assert!(json.contains("\"BLOCK_NONE\""));
    }

    #[test]
    fn test_response_parses_thought_flag_and_inline_data() {
        let body = serde_json::json!({
            "candidates": [{
                "content": {
                    "parts": [
                        { "text": "working it out", "thought": true },
                        { "text": "answer" },
                        { "inlineData": { "mimeType": "image/png", "data": "QUJD" } }
                    ]
                }
            }],
            "usageMetadata": { "totalTokenCount": 42 }
        });

        let response: GenerateContentResponse = serde_json::from_value(body).unwrap();
        let parts = &response.candidates[0].content.as_ref().unwrap().parts;
        assert_eq!(parts[0].thought, Some(true));
        assert_eq!(parts[2].inline_data.as_ref().unwrap().mime_type, "image/png");
        assert_eq!(
            response.usage_metadata.unwrap().total_token_count,
            Some(42)
        );
    }

    #[test]
    fn test_response_tolerates_flat_text_shape() {
        let response: GenerateContentResponse =
            serde_json::from_str(r#"{"text":"plain answer"}"#).unwrap();
        assert!(response.candidates.is_empty());
        assert_eq!(response.text.as_deref(), Some("plain answer"));
    }
}
