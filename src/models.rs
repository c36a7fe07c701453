//! Data models and structures
//!
//! Defines the conversation, attachment, and routing types shared between
//! the HTTP boundary and the Gemini provider clients.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// Base64 payload tagged with a MIME type. Attachments cross both the
/// inbound and outbound boundaries in this shape; no other binary framing
/// is used.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub data: String,
    pub mime_type: String,
}

/// One segment of a conversation turn. At least one of `text`/`inline_data`
/// is present after boundary sanitization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnPart {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(rename = "inlineData", skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<Attachment>,
}

impl TurnPart {
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.inline_data.is_none()
    }
}

/// A single user or model turn. The client owns the full history and ships
/// it with every request; nothing is kept server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub parts: Vec<TurnPart>,
}

/// Classified purpose of a user prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    Text,
    Image,
}

/// Requested width:height ratio for generated images.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "4:3")]
    Landscape,
    #[serde(rename = "3:4")]
    Portrait,
    #[serde(rename = "16:9")]
    Wide,
    #[serde(rename = "9:16")]
    Tall,
}

impl AspectRatio {
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Landscape => "4:3",
            AspectRatio::Portrait => "3:4",
            AspectRatio::Wide => "16:9",
            AspectRatio::Tall => "9:16",
        }
    }
}

/// Uniform result of normalizing a provider response, regardless of which
/// shape the provider returned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedResponse {
    pub answer_text: String,
    pub thought_text: Option<String>,
    pub images: Vec<Attachment>,
    pub token_count: Option<u32>,
}

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub chat_model: String,
    pub image_model: String,
    pub intent_model: String,
    pub port: u16,
    pub retry_max_attempts: u32,
    pub retry_base_delay_ms: u64,
}

impl Config {
    pub fn from_env() -> crate::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            gemini_api_key: std::env::var("GEMINI_API_KEY")
                .map_err(|_| crate::Error::Config("GEMINI_API_KEY not set".to_string()))?,
            chat_model: std::env::var("CHAT_MODEL")
                .unwrap_or_else(|_| "gemini-2.5-flash".to_string()),
            image_model: std::env::var("IMAGE_MODEL")
                .unwrap_or_else(|_| "gemini-2.5-flash-image".to_string()),
            intent_model: std::env::var("INTENT_MODEL")
                .unwrap_or_else(|_| "gemini-2.5-flash-lite".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            retry_max_attempts: std::env::var("IMAGE_RETRY_MAX_ATTEMPTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3),
            retry_base_delay_ms: std::env::var("IMAGE_RETRY_BASE_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10_000),
        })
    }
}
