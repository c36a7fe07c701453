//! AI service integration for chat, image generation, and intent routing.
//!
//! Each capability is a trait with one Gemini implementation and one mock,
//! so the HTTP layer and tests never depend on the provider directly.

pub mod gemini;
pub mod mime;
pub mod mock;

pub use gemini::{GeminiChatClient, GeminiImageClient, GeminiIntentClient};
pub use mock::{MockChatClient, MockImageClient, MockIntentClient};

use crate::models::{AspectRatio, Attachment, ChatTurn, NormalizedResponse, RouteDecision};
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait ChatService: Send + Sync {
    /// One conversational turn: the prompt, caller-supplied history, and
    /// optional attachments go out; a normalized answer comes back.
    async fn complete(
        &self,
        prompt: &str,
        history: &[ChatTurn],
        attachments: &[Attachment],
    ) -> Result<NormalizedResponse>;
}

#[async_trait]
pub trait ImageGenerationService: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        attachments: &[Attachment],
        aspect_ratio: AspectRatio,
    ) -> Result<NormalizedResponse>;
}

#[async_trait]
pub trait IntentService: Send + Sync {
    async fn classify(&self, prompt: &str) -> Result<RouteDecision>;
}
