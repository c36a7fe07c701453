//! Application wiring: provider clients, retry policy, and the operations
//! the HTTP boundary exposes.

use crate::ai::{
    ChatService, GeminiChatClient, GeminiImageClient, GeminiIntentClient, ImageGenerationService,
    IntentService,
};
use crate::models::{AspectRatio, Attachment, ChatTurn, Config, NormalizedResponse, RouteDecision};
use crate::retry::{with_retry, RetryOptions};
use crate::{router, Result};
use std::time::Duration;
use tracing::info;

/// Holds the injected service objects and the retry policy. Stateless
/// between requests; everything here is read-only after construction.
pub struct App {
    chat: Box<dyn ChatService>,
    image: Box<dyn ImageGenerationService>,
    intent: Box<dyn IntentService>,
    retry: RetryOptions,
}

/// Injectable service bundle used to construct [`App`] in tests/harnesses.
pub struct AppServices {
    pub chat: Box<dyn ChatService>,
    pub image: Box<dyn ImageGenerationService>,
    pub intent: Box<dyn IntentService>,
}

impl App {
    /// Build an app from concrete service dependencies.
    ///
    /// This is primarily useful for integration tests that need to inject
    /// mocks.
    pub fn with_services(services: AppServices, retry: RetryOptions) -> Self {
        Self {
            chat: services.chat,
            image: services.image,
            intent: services.intent,
            retry,
        }
    }

    /// Construct an app from environment configuration.
    pub fn new(config: &Config) -> Self {
        // Reuse one HTTP connection pool across provider clients.
        let http_client = reqwest::Client::new();

        info!("Chat model: {}", config.chat_model);
        info!("Image model: {}", config.image_model);
        info!("Intent model: {}", config.intent_model);

        let chat = Box::new(GeminiChatClient::new_with_client(
            config.gemini_api_key.clone(),
            config.chat_model.clone(),
            http_client.clone(),
        ));
        let image = Box::new(GeminiImageClient::new_with_client(
            config.gemini_api_key.clone(),
            config.image_model.clone(),
            http_client.clone(),
        ));
        let intent = Box::new(GeminiIntentClient::new_with_client(
            config.gemini_api_key.clone(),
            config.intent_model.clone(),
            http_client,
        ));

        Self::with_services(
            AppServices { chat, image, intent },
            RetryOptions {
                max_attempts: config.retry_max_attempts,
                base_delay: Duration::from_millis(config.retry_base_delay_ms),
            },
        )
    }

    /// One chat turn. Not retried: repeating a conversational turn behind
    /// the caller's back risks duplicate or confusing history.
    pub async fn chat(
        &self,
        prompt: &str,
        history: &[ChatTurn],
        attachments: &[Attachment],
    ) -> Result<NormalizedResponse> {
        self.chat.complete(prompt, history, attachments).await
    }

    /// One image generation, wrapped in the transient-failure retry policy.
    pub async fn generate_image(
        &self,
        prompt: &str,
        attachments: &[Attachment],
        aspect_ratio: AspectRatio,
    ) -> Result<NormalizedResponse> {
        with_retry(&self.retry, || {
            self.image.generate(prompt, attachments, aspect_ratio)
        })
        .await
    }

    /// Classify a prompt as a chat or image request.
    pub async fn route(&self, prompt: &str) -> RouteDecision {
        router::route(self.intent.as_ref(), prompt).await
    }
}
