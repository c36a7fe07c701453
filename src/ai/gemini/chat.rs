use super::client::GeminiHttpClient;
use super::types::{
    permissive_safety_settings, Content, GenerateContentRequest, GenerateContentResponse,
    GenerationConfig, Part,
};
use crate::ai::ChatService;
use crate::models::{Attachment, ChatTurn, NormalizedResponse};
use crate::normalize::normalize;
use crate::{prompts, Result};
use async_trait::async_trait;
use std::time::Duration;

const MAX_OUTPUT_TOKENS: u32 = 3000;

pub struct GeminiChatClient {
    http: GeminiHttpClient,
}

impl GeminiChatClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self::new_with_client(api_key, model, reqwest::Client::new())
    }

    pub fn new_with_client(api_key: String, model: String, client: reqwest::Client) -> Self {
        Self {
            http: GeminiHttpClient::new_with_client(
                api_key,
                model,
                Duration::from_secs(30),
                client,
            ),
        }
    }

    fn build_request(
        prompt: &str,
        history: &[ChatTurn],
        attachments: &[Attachment],
    ) -> GenerateContentRequest {
        let mut contents: Vec<Content> = history.iter().map(Content::from).collect();

        let mut parts = vec![Part::text(prompt)];
        parts.extend(attachments.iter().map(Part::inline));
        contents.push(Content::user(parts));

        GenerateContentRequest {
            system_instruction: Some(Content::system(prompts::CHAT_SYSTEM)),
            contents,
            generation_config: Some(GenerationConfig {
                max_output_tokens: Some(MAX_OUTPUT_TOKENS),
                ..Default::default()
            }),
            safety_settings: Some(permissive_safety_settings()),
        }
    }
}

#[cfg(test)]
super::impl_with_gemini_base_url!(GeminiChatClient);

#[async_trait]
impl ChatService for GeminiChatClient {
    async fn complete(
        &self,
        prompt: &str,
        history: &[ChatTurn],
        attachments: &[Attachment],
    ) -> Result<NormalizedResponse> {
        tracing::debug!(
            "Sending chat request to Gemini ({} history turns, {} attachments)",
            history.len(),
            attachments.len()
        );

        let request = Self::build_request(prompt, history, attachments);
        let response: GenerateContentResponse = self.http.generate_content(&request).await?;
        normalize(&response)
    }
}
