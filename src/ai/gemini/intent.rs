use super::client::GeminiHttpClient;
use super::types::{Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part};
use crate::ai::IntentService;
use crate::models::RouteDecision;
use crate::{prompts, Error, Result};
use async_trait::async_trait;
use std::time::Duration;

/// The classifier only ever needs one token back.
const MAX_OUTPUT_TOKENS: u32 = 8;

/// Classifies prompts as TEXT or IMAGE intent with a single constrained
/// call to a small, fast model.
pub struct GeminiIntentClient {
    http: GeminiHttpClient,
}

impl GeminiIntentClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self::new_with_client(api_key, model, reqwest::Client::new())
    }

    pub fn new_with_client(api_key: String, model: String, client: reqwest::Client) -> Self {
        Self {
            http: GeminiHttpClient::new_with_client(
                api_key,
                model,
                Duration::from_secs(10),
                client,
            ),
        }
    }

    fn extract_text(response: &GenerateContentResponse) -> Option<String> {
        response
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .and_then(|content| content.parts.iter().find_map(|p| p.text.clone()))
            .or_else(|| response.text.clone())
    }
}

/// Map classifier output onto a decision. Exact token match first; an
/// answer merely containing IMAGE still counts; anything else is TEXT.
fn parse_decision(output: &str) -> RouteDecision {
    let normalized = output.trim().to_uppercase();
    match normalized.as_str() {
        "IMAGE" => RouteDecision::Image,
        "TEXT" => RouteDecision::Text,
        _ if normalized.contains("IMAGE") => RouteDecision::Image,
        _ => RouteDecision::Text,
    }
}

#[cfg(test)]
super::impl_with_gemini_base_url!(GeminiIntentClient);

#[async_trait]
impl IntentService for GeminiIntentClient {
    async fn classify(&self, prompt: &str) -> Result<RouteDecision> {
        let request = GenerateContentRequest {
            system_instruction: Some(Content::system(prompts::INTENT_SYSTEM)),
            contents: vec![Content::user(vec![Part::text(&prompts::render(
                prompts::INTENT_USER,
                &[("prompt", prompt)],
            ))])],
            generation_config: Some(GenerationConfig {
                max_output_tokens: Some(MAX_OUTPUT_TOKENS),
                ..Default::default()
            }),
            safety_settings: None,
        };

        let response: GenerateContentResponse = self.http.generate_content(&request).await?;

        let output = Self::extract_text(&response).ok_or(Error::NoContent)?;

        let decision = parse_decision(&output);
        tracing::debug!("Intent classifier said {:?} for prompt", decision);
        Ok(decision)
    }
}
