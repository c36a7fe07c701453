use super::client::GeminiHttpClient;
use super::types::{
    permissive_safety_settings, Content, GenerateContentRequest, GenerateContentResponse,
    GenerationConfig, ImageConfig, Part,
};
use crate::ai::ImageGenerationService;
use crate::models::{AspectRatio, Attachment, NormalizedResponse};
use crate::normalize::normalize;
use crate::Result;
use async_trait::async_trait;
use std::time::Duration;

pub struct GeminiImageClient {
    http: GeminiHttpClient,
}

impl GeminiImageClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self::new_with_client(api_key, model, reqwest::Client::new())
    }

    pub fn new_with_client(api_key: String, model: String, client: reqwest::Client) -> Self {
        Self {
            http: GeminiHttpClient::new_with_client(
                api_key,
                model,
                Duration::from_secs(120),
                client,
            ),
        }
    }

    fn build_request(
        prompt: &str,
        attachments: &[Attachment],
        aspect_ratio: AspectRatio,
    ) -> GenerateContentRequest {
        let mut parts = vec![Part::text(prompt)];
        parts.extend(attachments.iter().map(Part::inline));

        GenerateContentRequest {
            system_instruction: None,
            contents: vec![Content::user(parts)],
            generation_config: Some(GenerationConfig {
                max_output_tokens: None,
                // TEXT stays enabled so a declined render can come back as
                // an explanation instead of an empty response.
                response_modalities: Some(vec!["TEXT".to_string(), "IMAGE".to_string()]),
                image_config: Some(ImageConfig {
                    aspect_ratio: aspect_ratio.as_str().to_string(),
                }),
            }),
            safety_settings: Some(permissive_safety_settings()),
        }
    }
}

#[cfg(test)]
super::impl_with_gemini_base_url!(GeminiImageClient);

#[async_trait]
impl ImageGenerationService for GeminiImageClient {
    async fn generate(
        &self,
        prompt: &str,
        attachments: &[Attachment],
        aspect_ratio: AspectRatio,
    ) -> Result<NormalizedResponse> {
        tracing::debug!(
            "Sending image generation request to Gemini (aspect ratio {}, {} attachments)",
            aspect_ratio.as_str(),
            attachments.len()
        );

        let request = Self::build_request(prompt, attachments, aspect_ratio);
        let response: GenerateContentResponse = self.http.generate_content(&request).await?;
        let normalized = normalize(&response)?;

        tracing::debug!(
            "Gemini returned {} image(s) and {} chars of text",
            normalized.images.len(),
            normalized.answer_text.len()
        );
        Ok(normalized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::gemini::test_support;
    use crate::Error;
    use wiremock::matchers::body_string_contains;
    use wiremock::{MockServer, ResponseTemplate};

    const DEFAULT_MODEL: &str = "gemini-2.5-flash-image";

    fn make_client(server: &MockServer) -> GeminiImageClient {
        GeminiImageClient::new("key".to_string(), DEFAULT_MODEL.to_string())
            .with_base_url(server.uri())
    }

    #[tokio::test]
    async fn test_generate_collects_inline_images() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{
                    "content": {
                        "parts": [
                            { "text": "here is your cat" },
                            { "inlineData": { "mimeType": "image/png", "data": "iVBORw==" } }
                        ]
                    }
                }]
            })))
            .mount(&server)
            .await;

        let response = make_client(&server)
            .generate("a cat", &[], AspectRatio::Square)
            .await
            .unwrap();

        assert_eq!(response.images.len(), 1);
        assert_eq!(response.images[0].mime_type, "image/png");
        assert_eq!(response.answer_text, "here is your cat");
    }

    #[tokio::test]
    async fn test_request_carries_aspect_ratio_and_modalities() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .and(body_string_contains("\"aspectRatio\":\"9:16\""))
            .and(body_string_contains(
                "\"responseModalities\":[\"TEXT\",\"IMAGE\"]",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{
                    "content": {
                        "parts": [{ "inlineData": { "mimeType": "image/png", "data": "QQ==" } }]
                    }
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        make_client(&server)
            .generate("tall cat", &[], AspectRatio::Tall)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_declined_render_returns_text_and_no_images() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{
                    "content": {
                        "parts": [{ "text": "I can't render that, but here's why..." }]
                    }
                }]
            })))
            .mount(&server)
            .await;

        let response = make_client(&server)
            .generate("something ambiguous", &[], AspectRatio::Square)
            .await
            .unwrap();

        assert!(response.images.is_empty());
        assert!(!response.answer_text.is_empty());
    }

    #[tokio::test]
    async fn test_model_loading_surfaces_wait_hint() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(
                ResponseTemplate::new(503)
                    .set_body_string(r#"{"error":"model loading","estimated_time":20}"#),
            )
            .mount(&server)
            .await;

        let err = make_client(&server)
            .generate("a cat", &[], AspectRatio::Square)
            .await
            .unwrap_err();

        match err {
            Error::ProviderTransient {
                status,
                estimated_wait_secs,
                ..
            } => {
                assert_eq!(status, 503);
                assert_eq!(estimated_wait_secs, Some(20));
            }
            other => panic!("expected transient error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_safety_block_is_terminal() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(ResponseTemplate::new(400).set_body_string("prompt blocked"))
            .mount(&server)
            .await;

        let err = make_client(&server)
            .generate("blocked", &[], AspectRatio::Square)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ProviderTerminal { status: 400, .. }));
    }
}
