use crate::{Error, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Error bodies are truncated to this many characters before being carried
/// in an error variant.
const ERROR_EXCERPT_CHARS: usize = 100;

/// Lightweight Gemini REST client used by the chat/image/intent modules.
pub struct GeminiHttpClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    timeout: Duration,
}

impl GeminiHttpClient {
    /// Construct a Gemini client.
    ///
    /// `model` should be the bare model ID (for example `gemini-2.5-flash`),
    /// not a `models/...`-prefixed path segment.
    pub fn new(api_key: String, model: String, timeout: Duration) -> Self {
        Self::new_with_client(api_key, model, timeout, Client::new())
    }

    pub fn new_with_client(
        api_key: String,
        model: String,
        timeout: Duration,
        client: Client,
    ) -> Self {
        let model = model.strip_prefix("models/").unwrap_or(&model).to_string();

        Self {
            client,
            api_key,
            model,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout,
        }
    }

    #[cfg(test)]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Returns the configured model ID without the `models/` prefix.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Calls Gemini's `generateContent` endpoint.
    ///
    /// Non-success statuses are mapped into the crate error taxonomy: 429
    /// and 503 become [`Error::ProviderTransient`] (with any `estimated_time`
    /// hint parsed out of the body), everything else
    /// [`Error::ProviderTerminal`].
    pub async fn generate_content<Req: Serialize, Resp: DeserializeOwned>(
        &self,
        request: &Req,
    ) -> Result<Resp> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send request to Gemini: {}", e);
                e
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Gemini API error (status {}): {}", status, error_text);
            return Err(classify_provider_error(status, &error_text));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse Gemini response: {}\nBody: {}", e, body);
            Error::ProviderTerminal {
                status: 200,
                message: format!("Failed to parse Gemini response: {}", e),
            }
        })
    }
}

fn classify_provider_error(status: u16, body: &str) -> Error {
    let message = truncate_excerpt(body);
    match status {
        429 | 503 => Error::ProviderTransient {
            status,
            message,
            estimated_wait_secs: parse_estimated_wait(body),
        },
        _ => Error::ProviderTerminal { status, message },
    }
}

/// Pulls the `estimated_time` wait hint (seconds) out of a transient error
/// body, when the provider supplies one.
fn parse_estimated_wait(body: &str) -> Option<u64> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let seconds = value.get("estimated_time")?.as_f64()?;
    if seconds.is_sign_negative() {
        return None;
    }
    Some(seconds.ceil() as u64)
}

fn truncate_excerpt(body: &str) -> String {
    match body.char_indices().nth(ERROR_EXCERPT_CHARS) {
        Some((idx, _)) => body[..idx].to_string(),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_statuses_carry_wait_hint() {
        let err = classify_provider_error(503, r#"{"error":"loading","estimated_time":20.0}"#);
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

    #[test]
    fn test_rate_limit_is_transient_without_hint() {
        let err = classify_provider_error(429, "quota exceeded");
        assert!(matches!(
            err,
            Error::ProviderTransient {
                status: 429,
                estimated_wait_secs: None,
                ..
            }
        ));
    }

    #[test]
    fn test_other_statuses_are_terminal() {
        let err = classify_provider_error(401, "bad api key");
        match err {
            Error::ProviderTerminal { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "bad api key");
            }
            other => panic!("expected terminal error, got {:?}", other),
        }
    }

    #[test]
    fn test_error_excerpt_is_truncated() {
        let long_body = "x".repeat(500);
        let err = classify_provider_error(400, &long_body);
        match err {
            Error::ProviderTerminal { message, .. } => {
                assert_eq!(message.chars().count(), 100);
            }
            other => panic!("expected terminal error, got {:?}", other),
        }
    }

    #[test]
    fn test_estimated_wait_rounds_up_and_rejects_garbage() {
        assert_eq!(parse_estimated_wait(r#"{"estimated_time":19.2}"#), Some(20));
        assert_eq!(parse_estimated_wait(r#"{"estimated_time":-5}"#), None);
        assert_eq!(parse_estimated_wait("not json"), None);
        assert_eq!(parse_estimated_wait(r#"{"other":1}"#), None);
    }

    #[test]
    fn test_model_prefix_is_stripped() {
        let client = GeminiHttpClient::new(
            "key".to_string(),
            "models/gemini-2.5-flash".to_string(),
            Duration::from_secs(1),
        );
        assert_eq!(client.model(), "gemini-2.5-flash");
    }
}
