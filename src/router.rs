//! Intent routing: decide per user message whether it is a chat turn or an
//! image-generation request.

use crate::ai::IntentService;
use crate::models::RouteDecision;
use tracing::warn;

/// Classify a prompt, defaulting to [`RouteDecision::Text`] whenever the
/// classifier cannot answer.
///
/// TEXT is the safe, reversible path: a failed heuristic must never spend
/// an image-generation attempt the user did not ask for. The HTTP boundary
/// rejects empty prompts before this runs; the short-circuit here is a
/// guard for other callers.
pub async fn route(intent: &dyn IntentService, prompt: &str) -> RouteDecision {
    if prompt.trim().is_empty() {
        return RouteDecision::Text;
    }

    match intent.classify(prompt).await {
        Ok(decision) => decision,
        Err(e) => {
            warn!("Intent classification failed: {}. Defaulting to TEXT", e);
            RouteDecision::Text
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::MockIntentClient;
    use crate::Error;

    #[tokio::test]
    async fn test_route_follows_classifier_decision() {
        let intent = MockIntentClient::new().with_decision(RouteDecision::Image);
        assert_eq!(route(&intent, "draw a cat").await, RouteDecision::Image);

        let intent = MockIntentClient::new().with_decision(RouteDecision::Text);
        assert_eq!(route(&intent, "how are you").await, RouteDecision::Text);
    }

    #[tokio::test]
    async fn test_route_defaults_to_text_on_classifier_error() {
        let intent = MockIntentClient::new().with_error(Error::ProviderTerminal {
            status: 500,
            message: "classifier down".to_string(),
        });

        assert_eq!(route(&intent, "draw a cat").await, RouteDecision::Text);
    }

    #[tokio::test]
    async fn test_route_short_circuits_empty_prompt() {
        let intent = MockIntentClient::new().with_decision(RouteDecision::Image);
        assert_eq!(route(&intent, "   ").await, RouteDecision::Text);
        // The classifier was never consulted.
        assert_eq!(intent.get_call_count(), 0);
    }
}
