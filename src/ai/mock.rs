//! Mock service implementations for tests and local harnesses.
//!
//! Each mock cycles through queued results and counts calls, so tests can
//! script failure-then-success sequences without a network.

use super::{ChatService, ImageGenerationService, IntentService};
use crate::models::{AspectRatio, Attachment, ChatTurn, NormalizedResponse, RouteDecision};
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

fn clone_error(error: &Error) -> Error {
    match error {
        Error::Validation(msg) => Error::Validation(msg.clone()),
        Error::ProviderTransient {
            status,
            message,
            estimated_wait_secs,
        } => Error::ProviderTransient {
            status: *status,
            message: message.clone(),
            estimated_wait_secs: *estimated_wait_secs,
        },
        Error::ProviderTerminal { status, message } => Error::ProviderTerminal {
            status: *status,
            message: message.clone(),
        },
        Error::NoContent => Error::NoContent,
        Error::ExhaustedRetries {
            attempts,
            status,
            message,
        } => Error::ExhaustedRetries {
            attempts: *attempts,
            status: *status,
            message: message.clone(),
        },
        other => Error::Config(format!("mock cannot clone error: {}", other)),
    }
}

struct ResponseQueue<T: Clone> {
    responses: Mutex<Vec<std::result::Result<T, Error>>>,
    call_count: Mutex<usize>,
}

impl<T: Clone> ResponseQueue<T> {
    fn new() -> Self {
        Self {
            responses: Mutex::new(Vec::new()),
            call_count: Mutex::new(0),
        }
    }

    fn push(&self, entry: std::result::Result<T, Error>) {
        self.responses.lock().unwrap().push(entry);
    }

    fn next(&self, default: T) -> Result<T> {
        let mut count = self.call_count.lock().unwrap();
        *count += 1;

        let responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Ok(default);
        }
        let index = (*count - 1) % responses.len();
        match &responses[index] {
            Ok(value) => Ok(value.clone()),
            Err(error) => Err(clone_error(error)),
        }
    }

    fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

#[derive(Clone)]
pub struct MockChatClient {
    queue: Arc<ResponseQueue<NormalizedResponse>>,
}

impl MockChatClient {
    pub fn new() -> Self {
        Self {
            queue: Arc::new(ResponseQueue::new()),
        }
    }

    pub fn with_response(self, response: NormalizedResponse) -> Self {
        self.queue.push(Ok(response));
        self
    }

    pub fn with_text_response(self, text: &str) -> Self {
        self.with_response(NormalizedResponse {
            answer_text: text.to_string(),
            ..Default::default()
        })
    }

    pub fn with_error(self, error: Error) -> Self {
        self.queue.push(Err(error));
        self
    }

    pub fn get_call_count(&self) -> usize {
        self.queue.call_count()
    }
}

impl Default for MockChatClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatService for MockChatClient {
    async fn complete(
        &self,
        prompt: &str,
        _history: &[ChatTurn],
        _attachments: &[Attachment],
    ) -> Result<NormalizedResponse> {
        self.queue.next(NormalizedResponse {
            answer_text: format!("<p>You said: {}</p>", prompt),
            ..Default::default()
        })
    }
}

#[derive(Clone)]
pub struct MockImageClient {
    queue: Arc<ResponseQueue<NormalizedResponse>>,
}

impl MockImageClient {
    pub fn new() -> Self {
        Self {
            queue: Arc::new(ResponseQueue::new()),
        }
    }

    pub fn with_response(self, response: NormalizedResponse) -> Self {
        self.queue.push(Ok(response));
        self
    }

    pub fn with_image_response(self, data: &str, mime_type: &str) -> Self {
        self.with_response(NormalizedResponse {
            images: vec![Attachment {
                data: data.to_string(),
                mime_type: mime_type.to_string(),
            }],
            ..Default::default()
        })
    }

    pub fn with_error(self, error: Error) -> Self {
        self.queue.push(Err(error));
        self
    }

    pub fn get_call_count(&self) -> usize {
        self.queue.call_count()
    }
}

impl Default for MockImageClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageGenerationService for MockImageClient {
    async fn generate(
        &self,
        _prompt: &str,
        _attachments: &[Attachment],
        _aspect_ratio: AspectRatio,
    ) -> Result<NormalizedResponse> {
        // Default: one 1x1 PNG, base64-encoded.
        self.queue.next(NormalizedResponse {
            images: vec![Attachment {
                data: "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR4nGP4\
                       z8DwHwAFBQIAX8jx0gAAAABJRU5ErkJggg=="
                    .to_string(),
                mime_type: "image/png".to_string(),
            }],
            ..Default::default()
        })
    }
}

#[derive(Clone)]
pub struct MockIntentClient {
    queue: Arc<ResponseQueue<RouteDecision>>,
}

impl MockIntentClient {
    pub fn new() -> Self {
        Self {
            queue: Arc::new(ResponseQueue::new()),
        }
    }

    pub fn with_decision(self, decision: RouteDecision) -> Self {
        self.queue.push(Ok(decision));
        self
    }

    pub fn with_error(self, error: Error) -> Self {
        self.queue.push(Err(error));
        self
    }

    pub fn get_call_count(&self) -> usize {
        self.queue.call_count()
    }
}

impl Default for MockIntentClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IntentService for MockIntentClient {
    async fn classify(&self, _prompt: &str) -> Result<RouteDecision> {
        self.queue.next(RouteDecision::Text)
    }
}
