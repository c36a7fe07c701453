//! HTTP boundary: request validation, history/attachment sanitization, and
//! error-to-status mapping over a small set of JSON endpoints.

use crate::ai::mime::sniff_image_mime;
use crate::app::App;
use crate::models::{AspectRatio, Attachment, ChatTurn, NormalizedResponse, RouteDecision};
use crate::{Error, Result};
use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

/// Base64-encoded image attachments run to tens of megabytes.
const MAX_BODY_BYTES: usize = 64 * 1024 * 1024;

#[derive(Debug, Deserialize)]
struct ChatRequestBody {
    prompt: String,
    #[serde(default)]
    history: Vec<ChatTurn>,
    #[serde(default)]
    attachments: Vec<Attachment>,
}

#[derive(Debug, Deserialize)]
struct ImageRequestBody {
    prompt: String,
    #[serde(default)]
    attachments: Vec<Attachment>,
    #[serde(rename = "aspectRatio", default)]
    aspect_ratio: AspectRatio,
}

#[derive(Debug, Deserialize)]
struct MessageRequestBody {
    prompt: String,
    #[serde(default)]
    history: Vec<ChatTurn>,
    #[serde(default)]
    attachments: Vec<Attachment>,
    #[serde(rename = "aspectRatio", default)]
    aspect_ratio: AspectRatio,
}

#[derive(Debug, Serialize)]
struct ChatResponseBody {
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    thoughts: Option<String>,
    #[serde(rename = "tokenCount", skip_serializing_if = "Option::is_none")]
    token_count: Option<u32>,
}

impl From<NormalizedResponse> for ChatResponseBody {
    fn from(normalized: NormalizedResponse) -> Self {
        Self {
            text: normalized.answer_text,
            thoughts: normalized.thought_text,
            token_count: normalized.token_count,
        }
    }
}

#[derive(Debug, Serialize)]
struct ImageResponseBody {
    images: Vec<Attachment>,
    text: String,
}

impl From<NormalizedResponse> for ImageResponseBody {
    fn from(normalized: NormalizedResponse) -> Self {
        Self {
            images: normalized.images,
            text: normalized.answer_text,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum MessageResponseBody {
    Text(ChatResponseBody),
    Image(ImageResponseBody),
}

#[derive(Debug, Serialize)]
struct HealthResponseBody {
    status: &'static str,
    timestamp: String,
}

/// Error wrapper that renders every failure as a JSON `{error}` body. The
/// client UI re-enables its controls off any JSON response, so a raw
/// connection drop or a plain-text body is never acceptable.
#[derive(Debug)]
struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = Json(serde_json::json!({ "error": self.0.to_string() }));
        (status, body).into_response()
    }
}

/// Build the application router.
pub fn router(app: Arc<App>) -> Router {
    Router::new()
        .route("/chat", post(chat))
        .route("/generate-image", post(generate_image))
        .route("/message", post(message))
        .route("/health", get(health))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(app)
}

/// Bind and serve until the process is stopped.
pub async fn serve(app: App, port: u16) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, router(Arc::new(app))).await?;
    Ok(())
}

async fn health() -> Json<HealthResponseBody> {
    Json(HealthResponseBody {
        status: "online",
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": "not found" })),
    )
        .into_response()
}

async fn chat(
    State(app): State<Arc<App>>,
    payload: std::result::Result<Json<ChatRequestBody>, JsonRejection>,
) -> std::result::Result<Json<ChatResponseBody>, ApiError> {
    let Json(body) = payload.map_err(reject)?;
    let request_id = Uuid::new_v4();

    let prompt = require_prompt(&body.prompt)?;
    let history = sanitize_history(body.history);
    let attachments = sanitize_attachments(body.attachments)?;

    info!(
        "[{}] Chat request ({} history turns, {} attachments)",
        request_id,
        history.len(),
        attachments.len()
    );

    let normalized = app
        .chat(prompt, &history, &attachments)
        .await
        .map_err(|e| log_failure(request_id, "chat", e))?;

    Ok(Json(normalized.into()))
}

async fn generate_image(
    State(app): State<Arc<App>>,
    payload: std::result::Result<Json<ImageRequestBody>, JsonRejection>,
) -> std::result::Result<Json<ImageResponseBody>, ApiError> {
    let Json(body) = payload.map_err(reject)?;
    let request_id = Uuid::new_v4();

    let prompt = require_prompt(&body.prompt)?;
    let attachments = sanitize_attachments(body.attachments)?;

    info!(
        "[{}] Image request (aspect ratio {}, {} attachments)",
        request_id,
        body.aspect_ratio.as_str(),
        attachments.len()
    );

    let normalized = app
        .generate_image(prompt, &attachments, body.aspect_ratio)
        .await
        .map_err(|e| log_failure(request_id, "image", e))?;

    // An empty `images` with explanatory text is a legitimate success: the
    // model declined to render and said why.
    Ok(Json(normalized.into()))
}

/// Unified entry point: the intent router decides per message whether this
/// is a chat turn or an image request, then the matching path runs.
async fn message(
    State(app): State<Arc<App>>,
    payload: std::result::Result<Json<MessageRequestBody>, JsonRejection>,
) -> std::result::Result<Json<MessageResponseBody>, ApiError> {
    let Json(body) = payload.map_err(reject)?;
    let request_id = Uuid::new_v4();

    let prompt = require_prompt(&body.prompt)?;
    let history = sanitize_history(body.history);
    let attachments = sanitize_attachments(body.attachments)?;

    let decision = app.route(prompt).await;
    info!("[{}] Routed message as {:?}", request_id, decision);

    match decision {
        RouteDecision::Text => {
            let normalized = app
                .chat(prompt, &history, &attachments)
                .await
                .map_err(|e| log_failure(request_id, "chat", e))?;
            Ok(Json(MessageResponseBody::Text(normalized.into())))
        }
        RouteDecision::Image => {
            let normalized = app
                .generate_image(prompt, &attachments, body.aspect_ratio)
                .await
                .map_err(|e| log_failure(request_id, "image", e))?;
            Ok(Json(MessageResponseBody::Image(normalized.into())))
        }
    }
}

fn reject(rejection: JsonRejection) -> ApiError {
    ApiError(Error::Validation(format!(
        "malformed request body: {}",
        rejection.body_text()
    )))
}

fn log_failure(request_id: Uuid, operation: &str, error: Error) -> ApiError {
    error!("[{}] {} request failed: {}", request_id, operation, error);
    ApiError(error)
}

fn require_prompt(prompt: &str) -> std::result::Result<&str, ApiError> {
    let trimmed = prompt.trim();
    if trimmed.is_empty() {
        return Err(ApiError(Error::Validation(
            "prompt must be a non-empty string".to_string(),
        )));
    }
    Ok(trimmed)
}

/// Drop parts with neither text nor inline data, then turns left with no
/// parts at all.
fn sanitize_history(history: Vec<ChatTurn>) -> Vec<ChatTurn> {
    history
        .into_iter()
        .filter_map(|mut turn| {
            turn.parts.retain(|part| !part.is_empty());
            (!turn.parts.is_empty()).then_some(turn)
        })
        .collect()
}

/// Validate attachment payloads: the base64 must decode, and a missing
/// MIME type is sniffed from the decoded magic bytes.
fn sanitize_attachments(
    attachments: Vec<Attachment>,
) -> std::result::Result<Vec<Attachment>, ApiError> {
    attachments
        .into_iter()
        .enumerate()
        .map(|(index, mut attachment)| {
            let bytes = base64::engine::general_purpose::STANDARD
                .decode(&attachment.data)
                .map_err(|_| {
                    ApiError(Error::Validation(format!(
                        "attachment {} is not valid base64",
                        index
                    )))
                })?;

            if attachment.mime_type.trim().is_empty() {
                let sniffed = sniff_image_mime(&bytes).ok_or_else(|| {
                    ApiError(Error::Validation(format!(
                        "attachment {} has no mimeType and an unrecognized format",
                        index
                    )))
                })?;
                attachment.mime_type = sniffed.to_string();
            }

            Ok(attachment)
        })
        .collect()
}
