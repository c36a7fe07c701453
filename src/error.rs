//! Error handling and custom error types
//!
//! Provides unified error handling across the application using thiserror.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid request: {0}")]
    Validation(String),

    /// Transient provider failure (HTTP 429/503). `estimated_wait_secs`
    /// carries the provider's wait hint when its error body includes one.
    #[error("Provider transient error (status {status}): {message}")]
    ProviderTransient {
        status: u16,
        message: String,
        estimated_wait_secs: Option<u64>,
    },

    #[error("Provider error (status {status}): {message}")]
    ProviderTerminal { status: u16, message: String },

    /// The provider responded successfully but with nothing extractable.
    /// Kept distinct from `ProviderTerminal` so telemetry can separate a
    /// broken integration from a provider that refused to answer.
    #[error("Provider returned no text or image content")]
    NoContent,

    #[error("Retries exhausted after {attempts} attempts (last status {status}): {message}")]
    ExhaustedRetries {
        attempts: u32,
        status: u16,
        message: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Status to surface at the HTTP boundary for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            Error::Validation(_) => 400,
            Error::ProviderTransient { status, .. } => *status,
            Error::ExhaustedRetries { status, .. } => *status,
            _ => 500,
        }
    }
}
