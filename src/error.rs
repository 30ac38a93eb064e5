use crate::pricing::Warning;
use reqwest::StatusCode;
use thiserror::Error;

/// Application error types
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
    /// Rejected user input (out-of-range preset, malformed value)
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// Quote still carries warnings, submission is blocked
    #[error("Plan has unresolved warnings: {}", join_warnings(.0))]
    ValidationFailed(Vec<Warning>),
    /// Submission attempted without a name
    #[error("Please enter your name")]
    EmptyName,
    /// Session already submitted, no further edits
    #[error("Payment plan was already submitted")]
    SessionClosed,
    /// Another submission is still outstanding
    #[error("A submission is already in progress")]
    SubmissionInFlight,
    /// Webhook answered with a non-success status
    #[error("HTTP error! status: {status}: {message}")]
    UpstreamError { status: StatusCode, message: String },
    /// HTTP request error (transport failure or timeout)
    #[error("HTTP request error: {0}")]
    HttpRequest(#[from] reqwest::Error),
}

impl AppError {
    /// Short machine-readable name, used in structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ConfigError(_) => "config_error",
            Self::InvalidInput(_) => "invalid_input",
            Self::ValidationFailed(_) => "validation_failed",
            Self::EmptyName => "empty_name",
            Self::SessionClosed => "session_closed",
            Self::SubmissionInFlight => "submission_in_flight",
            Self::UpstreamError { .. } => "upstream_error",
            Self::HttpRequest(_) => "http_request_error",
        }
    }

    /// Whether the user can fix the problem and try again
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::UpstreamError { .. } | Self::HttpRequest(_) | Self::SubmissionInFlight
        )
    }
}

fn join_warnings(warnings: &[Warning]) -> String {
    warnings
        .iter()
        .map(|w| w.code())
        .collect::<Vec<_>>()
        .join(", ")
}
