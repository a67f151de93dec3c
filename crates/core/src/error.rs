//! Error types for the SonjuTalk domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.
//!
//! Out-of-range or non-numeric quiz answers are deliberately NOT errors —
//! they are re-prompt outcomes handled by the quiz session state machine.

use thiserror::Error;

/// The top-level error type for all SonjuTalk operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Quiz validation errors ---
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

/// Failures while repairing and validating the model's quiz output.
///
/// Each variant corresponds to one stage of the validation pipeline;
/// all of them collapse to the same user-facing retry message.
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    #[error("Quiz output is not valid JSON: {0}")]
    MalformedJson(String),

    #[error("Quiz output is missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    #[error("Quiz has {0} options (4 required)")]
    BadOptionCount(usize),

    #[error("correct_answer is '{0}' (integer 1-4 required)")]
    BadAnswerRange(String),
}
