//! LLM provider implementations for SonjuTalk.
//!
//! - [`OpenAiProvider`] — any OpenAI-compatible `/v1/chat/completions`
//!   endpoint (OpenAI, OpenRouter, Ollama, vLLM, ...).
//! - [`RetryProvider`] — client-side timeout with a single retry, wrapped
//!   around whichever backend is configured.

pub mod openai;
pub mod retry;

pub use openai::OpenAiProvider;
pub use retry::RetryProvider;

use sonjutalk_config::AppConfig;
use sonjutalk_core::Provider;
use std::sync::Arc;
use std::time::Duration;

/// Build the configured provider stack: OpenAI-compatible backend wrapped
/// with the timeout/retry layer.
///
/// The API key must already be validated (`AppConfig::ensure_api_key`).
pub fn build_from_config(config: &AppConfig) -> Arc<dyn Provider> {
    let api_key = config.api_key.clone().unwrap_or_default();
    let backend = OpenAiProvider::new("openai", &config.api_url, api_key);
    Arc::new(RetryProvider::new(
        Arc::new(backend),
        Duration::from_secs(config.request_timeout_secs),
    ))
}
