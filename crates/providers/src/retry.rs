//! Client-side timeout with a single retry.
//!
//! The upstream API call has no deadline of its own; this wrapper imposes
//! one and, when it expires, retries exactly once before reporting
//! `ProviderError::Timeout`. Dropping the returned future (e.g. the HTTP
//! client disconnected) cancels the in-flight request.

use async_trait::async_trait;
use sonjutalk_core::error::ProviderError;
use sonjutalk_core::provider::{Provider, ProviderRequest, ProviderResponse};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Wraps a provider with a per-request deadline and one timeout retry.
pub struct RetryProvider {
    inner: Arc<dyn Provider>,
    timeout: Duration,
}

impl RetryProvider {
    pub fn new(inner: Arc<dyn Provider>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }
}

#[async_trait]
impl Provider for RetryProvider {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn complete(
        &self,
        request: ProviderRequest,
    ) -> std::result::Result<ProviderResponse, ProviderError> {
        for attempt in 1..=2u8 {
            match tokio::time::timeout(self.timeout, self.inner.complete(request.clone())).await {
                Ok(result) => return result,
                Err(_) if attempt == 1 => {
                    warn!(
                        provider = %self.inner.name(),
                        timeout_secs = self.timeout.as_secs(),
                        "Completion timed out, retrying once"
                    );
                }
                Err(_) => break,
            }
        }

        Err(ProviderError::Timeout(format!(
            "Provider '{}' timed out twice after {}s",
            self.inner.name(),
            self.timeout.as_secs()
        )))
    }

    async fn health_check(&self) -> std::result::Result<bool, ProviderError> {
        self.inner.health_check().await
    }
}
