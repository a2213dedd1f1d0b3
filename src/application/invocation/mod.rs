//! Resilient model invocation.
//!
//! [`InvocationClient`] turns one logical request into up to
//! [`RetryPolicy::max_attempts`] transport calls. Transient failures are
//! retried with linear backoff; anything else is returned as soon as it is
//! seen. Configuration travels with every call, so workers on different
//! providers never share mutable client state.

mod retry;

pub use retry::{RetryPolicy, DEFAULT_BACKOFF_UNIT, DEFAULT_MAX_ATTEMPTS};

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::InvocationConfig;
use crate::error::InvocationError;
use crate::port::outbound::llm::{ChatRequest, ChatTransport};

/// Model invocation with retry over a shared transport.
#[derive(Clone)]
pub struct InvocationClient {
    transport: Arc<dyn ChatTransport>,
    policy: RetryPolicy,
}

impl InvocationClient {
    #[must_use]
    pub fn new(transport: Arc<dyn ChatTransport>, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    #[must_use]
    pub const fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Run one logical request and return the first completion's text.
    ///
    /// # Errors
    ///
    /// - [`InvocationError::Configuration`] without any attempt when no API key is set.
    /// - The first non-retryable error as-is.
    /// - [`InvocationError::Exhausted`] wrapping the last error once every
    ///   attempt failed with a retryable error.
    pub async fn invoke(
        &self,
        config: &InvocationConfig,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, InvocationError> {
        check_configured(config)?;

        let request = ChatRequest::new(config.model.clone(), system_prompt, user_prompt);
        let mut attempt = 1;
        loop {
            let err = match self.send(config, &request).await {
                Ok(content) => {
                    if attempt > 1 {
                        debug!(
                            provider = %config.provider,
                            attempt,
                            "Invocation succeeded after retry"
                        );
                    }
                    return Ok(content);
                }
                Err(e) => e,
            };

            if !err.is_retryable() {
                debug!(provider = %config.provider, attempt, error = %err, "Non-retryable invocation error");
                return Err(err);
            }
            if !self.policy.has_next(attempt) {
                warn!(
                    provider = %config.provider,
                    attempts = attempt,
                    error = %err,
                    "Invocation retries exhausted"
                );
                return Err(InvocationError::Exhausted {
                    attempts: attempt,
                    source: Box::new(err),
                });
            }

            let delay = self.policy.delay_after(attempt);
            warn!(
                provider = %config.provider,
                attempt,
                max_attempts = self.policy.max_attempts,
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "Transient invocation error, retrying"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    /// Single attempt, no retry.
    ///
    /// # Errors
    ///
    /// Returns whatever the transport or response extraction produced.
    pub async fn invoke_once(
        &self,
        config: &InvocationConfig,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, InvocationError> {
        check_configured(config)?;
        let request = ChatRequest::new(config.model.clone(), system_prompt, user_prompt);
        self.send(config, &request).await
    }

    async fn send(
        &self,
        config: &InvocationConfig,
        request: &ChatRequest,
    ) -> Result<String, InvocationError> {
        debug!(
            transport = self.transport.name(),
            provider = %config.provider,
            model = %config.model,
            prompt_len = request.prompt_len(),
            "Sending chat completion"
        );

        let completion = self.transport.send(config, request).await?;
        debug!(
            provider = %config.provider,
            model = %completion.model,
            prompt_tokens = completion.usage.prompt_tokens,
            completion_tokens = completion.usage.completion_tokens,
            total_tokens = completion.usage.total_tokens,
            "Chat completion received"
        );
        completion.into_content()
    }
}

fn check_configured(config: &InvocationConfig) -> Result<(), InvocationError> {
    if config.api_key.trim().is_empty() {
        return Err(InvocationError::Configuration(format!(
            "API key not set for {} provider",
            config.provider
        )));
    }
    Ok(())
}
