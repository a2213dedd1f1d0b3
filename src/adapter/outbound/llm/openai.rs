//! OpenAI-compatible chat completions transport.
//!
//! DeepSeek, Qwen (DashScope compatible mode) and custom endpoints all speak
//! the same protocol: `POST {base_url}/chat/completions` with a bearer token.
//! One [`HttpChatTransport`] serves every provider; endpoint, key and timeout
//! come from the per-call [`InvocationConfig`].

use async_trait::async_trait;
use reqwest::Client;

use crate::domain::InvocationConfig;
use crate::error::{is_transient_message, InvocationError};
use crate::port::outbound::llm::{ChatCompletion, ChatRequest, ChatTransport};

/// HTTP transport for the chat completions protocol.
#[derive(Debug, Clone, Default)]
pub struct HttpChatTransport {
    /// Shared HTTP client. Timeouts are applied per request.
    client: Client,
}

impl HttpChatTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

/// Sort a reqwest failure into transient or permanent.
///
/// reqwest flags timeouts and connect failures directly; anything else falls
/// back to the message (including its source chain) against the transient
/// indicator set.
fn classify(error: &reqwest::Error) -> InvocationError {
    let message = error_chain(error);
    if error.is_timeout() || error.is_connect() || is_transient_message(&message) {
        InvocationError::Transient(message)
    } else {
        InvocationError::Permanent(message)
    }
}

fn error_chain(error: &(dyn std::error::Error + 'static)) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = inner.source();
    }
    message
}

#[async_trait]
impl ChatTransport for HttpChatTransport {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn send(
        &self,
        config: &InvocationConfig,
        request: &ChatRequest,
    ) -> Result<ChatCompletion, InvocationError> {
        let response = self
            .client
            .post(config.completions_url())
            .bearer_auth(&config.api_key)
            .timeout(config.timeout)
            .json(request)
            .send()
            .await
            .map_err(|e| classify(&e))?;

        let status = response.status();
        // The body read can itself hit a premature EOF.
        let body = response.text().await.map_err(|e| classify(&e))?;
        if !status.is_success() {
            return Err(InvocationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body)
            .map_err(|e| InvocationError::Permanent(format!("invalid completion response: {e}")))
    }
}
