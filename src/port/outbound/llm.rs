//! Chat completion port for model provider adapters.
//!
//! Defines a single-attempt transport for the OpenAI-compatible chat
//! completions protocol. Retry and backoff live above this port in
//! [`InvocationClient`](crate::application::invocation::InvocationClient).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::InvocationConfig;
use crate::error::InvocationError;

/// Sampling temperature sent with every request.
///
/// Kept low so decisions come back in a stable structured shape.
pub const TEMPERATURE: f64 = 0.5;

/// Upper bound on generated tokens per request.
pub const MAX_TOKENS: u32 = 2000;

/// Role of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One message in a chat request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// Request body for `POST {base_url}/chat/completions`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl ChatRequest {
    /// Build the fixed-shape request: optional system message, then the user message.
    #[must_use]
    pub fn new(model: impl Into<String>, system_prompt: &str, user_prompt: &str) -> Self {
        let mut messages = Vec::with_capacity(2);
        if !system_prompt.is_empty() {
            messages.push(ChatMessage {
                role: Role::System,
                content: system_prompt.to_string(),
            });
        }
        messages.push(ChatMessage {
            role: Role::User,
            content: user_prompt.to_string(),
        });

        Self {
            model: model.into(),
            messages,
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        }
    }

    /// Total prompt length in bytes, for request-size logging.
    #[must_use]
    pub fn prompt_len(&self) -> usize {
        self.messages.iter().map(|m| m.content.len()).sum()
    }
}

/// Token accounting reported by the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
    #[serde(default)]
    pub total_tokens: u64,
}

/// Message body of a completion choice.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: String,
}

/// One completion choice.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

/// Parsed chat completion response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChatCompletion {
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Usage,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub id: String,
}

impl ChatCompletion {
    /// Content of the first choice.
    ///
    /// # Errors
    ///
    /// Returns [`InvocationError::EmptyResponse`] when the provider returned no choices.
    pub fn into_content(self) -> Result<String, InvocationError> {
        self.choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(InvocationError::EmptyResponse)
    }
}

/// Single-attempt chat completion transport.
///
/// Implementations send exactly one request per call and classify failures
/// into [`InvocationError`] variants; they never retry.
///
/// # Thread Safety
///
/// Implementations must be thread-safe (`Send + Sync`): every worker in the
/// fleet shares one transport.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Return the transport name for logging.
    fn name(&self) -> &'static str;

    /// Send one request using the given per-call configuration.
    async fn send(
        &self,
        config: &InvocationConfig,
        request: &ChatRequest,
    ) -> Result<ChatCompletion, InvocationError>;
}
