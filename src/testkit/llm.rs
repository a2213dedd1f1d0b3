//! Mock [`ChatTransport`] for invocation tests.
//!
//! [`ScriptedTransport`] pops one scripted outcome per attempt and falls back
//! to a fixed outcome once the script runs out. It records every request so
//! tests can assert on attempt counts and request shape.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::InvocationConfig;
use crate::error::InvocationError;
use crate::port::outbound::llm::{
    ChatCompletion, ChatRequest, ChatTransport, Choice, ChoiceMessage, Usage,
};

type Outcome = Result<ChatCompletion, InvocationError>;
type Fallback = Box<dyn Fn() -> Outcome + Send + Sync>;

/// Build a completion with a single choice.
pub fn completion(content: &str) -> ChatCompletion {
    ChatCompletion {
        choices: vec![Choice {
            message: ChoiceMessage {
                content: content.to_string(),
            },
        }],
        usage: Usage {
            prompt_tokens: 10,
            completion_tokens: 5,
            total_tokens: 15,
        },
        model: "scripted".into(),
        id: "scripted-1".into(),
    }
}

/// A transport with pre-loaded outcomes.
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Outcome>>,
    fallback: Fallback,
    attempts: AtomicU32,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedTransport {
    fn with_fallback(fallback: Fallback) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback,
            attempts: AtomicU32::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Always reply with `content`.
    pub fn replying(content: &str) -> Self {
        let content = content.to_string();
        Self::with_fallback(Box::new(move || Ok(completion(&content))))
    }

    /// Always fail with the error produced by `error`.
    pub fn always<F>(error: F) -> Self
    where
        F: Fn() -> InvocationError + Send + Sync + 'static,
    {
        Self::with_fallback(Box::new(move || Err(error())))
    }

    /// Always reply with zero choices.
    pub fn empty() -> Self {
        Self::with_fallback(Box::new(|| {
            Ok(ChatCompletion {
                choices: Vec::new(),
                usage: Usage::default(),
                model: "scripted".into(),
                id: "scripted-empty".into(),
            })
        }))
    }

    /// Queue outcomes consumed before the fallback.
    pub fn with_script(self, outcomes: Vec<Outcome>) -> Self {
        *self.script.lock() = outcomes.into();
        self
    }

    /// Number of `send` calls so far.
    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<ChatRequest> {
        self.requests.lock().last().cloned()
    }
}

#[async_trait]
impl ChatTransport for ScriptedTransport {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn send(&self, _config: &InvocationConfig, request: &ChatRequest) -> Outcome {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(request.clone());
        let next = self.script.lock().pop_front();
        next.unwrap_or_else(|| (self.fallback)())
    }
}
