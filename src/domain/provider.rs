//! Model provider selection and per-call invocation settings.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Supported model providers.
///
/// Every provider speaks the OpenAI-compatible chat completions protocol with
/// bearer authentication; they differ in endpoint, default model and which
/// credentials they require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelProvider {
    /// DeepSeek hosted API.
    DeepSeek,
    /// Alibaba DashScope (Qwen) in OpenAI-compatible mode.
    Qwen,
    /// Any OpenAI-compatible endpoint with an explicit URL and model.
    Custom,
}

impl ModelProvider {
    /// Stable lowercase name used in records, logs and CLI output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DeepSeek => "deepseek",
            Self::Qwen => "qwen",
            Self::Custom => "custom",
        }
    }

    /// Default API base URL, if the provider has one.
    #[must_use]
    pub const fn default_base_url(self) -> Option<&'static str> {
        match self {
            Self::DeepSeek => Some("https://api.deepseek.com/v1"),
            Self::Qwen => Some("https://dashscope.aliyuncs.com/compatible-mode/v1"),
            Self::Custom => None,
        }
    }

    /// Default model name, if the provider has one.
    #[must_use]
    pub const fn default_model(self) -> Option<&'static str> {
        match self {
            Self::DeepSeek => Some("deepseek-chat"),
            Self::Qwen => Some("qwen-plus"),
            Self::Custom => None,
        }
    }
}

impl fmt::Display for ModelProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "deepseek" => Ok(Self::DeepSeek),
            "qwen" => Ok(Self::Qwen),
            "custom" => Ok(Self::Custom),
            other => Err(format!("unsupported model provider '{other}'")),
        }
    }
}

/// Settings for one model invocation.
///
/// Always passed explicitly per call. Workers using different providers never
/// share one of these.
#[derive(Clone, PartialEq, Eq)]
pub struct InvocationConfig {
    pub provider: ModelProvider,
    pub api_key: String,
    /// Secondary key some provider accounts are issued with.
    pub secret_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl InvocationConfig {
    /// Build a config from a provider's defaults.
    ///
    /// Returns `None` for [`ModelProvider::Custom`], which has no defaults.
    #[must_use]
    pub fn for_provider(
        provider: ModelProvider,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Option<Self> {
        Some(Self {
            provider,
            api_key: api_key.into(),
            secret_key: None,
            base_url: provider.default_base_url()?.to_string(),
            model: provider.default_model()?.to_string(),
            timeout,
        })
    }

    /// Build a config for an OpenAI-compatible endpoint.
    #[must_use]
    pub fn custom(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            provider: ModelProvider::Custom,
            api_key: api_key.into(),
            secret_key: None,
            base_url: base_url.into(),
            model: model.into(),
            timeout,
        }
    }

    /// Chat completions endpoint for this config.
    #[must_use]
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

// Keys never reach logs.
impl fmt::Debug for InvocationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InvocationConfig")
            .field("provider", &self.provider)
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
