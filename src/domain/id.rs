//! Domain identifier types with proper encapsulation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Trader identifier - newtype for type safety.
///
/// Unique and stable across the lifetime of a desired-state record. The inner
/// String is private to ensure all construction goes through the defined
/// constructors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraderId(String);

impl TraderId {
    /// Create a new `TraderId` from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the trader ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the identifier is empty or whitespace only.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for TraderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for TraderId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for TraderId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_and_as_str_agree() {
        let id = TraderId::new("deepseek_trader");
        assert_eq!(id.as_str(), "deepseek_trader");
        assert_eq!(id.to_string(), "deepseek_trader");
    }

    #[test]
    fn blank_detection() {
        assert!(TraderId::new("").is_blank());
        assert!(TraderId::new("   ").is_blank());
        assert!(!TraderId::new("a").is_blank());
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = TraderId::from("qwen_trader");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"qwen_trader\"");
        let back: TraderId = serde_json::from_str("\"qwen_trader\"").unwrap();
        assert_eq!(back, id);
    }
}
