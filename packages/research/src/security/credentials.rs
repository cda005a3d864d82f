//! Credential handling with secure memory.
//!
//! Uses the `secrecy` crate to prevent accidental logging of API keys.

use secrecy::{ExposeSecret, SecretBox};
use std::fmt;

/// A secret string that won't be logged or displayed.
///
/// Search and model API keys travel inside request URLs and headers, so
/// they are wrapped here and only exposed at the call site.
pub struct SecretString(SecretBox<str>);

impl SecretString {
    /// Create a new secret string.
    pub fn new(value: impl Into<String>) -> Self {
        Self(SecretBox::new(Box::from(value.into().as_str())))
    }

    /// Expose the secret value for use in a request.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl Clone for SecretString {
    fn clone(&self) -> Self {
        Self::new(self.expose().to_string())
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for SecretString {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Credentials for the Google Custom Search JSON API.
#[derive(Clone)]
pub struct SearchCredentials {
    /// API key (secret)
    pub api_key: SecretString,

    /// Programmable search engine identifier (`cx`)
    pub engine_id: String,
}

impl SearchCredentials {
    pub fn new(api_key: impl Into<String>, engine_id: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key),
            engine_id: engine_id.into(),
        }
    }
}

impl fmt::Debug for SearchCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchCredentials")
            .field("api_key", &"[REDACTED]")
            .field("engine_id", &self.engine_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_not_in_debug() {
        let secret = SecretString::new("AIza-super-secret-key");
        let debug = format!("{:?}", secret);
        assert!(!debug.contains("AIza"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_secret_not_in_display() {
        let secret = SecretString::new("AIza-super-secret-key");
        let display = format!("{}", secret);
        assert!(!display.contains("AIza"));
        assert!(display.contains("[REDACTED]"));
    }

    #[test]
    fn test_expose_works() {
        let secret = SecretString::new("AIza-super-secret-key");
        assert_eq!(secret.expose(), "AIza-super-secret-key");
    }

    #[test]
    fn test_search_credentials_debug() {
        let creds = SearchCredentials::new("AIza-secret", "engine-123");
        let debug = format!("{:?}", creds);
        assert!(!debug.contains("AIza-secret"));
        assert!(debug.contains("engine-123"));
    }
}
