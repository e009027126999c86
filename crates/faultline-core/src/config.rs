//! Fixed response messages

use serde::{Deserialize, Serialize};

/// Sentences used for responses whose message is not taken from the failure
///
/// Loaded once at startup (every field may be overridden from the `[messages]`
/// table of the daemon configuration) and shared read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    /// Whole-body validation failure
    pub invalid_body: String,
    /// Parameter validation failure
    pub invalid_params: String,
    /// Not-found fallback when the failure carries no message
    pub not_found: String,
    /// Bad-request fallback when the failure carries no message
    pub bad_request: String,
    /// Integrity violation (never echoes the storage error)
    pub conflict: String,
    /// Unclassified failure
    pub internal: String,
    /// Missing or invalid credentials
    pub unauthenticated: String,
    /// Insufficient privilege
    pub forbidden: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            invalid_body: "the request contains invalid data".to_string(),
            invalid_params: "invalid parameters".to_string(),
            not_found: "resource not found".to_string(),
            bad_request: "invalid request".to_string(),
            conflict: "conflict with current resource state".to_string(),
            internal: "something went wrong, try again later".to_string(),
            unauthenticated: "not authenticated, please sign in".to_string(),
            forbidden: "access denied".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override_keeps_defaults() {
        let messages: Messages = toml::from_str(
            r#"
            forbidden = "acceso denegado"
            "#,
        )
        .unwrap();

        assert_eq!(messages.forbidden, "acceso denegado");
        assert_eq!(messages.not_found, Messages::default().not_found);
        assert_eq!(messages.internal, "something went wrong, try again later");
    }
}
