//! Security failure adapters
//!
//! Authentication and authorization are decided before a request reaches any
//! handler, so their failures never pass through the [`ErrorMapper`]. The
//! adapters here are registered with the security layer instead and build
//! the same error contract through [`Resolution::new`].
//!
//! [`ErrorMapper`]: crate::mapper::ErrorMapper

use std::sync::Arc;

use faultline_api::ErrorCode;
use uuid::Uuid;

use crate::config::Messages;
use crate::mapper::Resolution;

/// Strategy invoked by the security layer when it rejects a request
pub trait SecurityFailureAdapter: Send + Sync {
    /// Build the response for a rejected request to `path`
    fn respond(&self, path: &str) -> Resolution;
}

/// Credentials missing or invalid (401)
#[derive(Debug, Clone, Default)]
pub struct AuthenticationFailed {
    messages: Arc<Messages>,
}

impl AuthenticationFailed {
    pub fn new(messages: Arc<Messages>) -> Self {
        Self { messages }
    }
}

impl SecurityFailureAdapter for AuthenticationFailed {
    fn respond(&self, path: &str) -> Resolution {
        let error_id = Uuid::new_v4();
        let code = ErrorCode::Unauthorized;
        let resolution = Resolution::new(code, &self.messages.unauthenticated, path, None, error_id);
        tracing::warn!(path, %error_id, %code, "{} {code}", resolution.status.as_u16());
        resolution
    }
}

/// Credentials valid but privilege insufficient (403)
#[derive(Debug, Clone, Default)]
pub struct AuthorizationFailed {
    messages: Arc<Messages>,
}

impl AuthorizationFailed {
    pub fn new(messages: Arc<Messages>) -> Self {
        Self { messages }
    }
}

impl SecurityFailureAdapter for AuthorizationFailed {
    fn respond(&self, path: &str) -> Resolution {
        let error_id = Uuid::new_v4();
        let code = ErrorCode::Forbidden;
        let resolution = Resolution::new(code, &self.messages.forbidden, path, None, error_id);
        tracing::warn!(path, %error_id, %code, "{} {code}", resolution.status.as_u16());
        resolution
    }
}

#[cfg(test)]
mod tests {
    use http::StatusCode;
    use tracing_test::traced_test;

    use super::*;

    #[test]
    #[traced_test]
    fn test_authentication_failed() {
        let res = AuthenticationFailed::default().respond("/admin/ping");

        assert_eq!(res.status, StatusCode::UNAUTHORIZED);
        assert_eq!(res.body.code(), ErrorCode::Unauthorized);
        assert_eq!(res.body.message(), "not authenticated, please sign in");
        assert_eq!(res.body.path(), "/admin/ping");
        assert!(res.body.details().is_empty());
        assert!(logs_contain("401 UNAUTHORIZED"));
        assert!(logs_contain(&res.body.error_id().to_string()));
    }

    #[test]
    fn test_authorization_failed() {
        let res = AuthorizationFailed::default().respond("/admin/ping");

        assert_eq!(res.status, StatusCode::FORBIDDEN);
        assert_eq!(res.body.code(), ErrorCode::Forbidden);
        assert_eq!(res.body.message(), "access denied");
        assert!(res.body.details().is_empty());
    }

    #[test]
    fn test_each_response_gets_fresh_id() {
        let adapter = AuthorizationFailed::default();
        let a = adapter.respond("/admin/ping");
        let b = adapter.respond("/admin/ping");
        assert_ne!(a.body.error_id(), b.body.error_id());
    }

    #[test]
    fn test_adapters_are_object_safe() {
        let adapters: Vec<Arc<dyn SecurityFailureAdapter>> = vec![
            Arc::new(AuthenticationFailed::default()),
            Arc::new(AuthorizationFailed::default()),
        ];
        let codes: Vec<ErrorCode> = adapters.iter().map(|a| a.respond("/x").body.code()).collect();
        assert_eq!(codes, [ErrorCode::Unauthorized, ErrorCode::Forbidden]);
    }
}
