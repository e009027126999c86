//! Failure to response mapping
//!
//! The mapper is a pure function of `(failure, request path)`. It shares
//! nothing between requests except the read-only [`Messages`], so it can be
//! cloned into every handler task and called concurrently without locking.

use std::sync::Arc;

use faultline_api::{ApiError, ErrorCode, ValidationErrorDetail};
use http::StatusCode;
use uuid::Uuid;

use crate::config::Messages;
use crate::detail;
use crate::error::Failure;

/// Status and body chosen for one failed request
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub status: StatusCode,
    pub body: ApiError,
}

impl Resolution {
    /// Build the resolution for `code`, keeping status and code consistent
    ///
    /// Shared by the mapper and the security adapters so both produce the
    /// same body shape.
    pub fn new(
        code: ErrorCode,
        message: impl Into<String>,
        path: &str,
        details: Option<Vec<ValidationErrorDetail>>,
        error_id: Uuid,
    ) -> Self {
        let status = status_for(code);
        let body = match details {
            Some(details) => {
                ApiError::validation_with_id(status.as_u16(), code, message, path, details, error_id)
            }
            None => ApiError::build_with_id(status.as_u16(), code, message, path, error_id),
        };
        Self { status, body }
    }
}

/// HTTP status for an error code
pub fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::ValidationError | ErrorCode::BadRequest => StatusCode::BAD_REQUEST,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Classifies failures and builds their error bodies
#[derive(Debug, Clone, Default)]
pub struct ErrorMapper {
    messages: Arc<Messages>,
}

impl ErrorMapper {
    pub fn new(messages: Messages) -> Self {
        Self::with_shared(Arc::new(messages))
    }

    pub fn with_shared(messages: Arc<Messages>) -> Self {
        Self { messages }
    }

    pub fn messages(&self) -> &Messages {
        &self.messages
    }

    /// Resolve `failure` raised while serving `path`
    ///
    /// Logs at WARN for client errors and at ERROR, with the full failure
    /// chain, for the internal fallback. The logged `error_id` is the one in
    /// the returned body.
    pub fn resolve(&self, failure: &Failure, path: &str) -> Resolution {
        let error_id = Uuid::new_v4();
        let messages = &*self.messages;

        let (code, message, details) = match failure {
            Failure::BodyValidation(errors) => (
                ErrorCode::ValidationError,
                messages.invalid_body.clone(),
                Some(detail::from_field_errors(errors)),
            ),
            Failure::ParamValidation(violations) => (
                ErrorCode::ValidationError,
                messages.invalid_params.clone(),
                Some(detail::from_constraint_violations(violations)),
            ),
            Failure::NotFound(message) => (
                ErrorCode::NotFound,
                echo_or(message.as_deref(), &messages.not_found),
                None,
            ),
            Failure::IllegalArgument(message) => (
                ErrorCode::BadRequest,
                echo_or(message.as_deref(), &messages.bad_request),
                None,
            ),
            Failure::Unauthorized(_) => (ErrorCode::Unauthorized, messages.unauthenticated.clone(), None),
            Failure::Forbidden(_) => (ErrorCode::Forbidden, messages.forbidden.clone(), None),
            Failure::IntegrityViolation(_) => (ErrorCode::Conflict, messages.conflict.clone(), None),
            Failure::Unclassified(_) => (ErrorCode::InternalError, messages.internal.clone(), None),
        };

        let resolution = Resolution::new(code, message, path, details, error_id);
        let status = resolution.status.as_u16();

        match failure {
            Failure::Unclassified(report) => {
                tracing::error!(
                    path,
                    %error_id,
                    %code,
                    error = ?report,
                    "{status} {code}"
                );
            }
            Failure::BodyValidation(_) | Failure::ParamValidation(_) => {
                tracing::warn!(
                    path,
                    %error_id,
                    %code,
                    invalid_fields = failure.detail_count(),
                    "{status} {code}"
                );
            }
            Failure::IntegrityViolation(report) => {
                tracing::warn!(path, %error_id, %code, "{status} {code}");
                tracing::debug!(%error_id, error = %report, "integrity violation detail");
            }
            Failure::Unauthorized(reason) | Failure::Forbidden(reason) => {
                let reason = reason.as_deref().unwrap_or_default();
                tracing::warn!(path, %error_id, %code, reason, "{status} {code}");
            }
            Failure::NotFound(_) | Failure::IllegalArgument(_) => {
                tracing::warn!(path, %error_id, %code, "{status} {code}");
            }
        }

        resolution
    }
}

fn echo_or(message: Option<&str>, fallback: &str) -> String {
    match message {
        Some(message) if !message.trim().is_empty() => message.to_string(),
        _ => fallback.to_string(),
    }
}
