//! Error response body shared by every failing endpoint

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::code::ErrorCode;

/// Latest timestamp handed out in this process, in microseconds
static LAST_TIMESTAMP_MICROS: AtomicI64 = AtomicI64::new(i64::MIN);

/// Wall clock reading that never goes back past an earlier error's timestamp
fn error_timestamp() -> DateTime<Utc> {
    let now = Utc::now();
    let micros = advance(&LAST_TIMESTAMP_MICROS, now.timestamp_micros());
    DateTime::<Utc>::from_timestamp_micros(micros).unwrap_or(now)
}

// Returns the larger of `now` and the last value, recording it.
fn advance(last: &AtomicI64, now: i64) -> i64 {
    last.fetch_max(now, Ordering::Relaxed).max(now)
}

/// One field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct ValidationErrorDetail {
    /// Path of the offending input, e.g. `email` or `address.city`
    field: String,
    /// Resolved human-readable description of the violation
    message: String,
}

impl ValidationErrorDetail {
    /// Create a detail for `field`
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Path of the offending input
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Violation message
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Standard error contract
///
/// Built exactly once when a failure is classified, then serialized and
/// dropped. Fields are private: an `ApiError` cannot be changed after
/// construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(description = "Standard error contract")]
pub struct ApiError {
    /// Instant the error was constructed (UTC)
    timestamp: DateTime<Utc>,
    /// Request path that triggered the failure
    path: String,
    /// HTTP status code
    status: u16,
    /// Logical error kind
    code: ErrorCode,
    /// Human-readable summary
    message: String,
    /// Field-level validation failures, absent unless `code` is `VALIDATION_ERROR`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    details: Vec<ValidationErrorDetail>,
    /// Correlation id for server logs
    error_id: Uuid,
}

impl ApiError {
    /// Build an error without validation details and a fresh id
    pub fn build(
        status: u16,
        code: ErrorCode,
        message: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self::build_with_id(status, code, message, path, Uuid::new_v4())
    }

    /// Build an error without validation details using a pre-generated id
    ///
    /// Used when the id has to show up in a log line as well as in the body.
    pub fn build_with_id(
        status: u16,
        code: ErrorCode,
        message: impl Into<String>,
        path: impl Into<String>,
        error_id: Uuid,
    ) -> Self {
        Self::assemble(status, code, message.into(), path.into(), Vec::new(), error_id)
    }

    /// Build a validation error carrying `details` and a fresh id
    ///
    /// `None` is treated as no details.
    pub fn validation(
        status: u16,
        code: ErrorCode,
        message: impl Into<String>,
        path: impl Into<String>,
        details: impl Into<Option<Vec<ValidationErrorDetail>>>,
    ) -> Self {
        Self::validation_with_id(status, code, message, path, details, Uuid::new_v4())
    }

    /// Build a validation error using a pre-generated id
    pub fn validation_with_id(
        status: u16,
        code: ErrorCode,
        message: impl Into<String>,
        path: impl Into<String>,
        details: impl Into<Option<Vec<ValidationErrorDetail>>>,
        error_id: Uuid,
    ) -> Self {
        let mut details = details.into().unwrap_or_default();
        details.shrink_to_fit();
        Self::assemble(status, code, message.into(), path.into(), details, error_id)
    }

    fn assemble(
        status: u16,
        code: ErrorCode,
        message: String,
        path: String,
        details: Vec<ValidationErrorDetail>,
        error_id: Uuid,
    ) -> Self {
        let message = if message.trim().is_empty() {
            code.as_str().to_string()
        } else {
            message
        };

        Self {
            timestamp: error_timestamp(),
            path,
            status,
            code,
            message,
            details,
            error_id,
        }
    }

    /// Instant the error was constructed
    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Request path that triggered the failure
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// HTTP status code
    #[must_use]
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Logical error kind
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable summary
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Validation details, in the order the validator reported them
    #[must_use]
    pub fn details(&self) -> &[ValidationErrorDetail] {
        &self.details
    }

    /// Correlation id
    #[must_use]
    pub fn error_id(&self) -> Uuid {
        self.error_id
    }
}
