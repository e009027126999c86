//! faultline-api: Shared error contract types
//!
//! Contains the wire representation of every error response produced by the
//! daemon (`ApiError`), the closed set of logical error kinds (`ErrorCode`),
//! field-level validation details and the small probe response types.

pub mod code;
pub mod error;
pub mod responses;

pub use code::{ErrorCode, UnknownErrorCode};
pub use error::{ApiError, ValidationErrorDetail};
