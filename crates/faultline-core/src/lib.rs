//! faultline-core: Failure taxonomy and error mapping
//!
//! Classifies every failure raised while serving a request into one of the
//! [`ErrorCode`](faultline_api::ErrorCode) kinds and builds the matching
//! [`ApiError`](faultline_api::ApiError) body. Contains the failure signal
//! types, the validation detail extractor, the precedence-ordered mapper and
//! the two security failure adapters.

pub mod config;
pub mod detail;
pub mod error;
pub mod mapper;
pub mod persistence;
pub mod security;

pub use config::Messages;
pub use detail::{ConstraintViolation, FieldError};
pub use error::{
    Failure, Forbidden, IllegalArgument, IntegrityViolation, NotFound, ParamViolations, Unauthorized,
};
pub use mapper::{ErrorMapper, Resolution};
pub use security::{AuthenticationFailed, AuthorizationFailed, SecurityFailureAdapter};
