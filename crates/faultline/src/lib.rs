//! faultline daemon
//!
//! axum HTTP server that reports every failure through the standard error
//! contract: an error boundary resolving handler failures, HTTP Basic route
//! protection with uniform 401/403 bodies, validating extractors and the
//! OpenAPI description of the contract.

pub mod api;
pub mod config;
pub mod docs;
pub mod router;
pub mod security;
pub mod state;

pub use api::{AppError, ValidJson, ValidQuery};
pub use config::Config;
pub use router::{create_router, with_error_handling};
pub use state::AppState;
