//! API route handlers

pub mod error;
pub mod extract;
pub mod probe;
pub mod system;

pub use error::AppError;
pub use extract::{ValidJson, ValidQuery};
