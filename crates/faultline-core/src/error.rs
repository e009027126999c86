//! Failure signals raised while serving a request

use thiserror::Error;
use validator::ValidationErrors;

use crate::detail::{self, ConstraintViolation, FieldError};
use crate::persistence::{self, PersistenceSignal};

/// A dedicated "resource does not exist" signal
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct NotFound(pub String);

/// Input that is unacceptable but was not caught by declarative validation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct IllegalArgument(pub String);

/// Caller identity missing or rejected, raised after dispatch
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unauthorized: {0}")]
pub struct Unauthorized(pub String);

/// Caller known but not allowed to perform the operation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("forbidden: {0}")]
pub struct Forbidden(pub String);

/// A write rejected by a storage constraint
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("integrity violation: {0}")]
pub struct IntegrityViolation(pub String);

/// Parameter constraints that failed, in reported order
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{} parameter constraint(s) violated", .0.len())]
pub struct ParamViolations(pub Vec<ConstraintViolation>);

/// Every failure the error boundary knows how to report
///
/// Variants are listed in classification precedence. Opaque errors enter
/// through [`Failure::classify`], which checks them in the same order.
#[derive(Error, Debug)]
pub enum Failure {
    /// Whole request body failed validation
    #[error("request body failed validation on {} field(s)", .0.len())]
    BodyValidation(Vec<FieldError>),

    /// Request parameters failed validation
    #[error("request parameters failed validation on {} field(s)", .0.len())]
    ParamValidation(Vec<ConstraintViolation>),

    /// Resource or persisted entity is missing
    #[error("not found: {}", .0.as_deref().unwrap_or("<no message>"))]
    NotFound(Option<String>),

    /// Unacceptable input
    #[error("illegal argument: {}", .0.as_deref().unwrap_or("<no message>"))]
    IllegalArgument(Option<String>),

    /// Handler rejected the caller's identity, the reason is only logged
    #[error("unauthorized: {}", .0.as_deref().unwrap_or("<no reason>"))]
    Unauthorized(Option<String>),

    /// Handler rejected the caller's privilege, the reason is only logged
    #[error("forbidden: {}", .0.as_deref().unwrap_or("<no reason>"))]
    Forbidden(Option<String>),

    /// Storage rejected a write
    #[error("integrity violation: {0}")]
    IntegrityViolation(eyre::Report),

    /// Anything that matched no other rule
    #[error("unclassified failure: {0}")]
    Unclassified(eyre::Report),
}

impl Failure {
    /// Classify an opaque error by checking the signal types in precedence order
    pub fn classify(report: eyre::Report) -> Self {
        if let Some(errors) = report.downcast_ref::<ValidationErrors>() {
            return Failure::BodyValidation(detail::field_errors(errors));
        }
        if let Some(ParamViolations(violations)) = report.downcast_ref::<ParamViolations>() {
            return Failure::ParamValidation(violations.clone());
        }
        if let Some(NotFound(message)) = report.downcast_ref::<NotFound>() {
            return Failure::NotFound(Some(message.clone()));
        }
        let persisted = report
            .downcast_ref::<sqlx::Error>()
            .and_then(persistence::classify);
        if persisted == Some(PersistenceSignal::Missing) {
            return Failure::NotFound(None);
        }
        if let Some(IllegalArgument(message)) = report.downcast_ref::<IllegalArgument>() {
            return Failure::IllegalArgument(Some(message.clone()));
        }
        if let Some(Unauthorized(reason)) = report.downcast_ref::<Unauthorized>() {
            return Failure::Unauthorized(Some(reason.clone()));
        }
        if let Some(Forbidden(reason)) = report.downcast_ref::<Forbidden>() {
            return Failure::Forbidden(Some(reason.clone()));
        }
        if persisted == Some(PersistenceSignal::Integrity)
            || report.downcast_ref::<IntegrityViolation>().is_some()
        {
            return Failure::IntegrityViolation(report);
        }
        Failure::Unclassified(report)
    }

    /// Wrap any error and classify it
    pub fn from_error<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::classify(eyre::Report::new(error))
    }

    /// Build an unclassified failure from a message
    pub fn internal(message: impl Into<String>) -> Self {
        let message: String = message.into();
        Failure::Unclassified(eyre::eyre!(message))
    }

    /// Number of field-level details this failure carries
    #[must_use]
    pub fn detail_count(&self) -> usize {
        match self {
            Failure::BodyValidation(errors) => errors.len(),
            Failure::ParamValidation(violations) => violations.len(),
            _ => 0,
        }
    }
}

impl From<eyre::Report> for Failure {
    fn from(report: eyre::Report) -> Self {
        Self::classify(report)
    }
}

impl From<ValidationErrors> for Failure {
    fn from(errors: ValidationErrors) -> Self {
        Failure::BodyValidation(detail::field_errors(&errors))
    }
}

impl From<ParamViolations> for Failure {
    fn from(ParamViolations(violations): ParamViolations) -> Self {
        Failure::ParamValidation(violations)
    }
}

impl From<NotFound> for Failure {
    fn from(NotFound(message): NotFound) -> Self {
        Failure::NotFound(Some(message))
    }
}

impl From<IllegalArgument> for Failure {
    fn from(IllegalArgument(message): IllegalArgument) -> Self {
        Failure::IllegalArgument(Some(message))
    }
}

impl From<Unauthorized> for Failure {
    fn from(Unauthorized(reason): Unauthorized) -> Self {
        Failure::Unauthorized(Some(reason))
    }
}

impl From<Forbidden> for Failure {
    fn from(Forbidden(reason): Forbidden) -> Self {
        Failure::Forbidden(Some(reason))
    }
}

impl From<IntegrityViolation> for Failure {
    fn from(violation: IntegrityViolation) -> Self {
        Failure::IntegrityViolation(eyre::Report::new(violation))
    }
}

impl From<sqlx::Error> for Failure {
    fn from(error: sqlx::Error) -> Self {
        Self::from_error(error)
    }
}
