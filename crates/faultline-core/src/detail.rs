//! Validation detail extraction
//!
//! Turns the field-level failures reported by the validation layer into the
//! ordered `(field, message)` pairs carried by an error response. Order is
//! preserved and nothing is deduplicated: two failed constraints on the same
//! field yield two details.

use faultline_api::ValidationErrorDetail;
use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

/// A failed constraint on a request body property
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Declared property name
    pub field: String,
    /// Resolved message
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A failed constraint on a request parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintViolation {
    /// Path of the violated property, e.g. `page`
    pub property_path: String,
    /// Resolved message
    pub message: String,
}

impl ConstraintViolation {
    pub fn new(property_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            property_path: property_path.into(),
            message: message.into(),
        }
    }
}

/// Details for a body validation failure
pub fn from_field_errors(errors: &[FieldError]) -> Vec<ValidationErrorDetail> {
    errors
        .iter()
        .map(|e| ValidationErrorDetail::new(&e.field, &e.message))
        .collect()
}

/// Details for a parameter validation failure
pub fn from_constraint_violations(violations: &[ConstraintViolation]) -> Vec<ValidationErrorDetail> {
    violations
        .iter()
        .map(|v| ValidationErrorDetail::new(&v.property_path, &v.message))
        .collect()
}

/// Flatten `validator` output into body field errors
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut out = Vec::new();
    flatten(errors, None, &mut |field: String, message: String| {
        out.push(FieldError::new(field, message));
    });
    out
}

/// Flatten `validator` output into parameter violations
pub fn constraint_violations(errors: &ValidationErrors) -> Vec<ConstraintViolation> {
    let mut out = Vec::new();
    flatten(errors, None, &mut |path: String, message: String| {
        out.push(ConstraintViolation::new(path, message));
    });
    out
}

// `validator` keys its errors by a hash map; fields are visited in sorted order
// so the output is stable, while constraints within a field keep their order.
fn flatten(errors: &ValidationErrors, prefix: Option<&str>, emit: &mut dyn FnMut(String, String)) {
    let mut fields: Vec<_> = errors.errors().iter().collect();
    fields.sort_by(|(a, _), (b, _)| a.cmp(b));

    for (name, kind) in fields {
        let path = match prefix {
            Some(prefix) => format!("{prefix}.{name}"),
            None => name.to_string(),
        };

        match kind {
            ValidationErrorsKind::Field(list) => {
                for error in list {
                    emit(path.clone(), resolve_message(error));
                }
            }
            ValidationErrorsKind::Struct(inner) => flatten(inner, Some(&path), emit),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    flatten(inner, Some(&format!("{path}[{index}]")), emit);
                }
            }
        }
    }
}

fn resolve_message(error: &ValidationError) -> String {
    match &error.message {
        Some(message) => message.to_string(),
        None => format!("invalid value ({})", error.code),
    }
}
