//! Validating extractors

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
};
use faultline_core::{IllegalArgument, ParamViolations, detail};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::api::error::AppError;

/// JSON body that has passed `validator` checks
///
/// Unparseable JSON is rejected as a bad request; constraint failures are
/// reported as body validation with one detail per failed constraint.
#[derive(Debug, Clone)]
pub struct ValidJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| IllegalArgument(rejection.body_text()))?;
        value.validate()?;
        Ok(Self(value))
    }
}

/// Query string that has passed `validator` checks
///
/// Constraint failures are reported as parameter validation.
#[derive(Debug, Clone)]
pub struct ValidQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| IllegalArgument(rejection.body_text()))?;
        value
            .validate()
            .map_err(|errors| ParamViolations(detail::constraint_violations(&errors)))?;
        Ok(Self(value))
    }
}
