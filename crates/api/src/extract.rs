//! Validated JSON body extractor.
//!
//! [`ValidatedJson<T>`] runs the DTO's schema (sanitize, constraints,
//! unknown-field policy) and its derived checks before the handler sees the
//! value. The unknown-field policy is read from a [`ValidationPolicy`]
//! request extension installed once by the router.

use axum::extract::{FromRequest, Request};
use axum::Json;
use bcpms_core::error::CoreError;
use bcpms_core::validation::{validate_payload, Dto, UnknownFieldPolicy};
use serde_json::Value;

use crate::error::AppError;

/// Process-wide unknown-field policy, carried as a request extension.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationPolicy(pub UnknownFieldPolicy);

/// JSON body decoded into `T` only after it passes `T`'s schema.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: Dto + Send,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let policy = req
            .extensions()
            .get::<ValidationPolicy>()
            .copied()
            .unwrap_or_default()
            .0;

        let Json(body) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

        match validate_payload::<T>(body, policy) {
            Ok(dto) => Ok(Self(dto)),
            // Not an object, or undecodable after the schema passed.
            Err(CoreError::Validation(msg)) => Err(AppError::BadRequest(msg)),
            Err(other) => Err(other.into()),
        }
    }
}
