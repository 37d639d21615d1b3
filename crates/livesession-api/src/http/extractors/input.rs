//! Body, path, and query extractors whose rejections use the API envelope.
//!
//! Thin wrappers over axum's own extractors: a malformed body, a non-integer
//! path segment, or a bad query string becomes `AppError::Validation`.

use axum::extract::{FromRequest, FromRequestParts};

use crate::http::error::AppError;

/// JSON request body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Path parameters.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);

/// Query string parameters.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);
