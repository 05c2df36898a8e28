//! Request-path plumbing: authentication extractors, CORS, and the
//! extractor wrappers that turn axum rejections into [`ApiError`]s.
//!
//! [`ApiError`]: crate::domain::ApiError

pub mod auth;
pub mod cors;

pub use auth::{bearer_token, BearerToken, Caller};
pub use cors::create_cors_layer;

use crate::domain::ApiError;
use axum::extract::{FromRequest, FromRequestParts};

/// JSON body whose rejection is an [`ApiError`].
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Path parameters whose rejection is an [`ApiError`].
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// Query string whose rejection is an [`ApiError`].
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);
