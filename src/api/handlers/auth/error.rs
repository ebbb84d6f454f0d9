//! Auth error taxonomy and its JSON rendering.

use axum::{
    http::{header::ALLOW, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::future::{ready, Ready};
use thiserror::Error;

use super::types::{ErrorCode, ErrorResponse};

#[derive(Debug, Error)]
pub enum AuthError {
    /// Bad or missing input the caller can correct.
    #[error("validation failed: {0}")]
    Validation(ErrorCode),

    /// Wrong password, or a missing/invalid/expired token.
    #[error("authentication failed: {0}")]
    Authentication(ErrorCode),

    #[error("admin role required")]
    Forbidden,

    /// Carries the `Allow` header value for the route.
    #[error("method not allowed")]
    MethodNotAllowed(&'static str),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(format!("{err:#}"))
    }
}

impl AuthError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Authentication(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorResponse {
        let (error_code, error) = match self {
            Self::Validation(code) | Self::Authentication(code) => (Some(*code), None),
            Self::Forbidden => (Some(ErrorCode::Forbidden), None),
            Self::MethodNotAllowed(_) => (None, Some("Method not allowed".to_string())),
            Self::Internal(msg) => {
                // Details stay in the logs.
                tracing::error!(error = %msg, "Internal server error");
                (Some(ErrorCode::Server), None)
            }
        };
        ErrorResponse {
            success: false,
            error_code,
            error,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut headers = HeaderMap::new();
        if let Self::MethodNotAllowed(allow) = self {
            headers.insert(ALLOW, HeaderValue::from_static(allow));
        }
        (status, headers, Json(self.body())).into_response()
    }
}

/// Fallback handler for methods a route does not serve; `allow` names the ones it does.
pub fn method_not_allowed(
    allow: &'static str,
) -> impl FnOnce() -> Ready<AuthError> + Clone + Send + 'static {
    move || ready(AuthError::MethodNotAllowed(allow))
}
