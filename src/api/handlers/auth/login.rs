//! `POST /api/admin/login`.
//!
//! Flow Overview:
//! 1) Validate input: a non-empty `password` is required.
//! 2) Check the password against the configured admin secret.
//! 3) Issue an admin token.
//! 4) Store the token in the session cookie.
//! 5) Respond, echoing `redirectTo` only when it is a same-origin path.
//!
//! Every failure short-circuits before step 4, so a failed login never sets a cookie.

use axum::{
    body::Bytes,
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::{
    cookie::{CookieStore, HeaderCookies},
    error::AuthError,
    state::AuthState,
    token::TokenSubject,
    types::{ErrorCode, ErrorResponse, LoginRequest, LoginResponse},
};

#[utoipa::path(
    post,
    path = "/api/admin/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in; session cookie set", body = LoginResponse),
        (status = 400, description = "Missing or empty password", body = ErrorResponse),
        (status = 401, description = "Wrong password", body = ErrorResponse),
        (status = 500, description = "Unexpected error", body = ErrorResponse)
    ),
    tag = "admin"
)]
#[instrument(skip_all)]
pub async fn login(
    headers: HeaderMap,
    auth_state: Extension<Arc<AuthState>>,
    body: Bytes,
) -> Response {
    // Browsers may post the JSON as `text/plain`, so the content type is not checked.
    let request = serde_json::from_slice::<LoginRequest>(&body).ok();
    let mut cookies = HeaderCookies::new(&headers);
    match login_flow(&auth_state, request, &mut cookies) {
        Ok(response) => (StatusCode::OK, cookies.into_headers(), Json(response)).into_response(),
        Err(err) => err.into_response(),
    }
}

/// Run the login steps against any cookie store.
///
/// An unreadable body arrives as `None` and is treated like a missing password.
///
/// # Errors
/// - `Validation(MissingPassword)` for a missing or blank password,
/// - `Authentication(InvalidPassword)` for a wrong password,
/// - `Internal` if the token cannot be issued or stored.
pub fn login_flow(
    state: &AuthState,
    request: Option<LoginRequest>,
    cookies: &mut dyn CookieStore,
) -> Result<LoginResponse, AuthError> {
    let request = request.unwrap_or_default();

    let password = request
        .password
        .as_deref()
        .map(str::trim)
        .filter(|password| !password.is_empty())
        .ok_or(AuthError::Validation(ErrorCode::MissingPassword))?;

    if !state.credential().validate(password) {
        if state.credential().is_configured() {
            warn!("Admin login rejected: invalid password");
        } else {
            warn!("Admin login rejected: no admin password configured");
        }
        return Err(AuthError::Authentication(ErrorCode::InvalidPassword));
    }

    let issued = state.codec().issue(&TokenSubject::admin())?;

    state.cookies().set(cookies, &issued.token)?;

    info!(expires_at = issued.expires_at, "Admin logged in");

    Ok(LoginResponse {
        success: true,
        redirect_to: request
            .redirect_to
            .filter(|target| is_same_origin_path(target)),
    })
}

/// Relative paths only; `//host` and `/\host` are treated by browsers as other origins.
fn is_same_origin_path(target: &str) -> bool {
    target.starts_with('/') && !target.starts_with("//") && !target.starts_with("/\\")
}
