//! `POST /api/admin/logout`.

use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    cookie::{CookieStore, HeaderCookies},
    error::AuthError,
    state::AuthState,
    types::{ErrorResponse, LogoutResponse},
};

#[utoipa::path(
    post,
    path = "/api/admin/logout",
    responses(
        (status = 200, description = "Session cookie cleared", body = LogoutResponse),
        (status = 500, description = "Unexpected error", body = ErrorResponse)
    ),
    tag = "admin"
)]
#[instrument(skip_all)]
pub async fn logout(headers: HeaderMap, auth_state: Extension<Arc<AuthState>>) -> Response {
    let mut cookies = HeaderCookies::new(&headers);
    match logout_flow(&auth_state, &mut cookies) {
        Ok(body) => (StatusCode::OK, cookies.into_headers(), Json(body)).into_response(),
        Err(err) => err.into_response(),
    }
}

/// Always clear the cookie, whether or not one was sent.
///
/// # Errors
/// Returns `Internal` if the store rejects the cleared cookie.
pub fn logout_flow(
    state: &AuthState,
    cookies: &mut dyn CookieStore,
) -> Result<LogoutResponse, AuthError> {
    let had_session = state.cookies().read(cookies).is_some();
    state.cookies().clear(cookies)?;
    info!(had_session, "Admin logged out");
    Ok(LogoutResponse { success: true })
}
