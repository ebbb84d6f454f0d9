//! Authorization gate for admin-only routes.
//!
//! Flow Overview: read the session cookie, verify the token, and hand the
//! claims to the handler. Nothing is remembered between requests; every
//! protected request is checked from scratch.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::debug;

use super::{
    cookie::{CookieStore, HeaderCookies},
    error::AuthError,
    state::AuthState,
    token::{Claims, ADMIN_ROLE},
    types::ErrorCode,
};

/// Check the request's session cookie.
///
/// An invalid token also queues a cookie clear so the browser drops it.
///
/// # Errors
/// - `Authentication(Unauthorized)` when the cookie is missing or the token is invalid,
/// - `Forbidden` when the token is valid but not for the admin role.
pub fn authorize(state: &AuthState, cookies: &mut dyn CookieStore) -> Result<Claims, AuthError> {
    let Some(token) = state.cookies().read(cookies) else {
        debug!("Admin gate denied: no session cookie");
        return Err(AuthError::Authentication(ErrorCode::Unauthorized));
    };

    match state.codec().verify(&token) {
        Ok(claims) if claims.role == ADMIN_ROLE => Ok(claims),
        Ok(claims) => {
            debug!(role = %claims.role, "Admin gate denied: role is not admin");
            Err(AuthError::Forbidden)
        }
        Err(reason) => {
            debug!(reason = %reason, "Admin gate denied: invalid token");
            state.cookies().clear(cookies)?;
            Err(AuthError::Authentication(ErrorCode::Unauthorized))
        }
    }
}

/// Extractor for handlers that require a signed-in admin.
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub claims: Claims,
}

impl AdminSession {
    #[must_use]
    pub fn role(&self) -> &str {
        &self.claims.role
    }
}

/// Gate denial, carrying any `Set-Cookie` header that clears a bad token.
#[derive(Debug)]
pub struct GateRejection {
    error: AuthError,
    headers: HeaderMap,
}

impl IntoResponse for GateRejection {
    fn into_response(self) -> Response {
        (self.headers, self.error).into_response()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AdminSession
where
    S: Send + Sync,
{
    type Rejection = GateRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(auth_state) = parts.extensions.get::<Arc<AuthState>>().cloned() else {
            return Err(GateRejection {
                error: AuthError::Internal("auth state extension missing".to_string()),
                headers: HeaderMap::new(),
            });
        };

        let mut cookies = HeaderCookies::new(&parts.headers);
        match authorize(&auth_state, &mut cookies) {
            Ok(claims) => Ok(Self { claims }),
            Err(error) => Err(GateRejection {
                error,
                headers: cookies.into_headers(),
            }),
        }
    }
}
