//! `GET /api/admin/session`: lets the admin UI ask whether it is signed in.

use axum::Json;

use super::{
    gate::AdminSession,
    types::{ErrorResponse, SessionResponse},
};

#[utoipa::path(
    get,
    path = "/api/admin/session",
    responses(
        (status = 200, description = "Session is active", body = SessionResponse),
        (status = 401, description = "No valid session; any bad cookie is cleared", body = ErrorResponse),
        (status = 403, description = "Token is not for the admin role", body = ErrorResponse)
    ),
    tag = "admin"
)]
pub async fn session(AdminSession { claims }: AdminSession) -> Json<SessionResponse> {
    Json(SessionResponse {
        success: true,
        subject: claims.subject,
        role: claims.role,
        expires_at: claims.expires_at,
    })
}
