use super::handlers::{auth, health};
use utoipa::openapi::{License, Tag};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(paths(
    health::health,
    auth::login::login,
    auth::logout::logout,
    auth::session::session
))]
struct ApiDoc;

/// `OpenAPI` document for every documented route, with Cargo metadata as info.
#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();

    doc.info.title = env!("CARGO_PKG_NAME").to_string();
    doc.info.version = env!("CARGO_PKG_VERSION").to_string();
    doc.info.description = optional_str(env!("CARGO_PKG_DESCRIPTION")).map(str::to_string);
    doc.info.license = optional_str(env!("CARGO_PKG_LICENSE")).map(|identifier| {
        let mut license = License::new(identifier);
        license.identifier = Some(identifier.to_string());
        license
    });

    let mut admin_tag = Tag::new("admin");
    admin_tag.description = Some("Admin login, logout and session".to_string());

    let mut health_tag = Tag::new("health");
    health_tag.description = Some("Liveness".to_string());

    doc.tags = Some(vec![admin_tag, health_tag]);

    doc
}

fn optional_str(value: &'static str) -> Option<&'static str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_info_from_cargo() {
        let doc = openapi();
        assert_eq!(doc.info.title, env!("CARGO_PKG_NAME"));
        assert_eq!(doc.info.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(
            doc.info.description.as_deref(),
            Some(env!("CARGO_PKG_DESCRIPTION"))
        );
    }

    #[test]
    fn openapi_documents_admin_routes() {
        let doc = openapi();
        for path in [
            "/health",
            "/api/admin/login",
            "/api/admin/logout",
            "/api/admin/session",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn optional_str_trims_empty() {
        assert_eq!(optional_str("  "), None);
        assert_eq!(optional_str(" MIT "), Some("MIT"));
    }
}
