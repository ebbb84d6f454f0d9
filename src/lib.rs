//! # siteadmin
//!
//! Admin authentication for the marketing site's content area.
//!
//! ## Flow
//!
//! 1. `POST /api/admin/login` checks the submitted password against the
//!    configured admin secret.
//! 2. On success an HS256 token (`sub`, `role`, `iat`, `exp`) is issued and
//!    stored in the `admin_jwt_token` cookie for eight hours.
//! 3. Protected routes re-verify the cookie token on every request; nothing is
//!    kept server side, so a token stays valid until it expires.
//! 4. `POST /api/admin/logout` clears the cookie.

pub mod api;
pub mod cli;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
