//! Admin authentication.
//!
//! A single configured password unlocks the admin area. A successful login
//! issues an HS256 token that lives only in the `admin_jwt_token` cookie; the
//! server keeps no session table, so logout just clears the cookie and a token
//! stays valid until it expires.
//!
//! ## Modules
//!
//! - `token`: issue and verify signed tokens.
//! - `credential`: constant-time password check.
//! - `cookie`: session cookie attributes and the `CookieStore` seam.
//! - `login` / `logout`: the two `POST` endpoints.
//! - `gate`: the `AdminSession` extractor guarding protected routes.

pub mod cookie;
pub mod credential;
pub mod error;
pub mod gate;
pub mod login;
pub mod logout;
pub mod session;
mod state;
pub mod token;
pub mod types;

pub use error::{method_not_allowed, AuthError};
pub use gate::AdminSession;
pub use state::{AuthConfig, AuthState};
