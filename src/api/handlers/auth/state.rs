//! Auth configuration and the shared, read-only auth state.

use anyhow::{Context, Result};
use secrecy::SecretString;

use super::{
    cookie::SessionCookies,
    credential::AdminCredential,
    token::{TokenCodec, DEFAULT_TOKEN_TTL_SECONDS},
};

#[derive(Clone)]
pub struct AuthConfig {
    jwt_secret: SecretString,
    admin_password: Option<SecretString>,
    session_ttl_seconds: i64,
    secure_cookies: bool,
}

impl AuthConfig {
    #[must_use]
    pub fn new(jwt_secret: SecretString) -> Self {
        Self {
            jwt_secret,
            admin_password: None,
            session_ttl_seconds: DEFAULT_TOKEN_TTL_SECONDS,
            secure_cookies: true,
        }
    }

    #[must_use]
    pub fn with_admin_password(mut self, password: Option<SecretString>) -> Self {
        self.admin_password = password;
        self
    }

    #[must_use]
    pub fn with_session_ttl_seconds(mut self, seconds: i64) -> Self {
        self.session_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_secure_cookies(mut self, secure: bool) -> Self {
        self.secure_cookies = secure;
        self
    }

    #[must_use]
    pub fn session_ttl_seconds(&self) -> i64 {
        self.session_ttl_seconds
    }

    #[must_use]
    pub fn secure_cookies(&self) -> bool {
        self.secure_cookies
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"***")
            .field(
                "admin_password",
                &self.admin_password.as_ref().map(|_| "***"),
            )
            .field("session_ttl_seconds", &self.session_ttl_seconds)
            .field("secure_cookies", &self.secure_cookies)
            .finish()
    }
}

#[derive(Debug)]
pub struct AuthState {
    codec: TokenCodec,
    credential: AdminCredential,
    cookies: SessionCookies,
}

impl AuthState {
    /// Build the auth state from configuration.
    ///
    /// # Errors
    /// Returns an error if the signing secret is missing or the TTL is invalid.
    pub fn new(config: AuthConfig) -> Result<Self> {
        let codec = TokenCodec::new(config.jwt_secret, config.session_ttl_seconds)
            .context("invalid token configuration")?;
        Ok(Self {
            codec,
            credential: AdminCredential::new(config.admin_password),
            cookies: SessionCookies::new(config.secure_cookies, config.session_ttl_seconds),
        })
    }

    #[must_use]
    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    #[must_use]
    pub fn credential(&self) -> &AdminCredential {
        &self.credential
    }

    #[must_use]
    pub fn cookies(&self) -> &SessionCookies {
        &self.cookies
    }
}
