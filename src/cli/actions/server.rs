use crate::api::{
    self,
    handlers::auth::{AuthConfig, AuthState},
};
use anyhow::{Context, Result};
use secrecy::SecretString;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub admin_password: Option<SecretString>,
    pub jwt_secret: SecretString,
    pub secure_cookies: bool,
    pub session_ttl_seconds: i64,
}

impl Args {
    fn auth_config(self) -> AuthConfig {
        AuthConfig::new(self.jwt_secret)
            .with_admin_password(self.admin_password)
            .with_session_ttl_seconds(self.session_ttl_seconds)
            .with_secure_cookies(self.secure_cookies)
    }
}

/// Execute the server action.
/// # Errors
/// Returns an error if the auth state cannot be built or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let port = args.port;
    let config = args.auth_config();

    let auth_state =
        Arc::new(AuthState::new(config).context("Failed to initialize admin auth")?);

    if !auth_state.credential().is_configured() {
        warn!("ADMIN_PASSWORD is not set; every admin login will be rejected");
    }

    info!(
        secure_cookies = auth_state.cookies().secure(),
        session_ttl_seconds = auth_state.codec().ttl_seconds(),
        "admin auth ready"
    );

    api::new(port, auth_state).await
}
