//! Map validated CLI arguments to the action the binary runs.

use crate::cli::actions::{server::Args, Action};
use crate::cli::commands::{auth, ARG_PORT};
use anyhow::Result;

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(8080);
    let auth_opts = auth::Options::parse(matches)?;

    Ok(Action::Server(Args {
        port,
        admin_password: auth_opts.admin_password,
        jwt_secret: auth_opts.jwt_secret,
        secure_cookies: auth_opts.secure_cookies,
        session_ttl_seconds: auth_opts.session_ttl_seconds,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn builds_server_action() -> Result<()> {
        temp_env::with_vars(
            [
                ("SITEADMIN_PORT", Some("3000")),
                ("JWT_SECRET", Some("signing-secret")),
                ("ADMIN_PASSWORD", Some("correct")),
                ("SITEADMIN_ENV", Some("development")),
                ("SITEADMIN_SESSION_TTL_SECONDS", None::<&str>),
            ],
            || {
                let matches = crate::cli::commands::new().try_get_matches_from(["siteadmin"])?;
                let Action::Server(args) = handler(&matches)?;
                assert_eq!(args.port, 3000);
                assert_eq!(args.jwt_secret.expose_secret(), "signing-secret");
                assert!(args.admin_password.is_some());
                assert!(!args.secure_cookies);
                assert_eq!(args.session_ttl_seconds, 28_800);
                Ok(())
            },
        )
    }
}
