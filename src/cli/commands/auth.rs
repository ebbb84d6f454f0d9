use anyhow::{Context, Result};
use clap::{builder::PossibleValuesParser, Arg, ArgMatches, Command};
use secrecy::SecretString;

pub const ARG_ADMIN_PASSWORD: &str = "admin-password";
pub const ARG_JWT_SECRET: &str = "jwt-secret";
pub const ARG_ENVIRONMENT: &str = "environment";
pub const ARG_SESSION_TTL_SECONDS: &str = "session-ttl-seconds";

pub const ENV_PRODUCTION: &str = "production";
pub const ENV_DEVELOPMENT: &str = "development";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_ADMIN_PASSWORD)
                .long(ARG_ADMIN_PASSWORD)
                .help("Admin password; when unset every login is rejected")
                .env("ADMIN_PASSWORD")
                .hide_env_values(true),
        )
        .arg(
            Arg::new(ARG_JWT_SECRET)
                .long(ARG_JWT_SECRET)
                .help("Secret used to sign admin session tokens")
                .env("JWT_SECRET")
                .hide_env_values(true)
                .required(true),
        )
        .arg(
            Arg::new(ARG_ENVIRONMENT)
                .long(ARG_ENVIRONMENT)
                .help("Deployment environment; production marks the session cookie Secure")
                .env("SITEADMIN_ENV")
                .default_value(ENV_PRODUCTION)
                .value_parser(PossibleValuesParser::new([ENV_PRODUCTION, ENV_DEVELOPMENT])),
        )
        .arg(
            Arg::new(ARG_SESSION_TTL_SECONDS)
                .long(ARG_SESSION_TTL_SECONDS)
                .help("Admin session lifetime in seconds (token expiry and cookie Max-Age)")
                .env("SITEADMIN_SESSION_TTL_SECONDS")
                .default_value("28800")
                .value_parser(clap::value_parser!(i64).range(1..)),
        )
}

#[derive(Debug)]
pub struct Options {
    pub admin_password: Option<SecretString>,
    pub jwt_secret: SecretString,
    pub secure_cookies: bool,
    pub session_ttl_seconds: i64,
}

impl Options {
    /// Read the auth options out of parsed matches.
    ///
    /// # Errors
    /// Returns an error if the signing secret is missing.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let jwt_secret = matches
            .get_one::<String>(ARG_JWT_SECRET)
            .cloned()
            .context("missing required argument: --jwt-secret")?;

        let admin_password = matches
            .get_one::<String>(ARG_ADMIN_PASSWORD)
            .cloned()
            .map(SecretString::from);

        let environment = matches
            .get_one::<String>(ARG_ENVIRONMENT)
            .map_or(ENV_PRODUCTION, String::as_str);

        let session_ttl_seconds = matches
            .get_one::<i64>(ARG_SESSION_TTL_SECONDS)
            .copied()
            .unwrap_or(28_800);

        Ok(Self {
            admin_password,
            jwt_secret: SecretString::from(jwt_secret),
            secure_cookies: environment == ENV_PRODUCTION,
            session_ttl_seconds,
        })
    }
}
