//! Admin password check.

use secrecy::{ExposeSecret, SecretString};
use subtle::ConstantTimeEq;

/// The configured admin password, if any.
///
/// With no password configured every submission is rejected.
#[derive(Clone, Default)]
pub struct AdminCredential(Option<SecretString>);

impl AdminCredential {
    #[must_use]
    pub fn new(password: Option<SecretString>) -> Self {
        Self(password.filter(|secret| !secret.expose_secret().is_empty()))
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.0.is_some()
    }

    /// Compare a submitted password against the configured one.
    ///
    /// Input is trimmed; empty input never matches.
    #[must_use]
    pub fn validate(&self, submitted: &str) -> bool {
        let submitted = submitted.trim();
        if submitted.is_empty() {
            return false;
        }
        match &self.0 {
            // Unequal lengths compare false without an early exit.
            Some(expected) => expected
                .expose_secret()
                .as_bytes()
                .ct_eq(submitted.as_bytes())
                .into(),
            None => false,
        }
    }
}

impl std::fmt::Debug for AdminCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            Some(_) => write!(f, "AdminCredential(***)"),
            None => write!(f, "AdminCredential(None)"),
        }
    }
}
