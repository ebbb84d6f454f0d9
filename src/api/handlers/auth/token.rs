//! HS256 admin token codec.
//!
//! Tokens are compact JWTs: `base64url(header).base64url(claims).base64url(mac)`.
//! The MAC is checked before anything is decoded, so an altered byte anywhere
//! in the token reports `BadSignature` instead of a parse error.

use anyhow::{anyhow, Context, Result};
use base64ct::{Base64UrlUnpadded, Encoding};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::time::SystemTime;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

pub const ADMIN_SUBJECT: &str = "admin";
pub const ADMIN_ROLE: &str = "admin";
pub const DEFAULT_TOKEN_TTL_SECONDS: i64 = 8 * 60 * 60;

const ALGORITHM: &str = "HS256";
const TOKEN_TYPE: &str = "JWT";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
struct TokenHeader {
    alg: String,
    typ: String,
}

impl TokenHeader {
    fn hs256() -> Self {
        Self {
            alg: ALGORITHM.to_string(),
            typ: TOKEN_TYPE.to_string(),
        }
    }
}

/// Who a token is issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSubject {
    pub subject: String,
    pub role: String,
}

impl TokenSubject {
    #[must_use]
    pub fn admin() -> Self {
        Self {
            subject: ADMIN_SUBJECT.to_string(),
            role: ADMIN_ROLE.to_string(),
        }
    }
}

/// Verified token contents.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    #[serde(rename = "sub")]
    pub subject: String,
    pub role: String,
    #[serde(rename = "iat")]
    pub issued_at: i64,
    #[serde(rename = "exp")]
    pub expires_at: i64,
}

/// Why a presented token was rejected.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum VerifyError {
    #[error("malformed token")]
    Malformed,
    #[error("invalid token signature")]
    BadSignature,
    #[error("token expired")]
    Expired,
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: i64,
}

pub struct TokenCodec {
    secret: SecretString,
    ttl_seconds: i64,
}

impl TokenCodec {
    /// Build a codec around the configured signing secret.
    ///
    /// # Errors
    /// Returns an error if the secret is empty or the lifetime is not positive.
    pub fn new(secret: SecretString, ttl_seconds: i64) -> Result<Self> {
        if secret.expose_secret().is_empty() {
            return Err(anyhow!("token signing secret is not configured"));
        }
        if ttl_seconds <= 0 {
            return Err(anyhow!("token ttl must be positive"));
        }
        Ok(Self {
            secret,
            ttl_seconds,
        })
    }

    #[must_use]
    pub fn ttl_seconds(&self) -> i64 {
        self.ttl_seconds
    }

    /// Issue a token for `subject` valid from now for the configured lifetime.
    ///
    /// # Errors
    /// Returns an error if encoding or signing fails.
    pub fn issue(&self, subject: &TokenSubject) -> Result<IssuedToken> {
        self.issue_at(subject, now_unix_seconds())
    }

    /// Issue a token as if the current time were `now_unix_seconds`.
    ///
    /// # Errors
    /// Returns an error if the expiry overflows, or encoding or signing fails.
    pub fn issue_at(&self, subject: &TokenSubject, now_unix_seconds: i64) -> Result<IssuedToken> {
        let expires_at = now_unix_seconds
            .checked_add(self.ttl_seconds)
            .context("token expiry overflows")?;
        let claims = Claims {
            subject: subject.subject.clone(),
            role: subject.role.clone(),
            issued_at: now_unix_seconds,
            expires_at,
        };

        let header_b64 = b64e_json(&TokenHeader::hs256()).context("encode token header")?;
        let claims_b64 = b64e_json(&claims).context("encode token claims")?;
        let signing_input = format!("{header_b64}.{claims_b64}");
        let signature = self.sign(signing_input.as_bytes())?;
        let signature_b64 = Base64UrlUnpadded::encode_string(&signature);

        Ok(IssuedToken {
            token: format!("{signing_input}.{signature_b64}"),
            expires_at,
        })
    }

    /// Verify a token against the current time.
    ///
    /// # Errors
    /// Returns the rejection reason; never panics on untrusted input.
    pub fn verify(&self, token: &str) -> Result<Claims, VerifyError> {
        self.verify_at(token, now_unix_seconds())
    }

    /// Verify a token as if the current time were `now_unix_seconds`.
    ///
    /// # Errors
    /// - `Malformed` if the token has no `.` separator, an empty header or
    ///   claims segment, or invalid JSON,
    /// - `BadSignature` if the MAC does not match or the segment count is not three,
    /// - `Expired` if `exp <= now`.
    pub fn verify_at(&self, token: &str, now_unix_seconds: i64) -> Result<Claims, VerifyError> {
        let segments: Vec<&str> = token.split('.').collect();
        let (header_b64, claims_b64, sig_b64) = match segments.as_slice() {
            [header, claims, sig] => (*header, *claims, *sig),
            // A dotted token of the wrong shape is a signed token with a byte altered.
            [_, _, ..] => return Err(VerifyError::BadSignature),
            _ => return Err(VerifyError::Malformed),
        };
        if header_b64.is_empty() || claims_b64.is_empty() {
            return Err(VerifyError::Malformed);
        }

        let signature =
            Base64UrlUnpadded::decode_vec(sig_b64).map_err(|_| VerifyError::BadSignature)?;
        let mut mac = self.mac().map_err(|_| VerifyError::BadSignature)?;
        mac.update(header_b64.as_bytes());
        mac.update(b".");
        mac.update(claims_b64.as_bytes());
        // `verify_slice` compares in constant time.
        mac.verify_slice(&signature)
            .map_err(|_| VerifyError::BadSignature)?;

        let header: TokenHeader = b64d_json(header_b64)?;
        if header.alg != ALGORITHM {
            return Err(VerifyError::Malformed);
        }

        let claims: Claims = b64d_json(claims_b64)?;
        if claims.expires_at <= now_unix_seconds {
            return Err(VerifyError::Expired);
        }

        Ok(claims)
    }

    fn mac(&self) -> Result<HmacSha256> {
        HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .map_err(|_| anyhow!("invalid token signing key"))
    }

    fn sign(&self, input: &[u8]) -> Result<Vec<u8>> {
        let mut mac = self.mac()?;
        mac.update(input);
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("secret", &"***")
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}

fn b64e_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let json = serde_json::to_vec(value)?;
    Ok(Base64UrlUnpadded::encode_string(&json))
}

fn b64d_json<T: for<'de> Deserialize<'de>>(segment: &str) -> Result<T, VerifyError> {
    let bytes = Base64UrlUnpadded::decode_vec(segment).map_err(|_| VerifyError::Malformed)?;
    serde_json::from_slice(&bytes).map_err(|_| VerifyError::Malformed)
}

/// Unix seconds for token timestamps.
pub(crate) fn now_unix_seconds() -> i64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_760_000_000;

    fn codec() -> Result<TokenCodec> {
        TokenCodec::new(
            SecretString::from("test-signing-secret"),
            DEFAULT_TOKEN_TTL_SECONDS,
        )
    }

    // Swap one character of the given segment for a different base64url char.
    fn tamper_segment(token: &str, segment: usize) -> String {
        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        let target = &parts[segment];
        let index = target.len() / 2;
        let original = target.as_bytes()[index];
        let replacement = if original == b'A' { 'B' } else { 'A' };
        let mut chars: Vec<char> = target.chars().collect();
        chars[index] = replacement;
        parts[segment] = chars.into_iter().collect();
        parts.join(".")
    }

    #[test]
    fn issue_then_verify_returns_claims() -> Result<()> {
        let codec = codec()?;
        let issued = codec.issue_at(&TokenSubject::admin(), NOW)?;
        assert_eq!(issued.expires_at, NOW + DEFAULT_TOKEN_TTL_SECONDS);

        let claims = codec.verify_at(&issued.token, NOW + 60)?;
        assert_eq!(claims.subject, ADMIN_SUBJECT);
        assert_eq!(claims.role, ADMIN_ROLE);
        assert_eq!(claims.issued_at, NOW);
        assert_eq!(claims.expires_at, NOW + DEFAULT_TOKEN_TTL_SECONDS);
        Ok(())
    }

    #[test]
    fn issue_uses_the_system_clock() -> Result<()> {
        let codec = codec()?;
        let issued = codec.issue(&TokenSubject::admin())?;
        let claims = codec.verify(&issued.token)?;
        assert_eq!(claims.expires_at - claims.issued_at, DEFAULT_TOKEN_TTL_SECONDS);
        Ok(())
    }

    #[test]
    fn token_has_three_segments_and_hs256_header() -> Result<()> {
        let codec = codec()?;
        let issued = codec.issue_at(&TokenSubject::admin(), NOW)?;
        let segments: Vec<&str> = issued.token.split('.').collect();
        assert_eq!(segments.len(), 3);

        let header: TokenHeader = b64d_json(segments[0])?;
        assert_eq!(header, TokenHeader::hs256());
        Ok(())
    }

    #[test]
    fn verify_rejects_expired_token() -> Result<()> {
        let codec = codec()?;
        let issued = codec.issue_at(&TokenSubject::admin(), NOW)?;

        assert_eq!(
            codec.verify_at(&issued.token, issued.expires_at),
            Err(VerifyError::Expired)
        );
        assert_eq!(
            codec.verify_at(&issued.token, issued.expires_at + 3600),
            Err(VerifyError::Expired)
        );
        assert!(codec.verify_at(&issued.token, issued.expires_at - 1).is_ok());
        Ok(())
    }

    #[test]
    fn verify_rejects_tampered_segments() -> Result<()> {
        let codec = codec()?;
        let issued = codec.issue_at(&TokenSubject::admin(), NOW)?;

        for segment in 0..3 {
            let tampered = tamper_segment(&issued.token, segment);
            assert_ne!(tampered, issued.token);
            assert_eq!(
                codec.verify_at(&tampered, NOW),
                Err(VerifyError::BadSignature),
                "segment {segment}"
            );
        }
        Ok(())
    }

    #[test]
    fn verify_reports_bad_signature_for_any_altered_byte() -> Result<()> {
        let codec = codec()?;
        let issued = codec.issue_at(&TokenSubject::admin(), NOW)?;
        let bytes = issued.token.as_bytes();

        for index in 0..bytes.len() {
            let replacement = if bytes[index] == b'.' { b'A' } else { b'.' };
            let mut altered = bytes.to_vec();
            altered[index] = replacement;
            let altered = String::from_utf8(altered)?;
            assert_eq!(
                codec.verify_at(&altered, NOW),
                Err(VerifyError::BadSignature),
                "byte {index}"
            );
        }
        Ok(())
    }

    #[test]
    fn verify_reports_bad_signature_for_wrong_segment_count() -> Result<()> {
        let codec = codec()?;
        for token in ["a.b", "a.b.c.d"] {
            assert_eq!(
                codec.verify_at(token, NOW),
                Err(VerifyError::BadSignature),
                "{token:?}"
            );
        }
        Ok(())
    }

    #[test]
    fn verify_rejects_forged_role() -> Result<()> {
        let codec = codec()?;
        let issued = codec.issue_at(&TokenSubject::admin(), NOW)?;
        let parts: Vec<&str> = issued.token.split('.').collect();

        let forged_claims = Claims {
            subject: "admin".to_string(),
            role: "owner".to_string(),
            issued_at: NOW,
            expires_at: NOW + 10 * DEFAULT_TOKEN_TTL_SECONDS,
        };
        let forged = format!("{}.{}.{}", parts[0], b64e_json(&forged_claims)?, parts[2]);
        assert_eq!(
            codec.verify_at(&forged, NOW),
            Err(VerifyError::BadSignature)
        );
        Ok(())
    }

    #[test]
    fn verify_rejects_token_signed_with_other_secret() -> Result<()> {
        let other = TokenCodec::new(SecretString::from("other-secret"), 60)?;
        let issued = other.issue_at(&TokenSubject::admin(), NOW)?;
        assert_eq!(
            codec()?.verify_at(&issued.token, NOW),
            Err(VerifyError::BadSignature)
        );
        Ok(())
    }

    #[test]
    fn verify_rejects_malformed_input() -> Result<()> {
        let codec = codec()?;
        for token in ["", "abc", ".payload.sig", "header..sig"] {
            assert_eq!(
                codec.verify_at(token, NOW),
                Err(VerifyError::Malformed),
                "{token:?}"
            );
        }
        Ok(())
    }

    #[test]
    fn verify_reports_malformed_json_behind_valid_signature() -> Result<()> {
        let codec = codec()?;
        let header_b64 = b64e_json(&TokenHeader::hs256())?;
        let claims_b64 = Base64UrlUnpadded::encode_string(b"not json");
        let input = format!("{header_b64}.{claims_b64}");
        let signature = Base64UrlUnpadded::encode_string(&codec.sign(input.as_bytes())?);

        assert_eq!(
            codec.verify_at(&format!("{input}.{signature}"), NOW),
            Err(VerifyError::Malformed)
        );
        Ok(())
    }

    #[test]
    fn verify_rejects_other_algorithms() -> Result<()> {
        let codec = codec()?;
        let header = TokenHeader {
            alg: "none".to_string(),
            typ: TOKEN_TYPE.to_string(),
        };
        let claims = Claims {
            subject: ADMIN_SUBJECT.to_string(),
            role: ADMIN_ROLE.to_string(),
            issued_at: NOW,
            expires_at: NOW + 60,
        };
        let input = format!("{}.{}", b64e_json(&header)?, b64e_json(&claims)?);
        let signature = Base64UrlUnpadded::encode_string(&codec.sign(input.as_bytes())?);

        assert_eq!(
            codec.verify_at(&format!("{input}.{signature}"), NOW),
            Err(VerifyError::Malformed)
        );
        Ok(())
    }

    #[test]
    fn new_rejects_empty_secret_and_bad_ttl() {
        assert!(TokenCodec::new(SecretString::from(""), 60).is_err());
        assert!(TokenCodec::new(SecretString::from("secret"), 0).is_err());
        assert!(TokenCodec::new(SecretString::from("secret"), -5).is_err());
    }

    #[test]
    fn debug_redacts_secret() -> Result<()> {
        let debug = format!("{:?}", codec()?);
        assert!(!debug.contains("test-signing-secret"));
        assert!(debug.contains("***"));
        Ok(())
    }
}
