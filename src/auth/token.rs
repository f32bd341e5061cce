//! Bearer tokens issued by the backend.
//!
//! The backend issues JWTs, but the SDK never verifies them: it only reads
//! the `exp` claim so that a token which has obviously expired is dropped
//! locally instead of being sent to the verify endpoint. Tokens that are not
//! JWTs are treated as non-expiring.
//!
//! # Security
//!
//! [`BearerToken`] implements a custom [`Debug`] that masks the value,
//! preventing accidental exposure in logs.
//!
//! ```rust
//! use storefront_sdk::BearerToken;
//!
//! let token = BearerToken::new("secret-token").unwrap();
//! assert_eq!(format!("{token:?}"), "BearerToken(*****)");
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::Deserialize;

#[derive(Deserialize)]
struct ExpiryClaims {
    #[serde(default)]
    exp: Option<i64>,
}

/// A bearer token for one of the two realms.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    /// Wraps a token. Returns `None` for a blank string.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into().trim().to_string();
        if token.is_empty() {
            None
        } else {
            Some(Self(token))
        }
    }

    /// Returns the raw token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the `exp` claim if the token is a JWT that carries one.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let mut validation = Validation::default();
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        let data = decode::<ExpiryClaims>(&self.0, &DecodingKey::from_secret(&[]), &validation).ok()?;
        data.claims
            .exp
            .and_then(|exp| DateTime::from_timestamp(exp, 0))
    }

    /// Returns `true` if the token carries an expiry at or before `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_some_and(|exp| exp <= now)
    }

    /// Returns `true` if the token has expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

impl AsRef<str> for BearerToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(*****)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde::Serialize;

    #[derive(Serialize)]
    struct TestClaims {
        sub: String,
        exp: i64,
    }

    fn jwt(exp: i64) -> String {
        let claims = TestClaims {
            sub: "user-1".to_string(),
            exp,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"server-secret"),
        )
        .unwrap()
    }

    #[test]
    fn test_blank_token_is_rejected() {
        assert!(BearerToken::new("").is_none());
        assert!(BearerToken::new("   ").is_none());
    }

    #[test]
    fn test_reads_expiry_without_knowing_the_secret() {
        let exp = Utc::now().timestamp() + 3600;
        let token = BearerToken::new(jwt(exp)).unwrap();

        assert_eq!(token.expires_at().unwrap().timestamp(), exp);
        assert!(!token.is_expired());
    }

    #[test]
    fn test_past_expiry_is_expired() {
        let token = BearerToken::new(jwt(Utc::now().timestamp() - 60)).unwrap();
        assert!(token.is_expired());
    }

    #[test]
    fn test_opaque_token_never_expires() {
        let token = BearerToken::new("opaque-session-token").unwrap();
        assert!(token.expires_at().is_none());
        assert!(!token.is_expired());
    }

    #[test]
    fn test_debug_masks_value() {
        let token = BearerToken::new("super-secret").unwrap();
        let debug = format!("{token:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("*****"));
    }
}
