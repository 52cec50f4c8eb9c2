use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use stockroom_core::UserId;

/// Bearer token claims.
///
/// Times are encoded as Unix seconds (`iat`/`exp`), the JWT convention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: the authenticated user.
    pub sub: UserId,

    pub username: String,

    /// Session identifier; logout revokes it.
    pub jti: Uuid,

    #[serde(rename = "iat", with = "chrono::serde::ts_seconds")]
    pub issued_at: DateTime<Utc>,

    #[serde(rename = "exp", with = "chrono::serde::ts_seconds")]
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid token time window (expires_at <= issued_at)")]
    InvalidTimeWindow,
}

/// Deterministically validate claim timestamps against `now`.
///
/// Signature verification happens before this, in the provider.
pub fn validate_claims(claims: &TokenClaims, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
    if claims.expires_at <= claims.issued_at {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    if now < claims.issued_at {
        return Err(TokenValidationError::NotYetValid);
    }
    if now >= claims.expires_at {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn claims(issued_at: DateTime<Utc>, ttl: Duration) -> TokenClaims {
        TokenClaims {
            sub: UserId::new(1),
            username: "admin".to_string(),
            jti: Uuid::now_v7(),
            issued_at,
            expires_at: issued_at + ttl,
        }
    }

    #[test]
    fn valid_window_passes() {
        let now = Utc::now();
        validate_claims(&claims(now, Duration::hours(1)), now).unwrap();
    }

    #[test]
    fn expiry_is_exclusive() {
        let now = Utc::now();
        let c = claims(now, Duration::hours(1));
        assert_eq!(
            validate_claims(&c, c.expires_at),
            Err(TokenValidationError::Expired)
        );
    }

    #[test]
    fn future_and_inverted_windows_fail() {
        let now = Utc::now();
        assert_eq!(
            validate_claims(&claims(now + Duration::minutes(5), Duration::hours(1)), now),
            Err(TokenValidationError::NotYetValid)
        );
        assert_eq!(
            validate_claims(&claims(now, Duration::zero()), now),
            Err(TokenValidationError::InvalidTimeWindow)
        );
    }

    #[test]
    fn times_serialize_as_unix_seconds() {
        let c = claims(DateTime::from_timestamp(1_700_000_000, 0).unwrap(), Duration::seconds(60));
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["iat"], 1_700_000_000);
        assert_eq!(json["exp"], 1_700_000_060);
        assert_eq!(json["sub"], 1);
    }
}
