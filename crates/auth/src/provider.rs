//! Token issuance and validation.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use stockroom_core::{Entity, UserId};

use crate::account::UserAccount;
use crate::claims::{TokenClaims, TokenValidationError, validate_claims};
use crate::error::AuthError;

/// Identity resolved from a valid bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub username: String,
    pub session_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub session_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

/// Authentication capability consumed by the API layer.
pub trait AuthProvider: Send + Sync {
    /// Start a session for `user` and return its bearer token.
    fn issue_token(&self, user: &UserAccount, now: DateTime<Utc>) -> Result<IssuedToken, AuthError>;

    /// Resolve a bearer token to the user it was issued to.
    fn authenticate(&self, token: &str, now: DateTime<Utc>) -> Result<AuthenticatedUser, AuthError>;

    /// End a session. Returns `false` if it was not active.
    fn revoke(&self, session_id: Uuid) -> bool;
}

impl<P> AuthProvider for Arc<P>
where
    P: AuthProvider + ?Sized,
{
    fn issue_token(&self, user: &UserAccount, now: DateTime<Utc>) -> Result<IssuedToken, AuthError> {
        (**self).issue_token(user, now)
    }

    fn authenticate(&self, token: &str, now: DateTime<Utc>) -> Result<AuthenticatedUser, AuthError> {
        (**self).authenticate(token, now)
    }

    fn revoke(&self, session_id: Uuid) -> bool {
        (**self).revoke(session_id)
    }
}

/// HS256 JWT provider with an in-memory session registry.
///
/// A token is accepted only while its `jti` is registered, so logout takes
/// effect immediately. Each session is kept until its expiry; expired ones are
/// dropped on the next login or when their token is presented. Sessions do not
/// survive a restart.
pub struct JwtAuthProvider {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
    sessions: RwLock<HashMap<Uuid, DateTime<Utc>>>,
}

impl JwtAuthProvider {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against the caller's clock in `validate_claims`.
        validation.validate_exp = false;

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn active_sessions(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn forget(&self, session_id: Uuid) -> bool {
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&session_id)
            .is_some()
    }

    fn decode(&self, token: &str) -> Result<TokenClaims, AuthError> {
        jsonwebtoken::decode::<TokenClaims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::InvalidToken(e.to_string()),
            })
    }
}

impl core::fmt::Debug for JwtAuthProvider {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("JwtAuthProvider")
            .field("ttl", &self.ttl)
            .field("active_sessions", &self.active_sessions())
            .finish_non_exhaustive()
    }
}

impl AuthProvider for JwtAuthProvider {
    fn issue_token(&self, user: &UserAccount, now: DateTime<Utc>) -> Result<IssuedToken, AuthError> {
        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AuthError::Encoding("token expiry out of range".to_string()))?;
        let claims = TokenClaims {
            sub: user.id(),
            username: user.username().to_string(),
            jti: Uuid::now_v7(),
            issued_at: now,
            expires_at,
        };

        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::Encoding(e.to_string()))?;

        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        sessions.retain(|_, expires_at| *expires_at > now);
        sessions.insert(claims.jti, claims.expires_at);
        drop(sessions);

        Ok(IssuedToken {
            token,
            session_id: claims.jti,
            expires_at: claims.expires_at,
        })
    }

    fn authenticate(&self, token: &str, now: DateTime<Utc>) -> Result<AuthenticatedUser, AuthError> {
        if token.trim().is_empty() {
            return Err(AuthError::MissingToken);
        }

        let claims = self.decode(token)?;
        if let Err(e) = validate_claims(&claims, now) {
            if e == TokenValidationError::Expired {
                self.forget(claims.jti);
            }
            return Err(e.into());
        }

        let active = self
            .sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&claims.jti);
        if !active {
            return Err(AuthError::Revoked);
        }

        Ok(AuthenticatedUser {
            user_id: claims.sub,
            username: claims.username,
            session_id: claims.jti,
        })
    }

    fn revoke(&self, session_id: Uuid) -> bool {
        let removed = self.forget(session_id);
        if removed {
            tracing::info!("session {} revoked", session_id);
        }
        removed
    }
}
