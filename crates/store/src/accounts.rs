//! Account registration and credential checks.
//!
//! bcrypt runs outside the store lock. Registration re-checks the username
//! inside the write transaction, so two concurrent sign-ups for the same
//! name cannot both succeed.

use chrono::Utc;
use thiserror::Error;

use stockroom_auth::{
    AuthError, UserAccount, hash_password, validate_login, validate_registration, verify_password,
};
use stockroom_core::{DomainError, Entity, UserId};

use crate::store::EntityStore;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccountError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

pub type AccountResult<T> = Result<T, AccountError>;

#[derive(Debug, Clone)]
pub struct AccountService<S> {
    store: S,
    bcrypt_cost: u32,
}

impl<S> AccountService<S>
where
    S: EntityStore,
{
    pub fn new(store: S, bcrypt_cost: u32) -> Self {
        Self { store, bcrypt_cost }
    }

    pub fn register(&self, username: &str, password: &str) -> AccountResult<UserAccount> {
        validate_registration(username, password)?;
        if self.store.read(|t| t.user_by_name(username).is_some()) {
            return Err(username_taken().into());
        }

        let hash = hash_password(password, self.bcrypt_cost)?;

        let account = self.store.transact(|tables| {
            if tables.user_by_name(username).is_some() {
                return Err(username_taken());
            }
            let id: UserId = tables.sequences.users.allocate();
            let account = UserAccount::new(id, username, hash, Utc::now());
            tables.users.insert(account.clone());
            Ok(account)
        })?;

        tracing::info!(user_id = account.id().get(), username, "user registered");
        Ok(account)
    }

    /// Check a username/password pair.
    ///
    /// Unknown users and wrong passwords fail identically.
    pub fn login(&self, username: &str, password: &str) -> AccountResult<UserAccount> {
        validate_login(username, password)?;

        let account = self
            .store
            .read(|t| t.user_by_name(username).cloned())
            .ok_or_else(invalid_credentials)?;

        if !verify_password(password, account.password_hash())? {
            tracing::debug!(username, "login rejected");
            return Err(invalid_credentials().into());
        }

        Ok(account)
    }

    pub fn me(&self, user_id: UserId) -> AccountResult<UserAccount> {
        self.store
            .read(|t| t.users.get(user_id).cloned())
            .ok_or_else(|| DomainError::not_found("user").into())
    }
}

fn username_taken() -> DomainError {
    DomainError::conflict("username already exists")
}

fn invalid_credentials() -> DomainError {
    DomainError::unauthorized(AuthError::InvalidCredentials.to_string())
}
