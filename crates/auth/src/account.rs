//! User accounts and credential input rules.

use chrono::{DateTime, Utc};

use stockroom_core::{DomainError, DomainResult, Entity, UserId};

/// Minimum accepted password length at registration.
pub const MIN_PASSWORD_LEN: usize = 6;

/// A registered user. The password is only ever held as a bcrypt hash.
#[derive(Clone, PartialEq, Eq)]
pub struct UserAccount {
    id: UserId,
    username: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl UserAccount {
    pub fn new(
        id: UserId,
        username: impl Into<String>,
        password_hash: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            username: username.into(),
            password_hash: password_hash.into(),
            created_at,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

// Hand-written so the hash never reaches logs.
impl core::fmt::Debug for UserAccount {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("UserAccount")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

impl Entity for UserAccount {
    type Id = UserId;
    const KIND: &'static str = "user";

    fn id(&self) -> UserId {
        self.id
    }
}

/// Both fields must be present and non-blank.
pub fn validate_login(username: &str, password: &str) -> DomainResult<()> {
    if username.trim().is_empty() || password.is_empty() {
        return Err(DomainError::invalid_argument("username and password required"));
    }
    Ok(())
}

pub fn validate_registration(username: &str, password: &str) -> DomainResult<()> {
    validate_login(username, password)?;
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(DomainError::invalid_argument(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_requires_both_fields() {
        assert!(validate_registration("", "secret1").is_err());
        assert!(validate_registration("bob", "").is_err());
    }

    #[test]
    fn short_passwords_are_rejected() {
        let err = validate_registration("bob", "12345").unwrap_err();
        assert_eq!(
            err,
            DomainError::invalid_argument("password must be at least 6 characters")
        );
        validate_registration("bob", "123456").unwrap();
    }

    #[test]
    fn debug_output_hides_the_hash() {
        let account = UserAccount::new(UserId::new(1), "admin", "$2b$10$secret", Utc::now());
        let rendered = format!("{account:?}");
        assert!(rendered.contains("admin"));
        assert!(!rendered.contains("$2b$10$secret"));
    }
}
