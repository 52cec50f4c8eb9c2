//! `stockroom-auth` - authentication boundary.
//!
//! Accounts, password hashing and bearer tokens. This crate is intentionally
//! decoupled from HTTP and storage: the store keeps `UserAccount`s, the API
//! extracts bearer tokens, and both talk to an [`AuthProvider`].

pub mod account;
pub mod claims;
pub mod error;
pub mod password;
pub mod provider;

pub use account::{MIN_PASSWORD_LEN, UserAccount, validate_login, validate_registration};
pub use claims::{TokenClaims, TokenValidationError, validate_claims};
pub use error::AuthError;
pub use password::{DEFAULT_COST, hash_password, verify_password};
pub use provider::{AuthProvider, AuthenticatedUser, IssuedToken, JwtAuthProvider};
