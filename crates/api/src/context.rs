use uuid::Uuid;

use stockroom_auth::AuthenticatedUser;
use stockroom_core::UserId;

/// Authenticated user for a request.
///
/// Inserted by the auth middleware; every protected handler can rely on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserContext {
    user_id: UserId,
    username: String,
    session_id: Uuid,
}

impl UserContext {
    pub fn new(user_id: UserId, username: String, session_id: Uuid) -> Self {
        Self {
            user_id,
            username,
            session_id,
        }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Session the presented token belongs to (revoked on logout).
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }
}

impl From<AuthenticatedUser> for UserContext {
    fn from(user: AuthenticatedUser) -> Self {
        Self::new(user.user_id, user.username, user.session_id)
    }
}
