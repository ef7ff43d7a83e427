use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A registered identity as stored in the `users` table.
///
/// The password digest never leaves the server: it is skipped on serialization
/// and outward-facing responses use [`UserProfile`] instead.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

/// The public view of an identity, returned by `/me` and signup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
        }
    }
}
