use rusqlite::Row;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub type UserId = i64;

pub const USERNAME_MAX_LEN: usize = 64;

/// A stored account. The password hash never leaves the server.
#[derive(Clone)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub password_hash: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("created_at", &self.created_at)
            .field("password_hash", &"[redacted]")
            .finish()
    }
}

impl<'a> TryFrom<&Row<'a>> for User {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'a>) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.get(0)?,
            username: row.get(1)?,
            password_hash: row.get(2)?,
            created_at: row.get(3)?,
        })
    }
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct UserResponse {
    pub id: UserId,
    pub username: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<User> for UserResponse {
    fn from(User { id, username, created_at, .. }: User) -> Self {
        Self { id, username, created_at }
    }
}

pub mod auth;
