use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{users::USERNAME_MAX_LEN, Error, Result};

#[derive(Debug, Deserialize, JsonSchema)]
pub struct RegisterUser {
    pub username: String,
    pub password: String,
}

impl RegisterUser {
    pub fn validate(&self) -> Result<()> {
        if self.username.trim().is_empty() {
            return Err(Error::InvalidInput("Username must not be empty".into()));
        }
        if self.username.trim() != self.username {
            return Err(Error::InvalidInput(
                "Username must not start or end with whitespace".into(),
            ));
        }
        if self.username.chars().any(char::is_control) {
            return Err(Error::InvalidInput("Username must not contain control characters".into()));
        }
        if self.username.chars().count() > USERNAME_MAX_LEN {
            return Err(Error::InvalidInput(format!(
                "Username must be at most {USERNAME_MAX_LEN} characters"
            )));
        }
        if self.password.is_empty() {
            return Err(Error::InvalidInput("Password must not be empty".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct LoginUser {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: String,
    /// Seconds until the token expires.
    pub expires_in: i64,
}
