use std::sync::Arc;

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::{users::UserId, Error, Result};

use super::AccessToken;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// HS256 signing and verification keys plus the token lifetime.
#[derive(Clone)]
pub struct TokenKeys(Arc<Keys>);

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl_secs: i64,
}

impl TokenKeys {
    pub fn new(secret: &[u8], ttl_secs: u64) -> Self {
        Self(Arc::new(Keys {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation: Validation::new(Algorithm::HS256),
            ttl_secs: i64::try_from(ttl_secs).unwrap_or(i64::MAX),
        }))
    }

    pub fn issue(&self, user_id: UserId) -> Result<AccessToken> {
        let iat = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: user_id.to_string(),
            iat,
            exp: iat.saturating_add(self.0.ttl_secs),
        };

        Ok(AccessToken {
            access_token: self.encode(&claims)?,
            token_type: "Bearer".into(),
            expires_in: self.0.ttl_secs,
        })
    }

    pub fn encode(&self, claims: &Claims) -> Result<String> {
        Ok(encode(&Header::new(Algorithm::HS256), claims, &self.0.encoding)?)
    }

    /// Checks signature and expiry, returns the user id from `sub`.
    pub fn verify(&self, token: &str) -> Result<UserId> {
        let data = decode::<Claims>(token, &self.0.decoding, &self.0.validation).map_err(|e| {
            tracing::warn!("rejected token: {e}");
            Error::Unauthorized
        })?;

        data.claims.sub.parse().map_err(|_| {
            tracing::warn!("rejected token: bad subject");
            Error::Unauthorized
        })
    }
}
