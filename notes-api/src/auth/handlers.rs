use lazy_static::lazy_static;

use crate::{
    ctx::{Ctx, CtxUser},
    db::{self, DB},
    users::{
        self,
        auth::{find_one_by_id, find_one_by_username, CreateUserParameters},
        UserResponse,
    },
    Error, Result,
};

use super::{
    password::{hash_password, hash_password_blocking, verify_password_blocking},
    AccessToken, LoginUser, RegisterUser, TokenKeys,
};

pub async fn register(db: DB, args: RegisterUser) -> Result<UserResponse> {
    args.validate()?;
    let RegisterUser { username, password } = args;

    let password_hash = hash_password_blocking(password).await?;

    let user = users::auth::create(
        db,
        CreateUserParameters {
            username: username.clone(),
            password_hash,
        },
    )
    .await
    .map_err(|e| match e {
        db::Error::Conflict(_) => Error::DuplicateUsername(username),
        e => e.into(),
    })?;

    tracing::info!("registered user {} ({})", user.username, user.id);

    Ok(user.into())
}

lazy_static! {
    /// Verified against when the username is unknown, so both login failures cost one argon2 run.
    static ref DUMMY_HASH: Option<String> = hash_password("not-a-real-password").ok();
}

pub async fn login(db: DB, tokens: &TokenKeys, LoginUser { username, password }: LoginUser) -> Result<AccessToken> {
    let user = match find_one_by_username(db, username).await {
        Ok(user) => user,
        Err(db::Error::NotFound(_)) => {
            if let Some(hash) = DUMMY_HASH.clone() {
                verify_password_blocking(password, hash).await?;
            }
            return Err(Error::InvalidCredentials);
        }
        Err(e) => return Err(e.into()),
    };

    if !verify_password_blocking(password, user.password_hash.clone()).await? {
        tracing::info!("failed login for {}", user.username);
        return Err(Error::InvalidCredentials);
    }

    tracing::info!("{} logged in", user.username);

    tokens.issue(user.id)
}

/// Resolves a bearer token into the calling user.
pub async fn authenticate(db: DB, tokens: &TokenKeys, token: &str) -> Result<Ctx> {
    let user_id = tokens.verify(token)?;

    let user = find_one_by_id(db, user_id).await.map_err(|e| match e {
        db::Error::NotFound(_) => {
            tracing::warn!("token for unknown user {user_id}");
            Error::Unauthorized
        }
        e => e.into(),
    })?;

    Ok(Ctx::new(CtxUser {
        id: user.id,
        username: user.username,
    }))
}
