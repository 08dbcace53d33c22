use axum::{
    extract::{Extension, FromRequestParts},
    http::request::Parts,
};
use serde::Serialize;

use crate::{users::UserId, Error, DB};

#[derive(Clone, Debug, FromRequestParts)]
pub struct BaseParams {
    pub ctx: Ctx,
    #[from_request(via(Extension))]
    pub db: DB,
}

impl BaseParams {
    pub fn new(db: DB, ctx: Ctx) -> Self {
        Self { db, ctx }
    }
}

#[derive(Debug, Serialize, Clone)]
pub struct CtxUser {
    pub id: UserId,
    pub username: String,
}

/// The authenticated caller, put into the request by `auth::middleware::protected`.
#[derive(Clone, Debug)]
pub struct Ctx {
    pub user: CtxUser,
}

impl Ctx {
    pub fn new(user: CtxUser) -> Self {
        Self { user }
    }

    pub fn user_id(&self) -> UserId {
        self.user.id
    }
}

impl<S> FromRequestParts<S> for Ctx
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Ctx>().cloned().ok_or(Error::Unauthorized)
    }
}
