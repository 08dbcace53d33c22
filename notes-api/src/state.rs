use std::sync::Arc;

use axum::extract::FromRef;

use crate::{auth::TokenKeys, config::Config, db::DB};

#[derive(FromRef, Clone)]
pub struct AppState {
    pub conn: DB,
    pub tokens: TokenKeys,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(conn: DB, config: Arc<Config>) -> Self {
        let tokens = TokenKeys::new(config.jwt_secret.as_bytes(), config.token_ttl_secs);
        Self { conn, tokens, config }
    }
}
