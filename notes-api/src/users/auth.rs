use rusqlite::named_params;

use crate::db::{self, DB};

use super::*;

#[derive(Debug, Clone)]
pub struct CreateUserParameters {
    pub username: String,
    pub password_hash: String,
}

pub async fn create(db: DB, args: CreateUserParameters) -> db::Result<User> {
    let user = db
        .call(move |conn| {
            conn.query_row(
                r#"INSERT INTO users (username, password_hash) VALUES (:username, :password_hash)
                    RETURNING id, username, password_hash, created_at"#,
                named_params! {
                    ":username": args.username,
                    ":password_hash": args.password_hash,
                },
                |r| User::try_from(r),
            )
            .map_err(|e| e.into())
        })
        .await?;

    Ok(user)
}

pub async fn find_one_by_id(db: DB, user_id: UserId) -> db::Result<User> {
    db.call(move |conn| {
        conn.query_row(
            "SELECT id, username, password_hash, created_at FROM users WHERE id = ?",
            [user_id],
            |r| User::try_from(r),
        )
        .map_err(|e| e.into())
    })
    .await
    .map_err(db::Error::from)
    .map_err(|e| e.not_found_message(format!("User '{user_id}' not found")))
}

pub async fn find_one_by_username(db: DB, username: String) -> db::Result<User> {
    let message = format!("User '{username}' not found");
    db.call(move |conn| {
        conn.query_row(
            "SELECT id, username, password_hash, created_at FROM users WHERE username = ?",
            [username],
            |r| User::try_from(r),
        )
        .map_err(|e| e.into())
    })
    .await
    .map_err(db::Error::from)
    .map_err(|e| e.not_found_message(message))
}
