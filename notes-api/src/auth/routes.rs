use axum::{extract::State, http::StatusCode};

use crate::{
    openapi::{
        aide::axum::{routing::post_with, ApiRouter, IntoApiResponse},
        Json,
    },
    state::AppState,
    users::UserResponse,
};

use super::{handlers, LoginUser, RegisterUser};

pub fn router(state: AppState) -> ApiRouter {
    ApiRouter::new()
        .api_route(
            "/register",
            post_with(register, |t| {
                t.summary("Create an account")
                    .response::<201, Json<UserResponse>>()
            }),
        )
        .api_route(
            "/login",
            post_with(login, |t| t.summary("Exchange credentials for a bearer token")),
        )
        .with_state(state)
}

async fn register(State(state): State<AppState>, Json(args): Json<RegisterUser>) -> impl IntoApiResponse {
    handlers::register(state.conn, args)
        .await
        .map(|user| (StatusCode::CREATED, Json(user)))
}

async fn login(State(state): State<AppState>, Json(args): Json<LoginUser>) -> impl IntoApiResponse {
    handlers::login(state.conn, &state.tokens, args).await.map(Json)
}
