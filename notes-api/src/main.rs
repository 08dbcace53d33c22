mod app;
mod auth;
mod config;
mod ctx;
mod db;
mod errors;
mod notes;
mod openapi;
mod shared;
mod state;
mod users;

use std::{net::SocketAddr, sync::Arc};

use aide::axum::ApiRouter;
use app::AppParams;
use config::Config;
pub use db::{init_db, DB};
pub use errors::{Error, Result};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = Arc::new(Config::from_env()?);

    shared::tracing::setup_tracing(config.log_json);

    let conn = init_db(&config.database_url).await?;

    let (app, _) = app::create(AppParams {
        db: conn,
        config: config.clone(),
        router: |state| {
            ApiRouter::new()
                .merge(auth::router(state.clone()))
                .merge(notes::router(state))
        },
    })
    .await?;

    let app = shared::tracing::add_tracing_layer(app);

    let listener = TcpListener::bind(config.addr()).await?;

    tracing::info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;

    Ok(())
}
