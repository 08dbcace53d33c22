use aide::scalar::Scalar;
use axum::{
    extract::State,
    middleware,
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;

use serde_json::json;

use crate::{
    config::Config,
    db::{self, DB},
    errors::{self, on_error, ErrorResponseDocs},
    openapi::{
        self,
        aide::axum::ApiRouter,
        OpenApi,
    },
    state::AppState,
};

pub struct AppParams<Router>
where
    Router: FnOnce(AppState) -> ApiRouter,
{
    pub db: DB,
    pub config: Arc<Config>,
    pub router: Router,
}

pub async fn create<R>(AppParams { db, config, router }: AppParams<R>) -> errors::Result<(Router, OpenApi)>
where
    R: FnOnce(AppState) -> ApiRouter,
{
    let mut api = OpenApi::default();

    let state = AppState::new(db.clone(), config);

    let ops = ApiRouter::new()
        .route("/__version__", get(version))
        .route("/__heartbeat__", get(heartbeat))
        .route("/__lbheartbeat__", get(lbheartbeat))
        .with_state(state.clone());

    let docs = Router::new()
        .route(
            "/__docs__",
            get(Scalar::new("/__docs__/spec.json").with_title("Notes API").axum_handler()),
        )
        .route("/__docs__/spec.json", get(serve_docs));

    let app = ApiRouter::new()
        .merge(ops)
        .merge(router(state))
        .finish_api_with(&mut api, |t| {
            t.title("Notes").default_response::<openapi::Json<ErrorResponseDocs>>()
        })
        .merge(docs)
        .layer(
            ServiceBuilder::new()
                .layer(Extension(db))
                .layer(Extension(Arc::new(api.clone())))
                .layer(middleware::from_fn(on_error)),
        );

    Ok((app, api))
}

async fn version(State(config): State<Arc<Config>>) -> impl IntoResponse {
    Json(json!({
        "source" : config.source,
        "version": config.version,
        "commit" : config.git_commit,
        "build"  : config.pipeline_id
    }))
}

async fn heartbeat(State(db): State<DB>) -> errors::Result<impl IntoResponse> {
    db::ping(&db).await?;
    Ok(Json(json!({ "status": "ok" })))
}

async fn lbheartbeat() -> impl IntoResponse {
    ""
}

async fn serve_docs(Extension(api): Extension<Arc<OpenApi>>) -> impl IntoResponse {
    Json(api.as_ref().clone())
}

#[cfg(test)]
mod tests {
    use crate::{db::init_test_db, errors::Result, notes};
    use axum_test::TestServer;
    use serde_json::Value;

    async fn test_server() -> Result<TestServer> {
        let db = init_test_db().await?;
        crate::tests::test_server(db, notes::router).await
    }

    #[tokio::test]
    async fn heartbeats() -> Result<()> {
        let server = test_server().await?;

        let heartbeat = server.get("/__heartbeat__").await;
        assert_eq!(heartbeat.status_code(), 200);
        assert_eq!(heartbeat.json::<Value>()["status"], "ok");

        assert_eq!(server.get("/__lbheartbeat__").await.status_code(), 200);
        Ok(())
    }

    #[tokio::test]
    async fn version() -> Result<()> {
        let server = test_server().await?;

        let version = server.get("/__version__").await.json::<Value>();

        assert_eq!(version["version"], "local");
        assert_eq!(version["commit"], "local");
        Ok(())
    }

    #[tokio::test]
    async fn openapi_spec() -> Result<()> {
        let server = test_server().await?;

        let response = server.get("/__docs__/spec.json").await;
        assert_eq!(response.status_code(), 200);

        let spec = response.json::<Value>();
        assert!(spec["paths"]["/notes"]["get"].is_object());
        assert!(spec["paths"]["/notes/{note_id}"]["delete"].is_object());
        Ok(())
    }

    #[tokio::test]
    async fn unknown_route() -> Result<()> {
        let server = test_server().await?;
        assert_eq!(server.get("/nope").await.status_code(), 404);
        Ok(())
    }
}
