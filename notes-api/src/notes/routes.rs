use crate::{
    auth,
    ctx::BaseParams,
    openapi::{
        aide::{
            axum::{routing::get_with, ApiRouter, IntoApiResponse},
            NoApi,
        },
        Json, Path,
    },
    state::AppState,
};
use axum::{http::StatusCode, middleware};

use schemars::JsonSchema;

use serde::Deserialize;

use super::{handlers, CreateNote, Note, NoteId, UpdateNote};

#[derive(Debug, Deserialize, JsonSchema)]
struct NoteIdPath {
    note_id: NoteId,
}

pub fn router(state: AppState) -> ApiRouter {
    ApiRouter::new()
        .api_route(
            "/notes",
            get_with(find_notes, |t| t.summary("List the caller's notes"))
                .post_with(create_note, |t| t.response::<201, Json<Note>>()),
        )
        .api_route(
            "/notes/{note_id}",
            get_with(get_note, |t| t.summary("Get one of the caller's notes"))
                .put(update_note)
                .delete(delete_note),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::middleware::protected))
        .with_state(state)
}

async fn find_notes(NoApi(base): NoApi<BaseParams>) -> impl IntoApiResponse {
    handlers::find_notes(base).await.map(Json)
}

async fn create_note(NoApi(base): NoApi<BaseParams>, Json(args): Json<CreateNote>) -> impl IntoApiResponse {
    handlers::create_note(args, base)
        .await
        .map(|r| (StatusCode::CREATED, Json(r)))
}

async fn get_note(
    Path(NoteIdPath { note_id }): Path<NoteIdPath>,
    NoApi(base): NoApi<BaseParams>,
) -> impl IntoApiResponse {
    handlers::get_note(note_id, base).await.map(Json)
}

async fn update_note(
    Path(NoteIdPath { note_id }): Path<NoteIdPath>,
    NoApi(base): NoApi<BaseParams>,
    Json(args): Json<UpdateNote>,
) -> impl IntoApiResponse {
    handlers::update_note(note_id, args, base).await.map(Json)
}

async fn delete_note(
    Path(NoteIdPath { note_id }): Path<NoteIdPath>,
    NoApi(base): NoApi<BaseParams>,
) -> impl IntoApiResponse {
    handlers::delete_note(note_id, base).await.map(Json)
}

#[cfg(test)]
mod tests {
    use crate::{
        auth::{AccessToken, Claims, TokenKeys},
        config::Config,
        db::{init_test_db, DB},
        errors::Result,
        notes::Note,
        state::AppState,
    };
    use aide::axum::ApiRouter;
    use axum_test::TestServer;
    use serde_json::{json, Value};

    fn router(state: AppState) -> ApiRouter {
        ApiRouter::new()
            .merge(crate::auth::router(state.clone()))
            .merge(super::router(state))
    }

    async fn test_server(db: DB) -> Result<TestServer> {
        crate::tests::test_server(db, router).await
    }

    async fn token(server: &TestServer, username: &str) -> String {
        let creds = json!({ "username": username, "password": "pw1" });
        server.post("/register").json(&creds).await;
        server.post("/login").json(&creds).await.json::<AccessToken>().access_token
    }

    #[tokio::test]
    async fn walkthrough() -> Result<()> {
        let server = test_server(init_test_db().await?).await?;

        let register = server
            .post("/register")
            .json(&json!({ "username": "alice", "password": "pw1" }))
            .await;
        assert_eq!(register.status_code(), 201);

        let login = server
            .post("/login")
            .json(&json!({ "username": "alice", "password": "pw1" }))
            .await;
        assert_eq!(login.status_code(), 200);
        let token = login.json::<AccessToken>().access_token;

        let created = server
            .post("/notes")
            .authorization_bearer(&token)
            .json(&json!({ "title": "t", "content": "c" }))
            .await;
        assert_eq!(created.status_code(), 201);
        assert_eq!(created.json::<Note>().id, 1);

        let fetched = server.get("/notes/1").authorization_bearer(&token).await;
        assert_eq!(fetched.status_code(), 200);
        assert_eq!(fetched.json::<Value>(), json!({ "id": 1, "title": "t", "content": "c" }));
        Ok(())
    }

    #[tokio::test]
    async fn find_notes() -> Result<()> {
        let server = test_server(init_test_db().await?).await?;
        let token = token(&server, "alice").await;

        for title in ["first", "second", "third"] {
            server
                .post("/notes")
                .authorization_bearer(&token)
                .json(&json!({ "title": title, "content": "" }))
                .await;
        }

        let response = server.get("/notes").authorization_bearer(&token).await;

        assert_eq!(response.status_code(), 200);
        let notes = response.json::<Vec<Note>>();
        assert_eq!(notes.len(), 3);
        assert_eq!(notes[0].title, "first");
        Ok(())
    }

    #[tokio::test]
    async fn update_note() -> Result<()> {
        let server = test_server(init_test_db().await?).await?;
        let token = token(&server, "alice").await;
        let note = server
            .post("/notes")
            .authorization_bearer(&token)
            .json(&json!({ "title": "first", "content": "1" }))
            .await
            .json::<Note>();

        let response = server
            .put(&format!("/notes/{}", note.id))
            .authorization_bearer(&token)
            .json(&json!({ "title": "second", "content": "2" }))
            .await;
        assert_eq!(response.status_code(), 200);

        let fetched = server
            .get(&format!("/notes/{}", note.id))
            .authorization_bearer(&token)
            .await
            .json::<Note>();
        assert_eq!(fetched.title, "second");
        assert_eq!(fetched.content, "2");
        Ok(())
    }

    #[tokio::test]
    async fn delete_note() -> Result<()> {
        let server = test_server(init_test_db().await?).await?;
        let token = token(&server, "alice").await;
        let note = server
            .post("/notes")
            .authorization_bearer(&token)
            .json(&json!({ "title": "first", "content": "1" }))
            .await
            .json::<Note>();

        let response = server
            .delete(&format!("/notes/{}", note.id))
            .authorization_bearer(&token)
            .await;
        assert_eq!(response.status_code(), 200);
        assert_eq!(response.json::<Note>().title, "first");

        let response = server
            .get(&format!("/notes/{}", note.id))
            .authorization_bearer(&token)
            .await;
        assert_eq!(response.status_code(), 404);
        assert_eq!(response.json::<Value>()["error"], "not_found");
        Ok(())
    }

    #[tokio::test]
    async fn notes_are_private() -> Result<()> {
        let server = test_server(init_test_db().await?).await?;
        let alice = token(&server, "alice").await;
        let bob = token(&server, "bob").await;

        let note = server
            .post("/notes")
            .authorization_bearer(&alice)
            .json(&json!({ "title": "secret", "content": "x" }))
            .await
            .json::<Note>();
        let path = format!("/notes/{}", note.id);

        let get = server.get(&path).authorization_bearer(&bob).await;
        let put = server
            .put(&path)
            .authorization_bearer(&bob)
            .json(&json!({ "title": "mine", "content": "y" }))
            .await;
        let delete = server.delete(&path).authorization_bearer(&bob).await;

        assert_eq!(get.status_code(), 404);
        assert_eq!(put.status_code(), 404);
        assert_eq!(delete.status_code(), 404);

        let list = server.get("/notes").authorization_bearer(&bob).await;
        assert!(list.json::<Vec<Note>>().is_empty());

        let still_there = server.get(&path).authorization_bearer(&alice).await.json::<Note>();
        assert_eq!(still_there.title, "secret");
        Ok(())
    }

    #[tokio::test]
    async fn requires_valid_token() -> Result<()> {
        let server = test_server(init_test_db().await?).await?;
        token(&server, "alice").await;

        let keys = TokenKeys::new(Config::test().jwt_secret.as_bytes(), 60);
        let now = chrono::Utc::now().timestamp();
        let expired = keys.encode(&Claims {
            sub: "1".into(),
            iat: now - 7200,
            exp: now - 3600,
        })?;
        let foreign = TokenKeys::new(b"another-secret", 60).issue(1)?.access_token;

        assert_eq!(server.get("/notes").await.status_code(), 401);
        assert_eq!(server.get("/notes/1").await.status_code(), 401);
        assert_eq!(
            server
                .post("/notes")
                .json(&json!({ "title": "t", "content": "c" }))
                .await
                .status_code(),
            401
        );
        assert_eq!(server.put("/notes/1").await.status_code(), 401);
        assert_eq!(server.delete("/notes/1").await.status_code(), 401);

        for bad in ["garbage", expired.as_str(), foreign.as_str()] {
            let response = server.get("/notes").authorization_bearer(bad).await;
            assert_eq!(response.status_code(), 401);
            assert_eq!(response.json::<Value>()["error"], "unauthorized");
        }

        let basic = server.get("/notes").authorization("Basic YWxpY2U6cHcx").await;
        assert_eq!(basic.status_code(), 401);
        Ok(())
    }

    #[tokio::test]
    async fn invalid_input() -> Result<()> {
        let server = test_server(init_test_db().await?).await?;
        let token = token(&server, "alice").await;

        let missing_content = server
            .post("/notes")
            .authorization_bearer(&token)
            .json(&json!({ "title": "t" }))
            .await;
        let empty_title = server
            .post("/notes")
            .authorization_bearer(&token)
            .json(&json!({ "title": "", "content": "c" }))
            .await;
        let not_json = server
            .post("/notes")
            .authorization_bearer(&token)
            .text("title=t")
            .await;
        let bad_id = server.get("/notes/abc").authorization_bearer(&token).await;
        let bad_update = server
            .put("/notes/1")
            .authorization_bearer(&token)
            .json(&json!({ "content": "c" }))
            .await;

        assert_eq!(missing_content.status_code(), 400);
        assert_eq!(missing_content.json::<Value>()["error"], "json_validation");
        assert_eq!(empty_title.status_code(), 400);
        assert_eq!(empty_title.json::<Value>()["error"], "invalid_input");
        assert_eq!(not_json.status_code(), 400);
        assert_eq!(bad_id.status_code(), 400);
        assert_eq!(bad_id.json::<Value>()["error"], "path_validation");
        assert_eq!(bad_update.status_code(), 400);
        Ok(())
    }

    #[tokio::test]
    async fn control_characters_in_title() -> Result<()> {
        let server = test_server(init_test_db().await?).await?;
        let token = token(&server, "alice").await;

        let create = server
            .post("/notes")
            .authorization_bearer(&token)
            .json(&json!({ "title": "\u{0}abc", "content": "c" }))
            .await;

        server
            .post("/notes")
            .authorization_bearer(&token)
            .json(&json!({ "title": "t", "content": "c" }))
            .await
            .assert_status(axum::http::StatusCode::CREATED);
        let update = server
            .put("/notes/1")
            .authorization_bearer(&token)
            .json(&json!({ "title": "a\u{0}", "content": "c" }))
            .await;

        assert_eq!(create.status_code(), 400);
        assert_eq!(create.json::<Value>()["error"], "invalid_input");
        assert_eq!(update.status_code(), 400);
        assert_eq!(update.json::<Value>()["error"], "invalid_input");
        Ok(())
    }

    #[tokio::test]
    async fn missing_note() -> Result<()> {
        let server = test_server(init_test_db().await?).await?;
        let token = token(&server, "alice").await;

        let get = server.get("/notes/42").authorization_bearer(&token).await;
        let put = server
            .put("/notes/42")
            .authorization_bearer(&token)
            .json(&json!({ "title": "t", "content": "c" }))
            .await;
        let delete = server.delete("/notes/42").authorization_bearer(&token).await;

        assert_eq!(get.status_code(), 404);
        assert_eq!(put.status_code(), 404);
        assert_eq!(delete.status_code(), 404);
        Ok(())
    }
}
