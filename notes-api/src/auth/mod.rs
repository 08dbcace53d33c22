mod handlers;
mod model;
mod password;
mod routes;
mod token;

pub use model::*;
pub use routes::router;
pub use token::{Claims, TokenKeys};

pub mod middleware {
    use axum::{
        extract::{Request, State},
        middleware::Next,
        response::Response,
    };
    use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};

    use crate::{state::AppState, Error, Result};

    /// Rejects requests without a valid bearer token and stores the caller `Ctx` in the request extensions.
    pub async fn protected(State(state): State<AppState>, mut request: Request, next: Next) -> Result<Response> {
        let bearer = request
            .headers()
            .typed_get::<Authorization<Bearer>>()
            .ok_or(Error::Unauthorized)?;

        let ctx = super::handlers::authenticate(state.conn, &state.tokens, bearer.token()).await?;
        request.extensions_mut().insert(ctx);

        Ok(next.run(request).await)
    }
}
