//! Users-related HTTP API.
mod create;
mod delete;
mod get;
mod list;
mod options;
mod patch;
mod update;

use axum::Router;
use axum::routing::get;
use uuid::Uuid;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        // `GET /users` goes to `list`, `POST /users` goes to `create`.
        .route(
            "/",
            get(list::handler)
                .post(create::handler)
                .options(options::handler),
        )
        // `GET`/`PUT`/`PATCH`/`DELETE /users/{id}`. `HEAD` rides on `GET`.
        .route(
            "/{user_id}",
            get(get::handler)
                .put(update::handler)
                .patch(patch::handler)
                .delete(delete::handler),
        )
}

/// Absolute reference to one user resource.
pub(crate) fn location(base_url: &str, user_id: Uuid) -> String {
    format!("{base_url}/users/{user_id}")
}
