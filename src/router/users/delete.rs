//! Delete a user by id.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use uuid::Uuid;

use crate::{AppState, ServerError};

pub async fn handler(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    // The lookup and the delete are two separate store calls.
    if state.store.find_by_id(user_id).await?.is_none() {
        return Err(ServerError::NotFound);
    }

    state.store.delete(user_id).await?;
    tracing::info!(user_id = %user_id, "user deleted");

    Ok(StatusCode::NO_CONTENT)
}
