//! Get a user by id.

use axum::extract::{Path, State};
use uuid::Uuid;

use crate::negotiate::{Encoding, Negotiated};
use crate::user::UserDto;
use crate::{AppState, ServerError};

pub async fn handler(
    State(state): State<AppState>,
    encoding: Encoding,
    Path(user_id): Path<Uuid>,
) -> Result<Negotiated<UserDto>, ServerError> {
    let user = state
        .store
        .find_by_id(user_id)
        .await?
        .ok_or(ServerError::NotFound)?;

    Ok(Negotiated::new(encoding, UserDto::from(&user)))
}
