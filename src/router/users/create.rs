//! Create a new user.

use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;

use crate::negotiate::{Encoding, Negotiated};
use crate::router::Valid;
use crate::router::users::location;
use crate::user::CreateUser;
use crate::{AppState, ServerError};

pub async fn handler(
    State(state): State<AppState>,
    encoding: Encoding,
    Valid(body): Valid<CreateUser>,
) -> Result<impl IntoResponse, ServerError> {
    // A request without a login is malformed, not semantically invalid.
    let Some(login) = body.login.clone() else {
        return Err(ServerError::BadRequest);
    };

    let user = state.store.insert(body.into_entity(login)).await?;
    tracing::info!(user_id = %user.id, "user created");

    Ok((
        [(header::LOCATION, location(&state.config.url, user.id))],
        Negotiated::new(encoding, user.id).status(StatusCode::CREATED),
    ))
}
