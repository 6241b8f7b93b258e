//! Full update of a user, inserting when the id is unknown.

use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use uuid::Uuid;
use validator::{ValidationError, ValidationErrors};

use crate::negotiate::{Encoding, Negotiated};
use crate::router::users::location;
use crate::router::{Valid, validation_failure};
use crate::user::UpdateUser;
use crate::{AppState, ServerError};

pub async fn handler(
    State(state): State<AppState>,
    encoding: Encoding,
    Path(user_id): Path<Uuid>,
    Valid(body): Valid<UpdateUser>,
) -> Result<Response, ServerError> {
    let mut errors = ValidationErrors::new();

    if body.login.is_none() {
        errors.add(
            "login",
            ValidationError::new("required").with_message("Login is required.".into()),
        );
    }
    if body.first_name.is_none() {
        errors.add(
            "firstName",
            ValidationError::new("required").with_message("Incorrect first name.".into()),
        );
    }
    if body.last_name.is_none() {
        errors.add(
            "lastName",
            ValidationError::new("required").with_message("Incorrect last name.".into()),
        );
    }
    if !errors.is_empty() {
        return Err(validation_failure(errors));
    }

    // The route id wins over anything the body carried.
    let entity = body.into_entity(user_id);
    let inserted = state.store.update_or_insert(&entity).await?;

    if inserted {
        tracing::info!(user_id = %user_id, "user created by upsert");
        Ok((
            [(header::LOCATION, location(&state.config.url, user_id))],
            Negotiated::new(encoding, user_id).status(StatusCode::CREATED),
        )
            .into_response())
    } else {
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}
