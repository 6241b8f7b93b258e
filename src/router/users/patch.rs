//! Partial update of an existing user via a patch document.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use uuid::Uuid;
use validator::{ValidationError, ValidationErrors};

use crate::patch::PatchOperation;
use crate::router::validation_failure;
use crate::user::{UpdateUser, validate_login};
use crate::{AppState, ServerError};

pub async fn handler(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    body: Result<Json<Option<Vec<PatchOperation>>>, JsonRejection>,
) -> Result<StatusCode, ServerError> {
    let Json(ops) = body?;
    let Some(ops) = ops else {
        return Err(ServerError::BadRequest);
    };

    // Start from a blank input and let the document fill it in.
    let mut user = UpdateUser::default();
    let mut errors = ValidationErrors::new();
    crate::patch::apply(&ops, &mut user, &mut errors);

    match user.login.as_deref() {
        Some(login) => {
            if validate_login(login).is_err() {
                errors.add(
                    "login",
                    ValidationError::new("login")
                        .with_message("Login should contain only letters or digits.".into()),
                );
            }
        }
        None => {
            errors.add(
                "login",
                ValidationError::new("required").with_message("Login is required.".into()),
            );
        }
    }

    if state.store.find_by_id(user_id).await?.is_none() {
        errors.add(
            "id",
            ValidationError::new("not_found").with_message("User not found.".into()),
        );
    }
    if user.first_name.as_deref().is_none_or(str::is_empty) {
        errors.add(
            "firstName",
            ValidationError::new("required").with_message("Incorrect first name.".into()),
        );
    }
    if user.last_name.as_deref().is_none_or(str::is_empty) {
        errors.add(
            "lastName",
            ValidationError::new("required").with_message("Incorrect last name.".into()),
        );
    }

    if !errors.is_empty() {
        // A missing target outranks every field error.
        if errors.field_errors().contains_key("id") {
            return Err(ServerError::NotFound);
        }
        return Err(validation_failure(errors));
    }

    state.store.update(&user.into_entity(user_id)).await?;

    Ok(StatusCode::NO_CONTENT)
}
