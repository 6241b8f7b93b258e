//! Request extraction and validation-failure classification.

pub mod users;

use axum::Json;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::error::ServerError;

/// Field names whose errors make a request semantically invalid rather
/// than malformed.
const VALIDATED_FIELDS: &[&str] = &["login", "firstName", "lastName"];

/// Map a non-empty error set to a response: errors on validated fields
/// yield 422 with the error set, anything else is a plain 400.
pub(crate) fn validation_failure(errors: ValidationErrors) -> ServerError {
    let fields = errors.field_errors();
    if VALIDATED_FIELDS.iter().any(|field| fields.contains_key(*field)) {
        ServerError::Unprocessable(errors)
    } else {
        ServerError::BadRequest
    }
}

/// JSON body extractor running the derive-level validators.
pub struct Valid<T>(pub T);

impl<S, T> FromRequest<S> for Valid<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ServerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;

        if let Err(errors) = value.validate() {
            return Err(validation_failure(errors));
        }

        Ok(Valid(value))
    }
}

#[cfg(test)]
pub(crate) fn state() -> crate::AppState {
    use std::sync::Arc;

    let mut config = crate::config::Configuration::default();
    config.url = "http://localhost:1111".to_owned();

    crate::AppState {
        config: Arc::new(config),
        store: Arc::new(crate::user::memory::MemoryUserStore::default()),
    }
}

#[cfg(test)]
mod tests {
    use validator::ValidationError;

    use super::*;

    #[test]
    fn test_validation_failure_classification() {
        let mut errors = ValidationErrors::new();
        errors.add("login", ValidationError::new("login"));
        assert!(matches!(
            validation_failure(errors),
            ServerError::Unprocessable(_)
        ));

        let mut errors = ValidationErrors::new();
        errors.add("patch", ValidationError::new("unknown_path"));
        assert!(matches!(validation_failure(errors), ServerError::BadRequest));
    }
}
