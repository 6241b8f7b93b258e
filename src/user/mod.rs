//! User entity, read model and request inputs.

pub mod memory;
pub mod store;

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::ValidationError;

/// User as saved on database.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub login: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// User fields before the store assigned an identifier.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NewUser {
    pub login: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Read model returned by `GET` routes.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: Uuid,
    pub login: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            login: user.login.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
        }
    }
}

/// Body of `POST /users`.
#[derive(Debug, Default, validator::Validate, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateUser {
    #[validate(custom(
        function = "crate::user::validate_login",
        message = "Login should contain only letters or digits."
    ))]
    pub login: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl CreateUser {
    /// Build the entity to insert. Caller must have checked `login` presence.
    pub fn into_entity(self, login: String) -> NewUser {
        NewUser {
            login,
            first_name: self.first_name,
            last_name: self.last_name,
        }
    }
}

/// Body of `PUT /users/{id}`, also the target shape of patch documents.
#[derive(Debug, Default, validator::Validate, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateUser {
    #[validate(custom(
        function = "crate::user::validate_login",
        message = "Login should contain only letters or digits."
    ))]
    pub login: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl UpdateUser {
    /// Build the entity with the route-supplied identifier.
    pub fn into_entity(self, id: Uuid) -> User {
        User {
            id,
            login: self.login.unwrap_or_default(),
            first_name: self.first_name,
            last_name: self.last_name,
        }
    }
}

/// Accept Unicode letters and digits only.
pub fn validate_login(login: &str) -> Result<(), ValidationError> {
    if login.chars().all(char::is_alphanumeric) {
        Ok(())
    } else {
        Err(ValidationError::new("login"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_login() {
        assert!(validate_login("ab1").is_ok());
        assert!(validate_login("").is_ok());
        assert!(validate_login("Zoé42").is_ok());
        assert!(validate_login("ab 1").is_err());
        assert!(validate_login("ab@1").is_err());
        assert!(validate_login("a_b").is_err());
    }

    #[test]
    fn test_dto_projection() {
        let user = User {
            id: Uuid::new_v4(),
            login: "ab1".into(),
            first_name: Some("A".into()),
            last_name: None,
        };
        let dto = UserDto::from(&user);
        assert_eq!(dto.id, user.id);
        assert_eq!(dto.login, "ab1");
        assert_eq!(dto.first_name.as_deref(), Some("A"));
        assert_eq!(dto.last_name, None);
    }
}
