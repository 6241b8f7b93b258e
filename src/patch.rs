//! Patch-document interpreter for the update-input shape.
//!
//! Supports set-field operations (`add`, `replace`) and `remove` on the
//! three mutable user fields. Structural problems (unknown path or
//! operation, non-string value) are collected into the shared field-keyed
//! error map instead of aborting.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::{ValidationError, ValidationErrors};

use crate::user::UpdateUser;

pub const LOGIN: &str = "/login";
pub const FIRST_NAME: &str = "/firstName";
pub const LAST_NAME: &str = "/lastName";

/// One field-level mutation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PatchOperation {
    pub op: String,
    pub path: String,
    #[serde(default)]
    pub value: Value,
}

impl PatchOperation {
    pub fn set(path: &str, value: impl Into<Value>) -> Self {
        Self {
            op: "replace".into(),
            path: path.into(),
            value: value.into(),
        }
    }
}

/// Apply `ops` to `target`, collecting structural errors into `errors`.
pub fn apply(ops: &[PatchOperation], target: &mut UpdateUser, errors: &mut ValidationErrors) {
    for op in ops {
        let field = match op.path.as_str() {
            LOGIN => &mut target.login,
            FIRST_NAME => &mut target.first_name,
            LAST_NAME => &mut target.last_name,
            _ => {
                errors.add(
                    "patch",
                    ValidationError::new("unknown_path")
                        .with_message(format!("Unknown path '{}'.", op.path).into()),
                );
                continue;
            }
        };

        match op.op.as_str() {
            "add" | "replace" => match &op.value {
                Value::String(value) => *field = Some(value.clone()),
                Value::Null => *field = None,
                _ => {
                    // Keyed by field name so type errors resolve like
                    // other field-level validation failures.
                    errors.add(
                        field_key(&op.path),
                        ValidationError::new("invalid_type")
                            .with_message(format!("Value of '{}' must be a string.", op.path).into()),
                    );
                }
            },
            "remove" => *field = None,
            _ => {
                errors.add(
                    "patch",
                    ValidationError::new("unknown_op")
                        .with_message(format!("Unsupported operation '{}'.", op.op).into()),
                );
            }
        }
    }
}

fn field_key(path: &str) -> &'static str {
    match path {
        LOGIN => "login",
        FIRST_NAME => "firstName",
        _ => "lastName",
    }
}
