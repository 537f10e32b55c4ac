// server/src/web/handlers/mod.rs

use serde_json::{Map, Value};

use crate::errors::AppError;

// Declare handler modules
pub mod order_handlers;
pub mod user_handlers;

/// Request bodies must be JSON objects; arrays and scalars are rejected like unparsable JSON.
pub fn json_object(body: Value) -> Result<Map<String, Value>, AppError> {
  match body {
    Value::Object(fields) => Ok(fields),
    other => {
      tracing::warn!(body_kind = json_kind(&other), "Rejected non-object request body.");
      Err(AppError::Validation("Invalid JSON payload".to_string()))
    }
  }
}

fn json_kind(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "bool",
    Value::Number(_) => "number",
    Value::String(_) => "string",
    Value::Array(_) => "array",
    Value::Object(_) => "object",
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn only_objects_are_accepted() {
    let fields = json_object(json!({"name": "Ann"})).unwrap();
    assert_eq!(fields.get("name"), Some(&json!("Ann")));

    for body in [json!(["Ann", "a@x.com"]), json!(null), json!(3), json!("x")] {
      let err = json_object(body).unwrap_err();
      assert_eq!(err.public_message(), "Invalid JSON payload");
    }
  }
}
