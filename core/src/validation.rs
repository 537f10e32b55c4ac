// core/src/validation.rs

//! Request input checks. Everything here runs before the store is touched.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;

use crate::models::{NewOrder, NewUser};

static EMAIL_PATTERN: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern must compile"));

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("Name and email are required and must be strings")]
  MissingUserFields,

  #[error("Invalid email format")]
  InvalidEmail,

  #[error("Invalid user ID")]
  InvalidUserId,

  #[error("Invalid order total")]
  InvalidOrderTotal,
}

pub fn is_valid_email(email: &str) -> bool {
  EMAIL_PATTERN.is_match(email)
}

/// Parses a user id taken from a request path. Only positive `i32` values are accepted.
pub fn parse_user_id(raw: &str) -> Result<i32, ValidationError> {
  raw
    .parse::<i32>()
    .ok()
    .filter(|id| *id > 0)
    .ok_or(ValidationError::InvalidUserId)
}

/// Checks a `{name, email}` body. Both fields must be non-empty JSON strings.
pub fn validate_user_payload(name: Option<&Value>, email: Option<&Value>) -> Result<NewUser, ValidationError> {
  let (Some(Value::String(name)), Some(Value::String(email))) = (name, email) else {
    return Err(ValidationError::MissingUserFields);
  };
  if name.is_empty() || email.is_empty() {
    return Err(ValidationError::MissingUserFields);
  }
  if !is_valid_email(email) {
    return Err(ValidationError::InvalidEmail);
  }

  Ok(NewUser {
    name: name.clone(),
    email: email.clone(),
  })
}

/// Checks a `{user_id, order_total}` body. The user id is checked first.
pub fn validate_order_payload(
  user_id: Option<&Value>,
  order_total: Option<&Value>,
) -> Result<NewOrder, ValidationError> {
  let user_id = user_id
    .and_then(|value| match value {
      Value::Number(number) => integral_i32(number),
      _ => None,
    })
    .filter(|id| *id > 0)
    .ok_or(ValidationError::InvalidUserId)?;

  let order_total = order_total
    .and_then(Value::as_f64)
    .filter(|total| total.is_finite() && *total > 0.0)
    .ok_or(ValidationError::InvalidOrderTotal)?;

  Ok(NewOrder { user_id, order_total })
}

// JSON has a single number type, so `7.0` names the same id as `7`.
fn integral_i32(number: &serde_json::Number) -> Option<i32> {
  if let Some(int) = number.as_i64() {
    return i32::try_from(int).ok();
  }
  let float = number.as_f64()?;
  if float.fract() != 0.0 || float < f64::from(i32::MIN) || float > f64::from(i32::MAX) {
    return None;
  }
  Some(float as i32)
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn email_pattern_accepts_basic_addresses() {
    assert!(is_valid_email("a@x.com"));
    assert!(is_valid_email("first.last+tag@sub.example.org"));
  }

  #[test]
  fn email_pattern_rejects_malformed_addresses() {
    for bad in ["", "plain", "a@x", "@x.com", "a@.com", "a b@x.com", "a@x.com ", "a@@x.com"] {
      assert!(!is_valid_email(bad), "{bad:?} should be rejected");
    }
  }

  #[test]
  fn path_ids_must_be_positive_integers() {
    assert_eq!(parse_user_id("1"), Ok(1));
    assert_eq!(parse_user_id("2147483647"), Ok(i32::MAX));
    for bad in ["0", "-1", "abc", "", "1.5", "2147483648", " 3"] {
      assert_eq!(parse_user_id(bad), Err(ValidationError::InvalidUserId), "{bad:?}");
    }
  }

  #[test]
  fn user_payload_requires_both_strings() {
    let name = json!("Ann");
    let email = json!("a@x.com");
    assert_eq!(
      validate_user_payload(Some(&name), Some(&email)),
      Ok(NewUser {
        name: "Ann".into(),
        email: "a@x.com".into()
      })
    );

    assert_eq!(
      validate_user_payload(None, Some(&email)),
      Err(ValidationError::MissingUserFields)
    );
    assert_eq!(
      validate_user_payload(Some(&json!(42)), Some(&email)),
      Err(ValidationError::MissingUserFields)
    );
    assert_eq!(
      validate_user_payload(Some(&json!("")), Some(&email)),
      Err(ValidationError::MissingUserFields)
    );
  }

  #[test]
  fn user_payload_rejects_bad_email_after_presence_check() {
    assert_eq!(
      validate_user_payload(Some(&json!("Ann")), Some(&json!("not-an-email"))),
      Err(ValidationError::InvalidEmail)
    );
  }

  #[test]
  fn order_payload_accepts_positive_values() {
    let order = validate_order_payload(Some(&json!(3)), Some(&json!(10.5))).unwrap();
    assert_eq!(order.user_id, 3);
    assert_eq!(order.order_total, 10.5);

    let order = validate_order_payload(Some(&json!(3.0)), Some(&json!(1))).unwrap();
    assert_eq!(order.user_id, 3);
    assert_eq!(order.order_total, 1.0);
  }

  #[test]
  fn order_payload_rejects_bad_user_id_first() {
    for bad in [json!(0), json!(-4), json!("3"), json!(1.5), json!(null), json!(3_000_000_000_i64)] {
      assert_eq!(
        validate_order_payload(Some(&bad), Some(&json!(-1))),
        Err(ValidationError::InvalidUserId),
        "{bad}"
      );
    }
    assert_eq!(validate_order_payload(None, None), Err(ValidationError::InvalidUserId));
  }

  #[test]
  fn order_payload_rejects_non_positive_totals() {
    for bad in [json!(0), json!(-0.01), json!("10"), json!(false)] {
      assert_eq!(
        validate_order_payload(Some(&json!(1)), Some(&bad)),
        Err(ValidationError::InvalidOrderTotal),
        "{bad}"
      );
    }
    assert_eq!(
      validate_order_payload(Some(&json!(1)), None),
      Err(ValidationError::InvalidOrderTotal)
    );
  }
}
