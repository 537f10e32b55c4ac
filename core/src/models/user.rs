// core/src/models/user.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
  pub user_id: i32,
  pub name: String,
  pub email: String,
}

/// Validated input for creating or overwriting a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
  pub name: String,
  pub email: String,
}
