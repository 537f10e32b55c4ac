// core/src/models/order.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Order {
  pub order_id: i32,
  pub user_id: i32,
  pub order_total: f64,
  pub created_at: DateTime<Utc>,
}

/// Validated input for placing an order. `created_at` is assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
  pub user_id: i32,
  pub order_total: f64,
}

/// An order joined with its owner, as listed by `GET /orders`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct OrderWithUser {
  pub order_id: i32,
  pub order_total: f64,
  pub created_at: DateTime<Utc>,
  pub user_id: i32,
  pub user_name: String,
  pub user_email: String,
}

/// An order listed under its owner (`GET /users/{id}/orders`); the owner id is implied by the path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct UserOrder {
  pub order_id: i32,
  pub order_total: f64,
  pub created_at: DateTime<Utc>,
  pub user_name: String,
  pub user_email: String,
}
