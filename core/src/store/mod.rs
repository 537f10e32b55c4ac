// core/src/store/mod.rs

//! The [`Store`] seam between request handlers and persistence.

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::models::{NewOrder, NewUser, OrderWithUser, User, UserOrder};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Outcome of the guarded user delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserDeletion {
  Deleted(User),
  /// At least one order references the user; nothing was removed.
  HasOrders,
  NotFound,
}

/// Persistence operations for users and orders.
///
/// Implementations report constraint violations through
/// [`StoreError`](crate::StoreError) variants rather than engine codes.
/// Listing orders always yields the newest first, ties broken by the higher `order_id`.
#[async_trait]
pub trait Store: Send + Sync {
  /// Inserts a user and returns its generated id.
  async fn create_user(&self, user: &NewUser) -> StoreResult<i32>;

  /// All users by ascending id.
  async fn list_users(&self) -> StoreResult<Vec<User>>;

  async fn get_user(&self, user_id: i32) -> StoreResult<Option<User>>;

  /// Overwrites name and email. `None` when no user has that id.
  async fn update_user(&self, user_id: i32, user: &NewUser) -> StoreResult<Option<User>>;

  /// Deletes a user unless an order references it. The check and the delete
  /// happen atomically with respect to concurrent order inserts.
  async fn delete_user(&self, user_id: i32) -> StoreResult<UserDeletion>;

  async fn user_exists(&self, user_id: i32) -> StoreResult<bool>;

  /// Inserts an order and returns its generated id.
  async fn create_order(&self, order: &NewOrder) -> StoreResult<i32>;

  async fn list_orders(&self) -> StoreResult<Vec<OrderWithUser>>;

  async fn list_user_orders(&self, user_id: i32) -> StoreResult<Vec<UserOrder>>;

  /// Releases underlying resources. Called once at shutdown.
  async fn close(&self);
}
