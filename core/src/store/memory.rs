// core/src/store/memory.rs

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use tracing::debug;

use super::{Store, UserDeletion};
use crate::error::{StoreError, StoreResult};
use crate::models::{NewOrder, NewUser, Order, OrderWithUser, User, UserOrder};

/// In-process store with the same constraints as the PostgreSQL schema:
/// unique emails, orders referencing existing users, positive totals.
///
/// One lock guards both tables, so every operation (the guarded delete
/// included) is atomic.
#[derive(Debug, Default)]
pub struct MemoryStore {
  tables: Mutex<Tables>,
  closed: AtomicBool,
}

#[derive(Debug, Default)]
struct Tables {
  users: BTreeMap<i32, User>,
  orders: Vec<Order>,
  last_user_id: i32,
  last_order_id: i32,
}

impl Tables {
  fn email_taken(&self, email: &str, except: Option<i32>) -> bool {
    self
      .users
      .values()
      .any(|user| user.email == email && Some(user.user_id) != except)
  }

  fn newest_first(&self) -> Vec<&Order> {
    let mut orders: Vec<&Order> = self.orders.iter().collect();
    orders.sort_by(|a, b| {
      b.created_at
        .cmp(&a.created_at)
        .then_with(|| b.order_id.cmp(&a.order_id))
    });
    orders
  }
}

fn duplicate_email() -> StoreError {
  StoreError::UniqueViolation("duplicate key value violates unique constraint \"users_email_key\"".to_string())
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Whether [`Store::close`] has been called. Used by tests to check shutdown.
  #[doc(hidden)]
  pub fn is_closed(&self) -> bool {
    self.closed.load(Ordering::SeqCst)
  }

  /// Number of stored orders. Used by tests to check that rejected writes left nothing behind.
  #[doc(hidden)]
  pub fn order_count(&self) -> usize {
    self.tables.lock().orders.len()
  }
}

#[async_trait]
impl Store for MemoryStore {
  async fn create_user(&self, user: &NewUser) -> StoreResult<i32> {
    let mut tables = self.tables.lock();
    if tables.email_taken(&user.email, None) {
      return Err(duplicate_email());
    }
    tables.last_user_id += 1;
    let user_id = tables.last_user_id;
    tables.users.insert(
      user_id,
      User {
        user_id,
        name: user.name.clone(),
        email: user.email.clone(),
      },
    );
    debug!(user_id, "User inserted into memory store.");
    Ok(user_id)
  }

  async fn list_users(&self) -> StoreResult<Vec<User>> {
    Ok(self.tables.lock().users.values().cloned().collect())
  }

  async fn get_user(&self, user_id: i32) -> StoreResult<Option<User>> {
    Ok(self.tables.lock().users.get(&user_id).cloned())
  }

  async fn update_user(&self, user_id: i32, user: &NewUser) -> StoreResult<Option<User>> {
    let mut tables = self.tables.lock();
    if !tables.users.contains_key(&user_id) {
      return Ok(None);
    }
    if tables.email_taken(&user.email, Some(user_id)) {
      return Err(duplicate_email());
    }
    let updated = User {
      user_id,
      name: user.name.clone(),
      email: user.email.clone(),
    };
    tables.users.insert(user_id, updated.clone());
    Ok(Some(updated))
  }

  async fn delete_user(&self, user_id: i32) -> StoreResult<UserDeletion> {
    let mut tables = self.tables.lock();
    if !tables.users.contains_key(&user_id) {
      return Ok(UserDeletion::NotFound);
    }
    if tables.orders.iter().any(|order| order.user_id == user_id) {
      return Ok(UserDeletion::HasOrders);
    }
    Ok(match tables.users.remove(&user_id) {
      Some(user) => UserDeletion::Deleted(user),
      None => UserDeletion::NotFound,
    })
  }

  async fn user_exists(&self, user_id: i32) -> StoreResult<bool> {
    Ok(self.tables.lock().users.contains_key(&user_id))
  }

  async fn create_order(&self, order: &NewOrder) -> StoreResult<i32> {
    let mut tables = self.tables.lock();
    if !tables.users.contains_key(&order.user_id) {
      return Err(StoreError::ForeignKeyViolation(
        "insert or update on table \"orders\" violates foreign key constraint \"orders_user_id_fkey\"".to_string(),
      ));
    }
    if !(order.order_total > 0.0) {
      return Err(StoreError::CheckViolation(
        "new row for relation \"orders\" violates check constraint \"orders_order_total_check\"".to_string(),
      ));
    }
    tables.last_order_id += 1;
    let order_id = tables.last_order_id;
    tables.orders.push(Order {
      order_id,
      user_id: order.user_id,
      order_total: order.order_total,
      created_at: Utc::now(),
    });
    debug!(order_id, user_id = order.user_id, "Order inserted into memory store.");
    Ok(order_id)
  }

  async fn list_orders(&self) -> StoreResult<Vec<OrderWithUser>> {
    let tables = self.tables.lock();
    let orders = tables
      .newest_first()
      .into_iter()
      .filter_map(|order| {
        let owner = tables.users.get(&order.user_id)?;
        Some(OrderWithUser {
          order_id: order.order_id,
          order_total: order.order_total,
          created_at: order.created_at,
          user_id: owner.user_id,
          user_name: owner.name.clone(),
          user_email: owner.email.clone(),
        })
      })
      .collect();
    Ok(orders)
  }

  async fn list_user_orders(&self, user_id: i32) -> StoreResult<Vec<UserOrder>> {
    let tables = self.tables.lock();
    let Some(owner) = tables.users.get(&user_id) else {
      return Ok(Vec::new());
    };
    let orders = tables
      .newest_first()
      .into_iter()
      .filter(|order| order.user_id == user_id)
      .map(|order| UserOrder {
        order_id: order.order_id,
        order_total: order.order_total,
        created_at: order.created_at,
        user_name: owner.name.clone(),
        user_email: owner.email.clone(),
      })
      .collect();
    Ok(orders)
  }

  async fn close(&self) {
    self.closed.store(true, Ordering::SeqCst);
    debug!("Memory store closed.");
  }
}
