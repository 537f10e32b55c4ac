// core/src/store/postgres.rs

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use tracing::{debug, info, instrument};

use super::{Store, UserDeletion};
use crate::error::StoreResult;
use crate::models::{NewOrder, NewUser, OrderWithUser, User, UserOrder};

const ORDERS_WITH_USER_QUERY: &str = "SELECT o.order_id, o.order_total, o.created_at, \
          u.user_id, u.name AS user_name, u.email AS user_email \
   FROM orders o \
   JOIN users u ON o.user_id = u.user_id \
   ORDER BY o.created_at DESC, o.order_id DESC";

const USER_ORDERS_QUERY: &str = "SELECT o.order_id, o.order_total, o.created_at, \
          u.name AS user_name, u.email AS user_email \
   FROM orders o \
   JOIN users u ON o.user_id = u.user_id \
   WHERE o.user_id = $1 \
   ORDER BY o.created_at DESC, o.order_id DESC";

/// PostgreSQL-backed store. Every statement is parameterized.
#[derive(Debug, Clone)]
pub struct PgStore {
  pool: PgPool,
}

impl PgStore {
  /// Opens a pool and verifies connectivity by establishing the first connection.
  pub async fn connect(options: PgConnectOptions, max_connections: u32) -> StoreResult<Self> {
    let pool = PgPoolOptions::new()
      .max_connections(max_connections)
      .connect_with(options)
      .await?;
    info!(max_connections, "PostgreSQL connection pool opened.");
    Ok(Self { pool })
  }

  pub fn from_pool(pool: PgPool) -> Self {
    Self { pool }
  }

  pub fn pool(&self) -> &PgPool {
    &self.pool
  }
}

#[async_trait]
impl Store for PgStore {
  #[instrument(name = "store::create_user", skip(self, user))]
  async fn create_user(&self, user: &NewUser) -> StoreResult<i32> {
    let user_id = sqlx::query_scalar::<_, i32>("INSERT INTO users (name, email) VALUES ($1, $2) RETURNING user_id")
      .bind(&user.name)
      .bind(&user.email)
      .fetch_one(&self.pool)
      .await?;
    debug!(user_id, "User row inserted.");
    Ok(user_id)
  }

  async fn list_users(&self) -> StoreResult<Vec<User>> {
    let users = sqlx::query_as::<_, User>("SELECT user_id, name, email FROM users ORDER BY user_id")
      .fetch_all(&self.pool)
      .await?;
    Ok(users)
  }

  async fn get_user(&self, user_id: i32) -> StoreResult<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT user_id, name, email FROM users WHERE user_id = $1")
      .bind(user_id)
      .fetch_optional(&self.pool)
      .await?;
    Ok(user)
  }

  #[instrument(name = "store::update_user", skip(self, user))]
  async fn update_user(&self, user_id: i32, user: &NewUser) -> StoreResult<Option<User>> {
    let updated = sqlx::query_as::<_, User>(
      "UPDATE users SET name = $1, email = $2 WHERE user_id = $3 RETURNING user_id, name, email",
    )
    .bind(&user.name)
    .bind(&user.email)
    .bind(user_id)
    .fetch_optional(&self.pool)
    .await?;
    Ok(updated)
  }

  #[instrument(name = "store::delete_user", skip(self))]
  async fn delete_user(&self, user_id: i32) -> StoreResult<UserDeletion> {
    // Dropping `tx` without commit rolls back and returns the connection to the pool.
    let mut tx = self.pool.begin().await?;

    // FOR UPDATE conflicts with the key-share lock an order insert takes on its
    // user row, so no order can appear between the check and the delete.
    let locked = sqlx::query_scalar::<_, i32>("SELECT user_id FROM users WHERE user_id = $1 FOR UPDATE")
      .bind(user_id)
      .fetch_optional(&mut *tx)
      .await?;
    if locked.is_none() {
      tx.rollback().await?;
      return Ok(UserDeletion::NotFound);
    }

    let has_orders = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM orders WHERE user_id = $1)")
      .bind(user_id)
      .fetch_one(&mut *tx)
      .await?;
    if has_orders {
      debug!("User still has orders; rolling back.");
      tx.rollback().await?;
      return Ok(UserDeletion::HasOrders);
    }

    let deleted = sqlx::query_as::<_, User>("DELETE FROM users WHERE user_id = $1 RETURNING user_id, name, email")
      .bind(user_id)
      .fetch_optional(&mut *tx)
      .await?;
    match deleted {
      Some(user) => {
        tx.commit().await?;
        Ok(UserDeletion::Deleted(user))
      }
      None => {
        tx.rollback().await?;
        Ok(UserDeletion::NotFound)
      }
    }
  }

  async fn user_exists(&self, user_id: i32) -> StoreResult<bool> {
    let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE user_id = $1)")
      .bind(user_id)
      .fetch_one(&self.pool)
      .await?;
    Ok(exists)
  }

  #[instrument(name = "store::create_order", skip(self, order), fields(user_id = order.user_id))]
  async fn create_order(&self, order: &NewOrder) -> StoreResult<i32> {
    let order_id =
      sqlx::query_scalar::<_, i32>("INSERT INTO orders (user_id, order_total) VALUES ($1, $2) RETURNING order_id")
        .bind(order.user_id)
        .bind(order.order_total)
        .fetch_one(&self.pool)
        .await?;
    debug!(order_id, "Order row inserted.");
    Ok(order_id)
  }

  async fn list_orders(&self) -> StoreResult<Vec<OrderWithUser>> {
    let orders = sqlx::query_as::<_, OrderWithUser>(ORDERS_WITH_USER_QUERY)
      .fetch_all(&self.pool)
      .await?;
    Ok(orders)
  }

  async fn list_user_orders(&self, user_id: i32) -> StoreResult<Vec<UserOrder>> {
    let orders = sqlx::query_as::<_, UserOrder>(USER_ORDERS_QUERY)
      .bind(user_id)
      .fetch_all(&self.pool)
      .await?;
    Ok(orders)
  }

  async fn close(&self) {
    self.pool.close().await;
    info!("PostgreSQL connection pool closed.");
  }
}
