// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::test;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use orders_core::{
  MemoryStore, NewOrder, NewUser, OrderWithUser, Store, StoreError, StoreResult, User, UserDeletion, UserOrder,
};
use orders_server::AppState;
use serde_json::{json, Value};
use std::fmt::Debug;
use std::sync::Arc;
use tracing::Level;

static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

/// Fresh state over an empty in-memory store; the store handle is returned for direct inspection.
pub fn memory_state() -> (AppState, Arc<MemoryStore>) {
  setup_tracing();
  let store = Arc::new(MemoryStore::new());
  (AppState::new(store.clone()), store)
}

/// Sends a request and decodes the body as JSON (`Value::Null` when it is not JSON).
pub async fn send<S, R, B, E>(app: &S, req: R) -> (StatusCode, Value)
where
  S: Service<R, Response = ServiceResponse<B>, Error = E>,
  B: MessageBody,
  E: Debug,
{
  let res = test::call_service(app, req).await;
  let status = res.status();
  let bytes = test::read_body(res).await;
  (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

pub async fn create_user<S, R, B, E>(app: &S, req: R) -> i32
where
  S: Service<R, Response = ServiceResponse<B>, Error = E>,
  B: MessageBody,
  E: Debug,
{
  let (status, body) = send(app, req).await;
  assert_eq!(status, StatusCode::CREATED, "unexpected body: {body}");
  body["user_id"].as_i64().expect("user_id in response") as i32
}

pub fn user_body(name: &str, email: &str) -> Value {
  json!({ "name": name, "email": email })
}

/// How [`BrokenStore`] fails every call.
#[derive(Debug, Clone, Copy)]
pub enum Breakage {
  /// Returns a non-constraint database error.
  DatabaseDown,
  /// Panics inside the store call.
  Panic,
}

/// Store whose every operation fails, for exercising the server's error paths.
#[derive(Debug)]
pub struct BrokenStore {
  breakage: Breakage,
}

impl BrokenStore {
  pub fn new(breakage: Breakage) -> Self {
    Self { breakage }
  }

  fn fail<T>(&self) -> StoreResult<T> {
    match self.breakage {
      Breakage::DatabaseDown => Err(StoreError::Database(sqlx::Error::PoolTimedOut)),
      Breakage::Panic => panic!("store exploded"),
    }
  }
}

pub fn broken_state(breakage: Breakage) -> AppState {
  setup_tracing();
  AppState::new(Arc::new(BrokenStore::new(breakage)))
}

#[async_trait]
impl Store for BrokenStore {
  async fn create_user(&self, _user: &NewUser) -> StoreResult<i32> {
    self.fail()
  }

  async fn list_users(&self) -> StoreResult<Vec<User>> {
    self.fail()
  }

  async fn get_user(&self, _user_id: i32) -> StoreResult<Option<User>> {
    self.fail()
  }

  async fn update_user(&self, _user_id: i32, _user: &NewUser) -> StoreResult<Option<User>> {
    self.fail()
  }

  async fn delete_user(&self, _user_id: i32) -> StoreResult<UserDeletion> {
    self.fail()
  }

  async fn user_exists(&self, _user_id: i32) -> StoreResult<bool> {
    self.fail()
  }

  async fn create_order(&self, _order: &NewOrder) -> StoreResult<i32> {
    self.fail()
  }

  async fn list_orders(&self) -> StoreResult<Vec<OrderWithUser>> {
    self.fail()
  }

  async fn list_user_orders(&self, _user_id: i32) -> StoreResult<Vec<UserOrder>> {
    self.fail()
  }

  async fn close(&self) {}
}
