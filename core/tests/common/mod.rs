// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use once_cell::sync::Lazy;
use orders_core::{NewOrder, NewUser, Store};
use tracing::Level;

// --- Helper for Tracing Setup (call once per test run if needed) ---
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

pub fn new_user(name: &str, email: &str) -> NewUser {
  NewUser {
    name: name.to_string(),
    email: email.to_string(),
  }
}

pub async fn create_user(store: &dyn Store, name: &str, email: &str) -> i32 {
  store
    .create_user(&new_user(name, email))
    .await
    .expect("user insert should succeed")
}

pub async fn create_order(store: &dyn Store, user_id: i32, order_total: f64) -> i32 {
  store
    .create_order(&NewOrder { user_id, order_total })
    .await
    .expect("order insert should succeed")
}
