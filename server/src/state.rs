// server/src/state.rs
use orders_core::Store;
use std::sync::Arc;

/// Shared by every handler through `web::Data`. The store is opened at startup
/// and closed by `main` after the HTTP server stops.
#[derive(Clone)]
pub struct AppState {
  pub store: Arc<dyn Store>,
}

impl AppState {
  pub fn new(store: Arc<dyn Store>) -> Self {
    Self { store }
  }
}
