// core/src/lib.rs

//! Store layer for the users & orders service.
//!
//! The HTTP layer talks to a [`Store`] handle that it owns for the lifetime of
//! the process. Two implementations ship with the crate:
//!
//! - [`PgStore`]: PostgreSQL through an `sqlx` connection pool.
//! - [`MemoryStore`]: an in-process store enforcing the same constraints, used
//!   by tests and local experiments.
//!
//! Constraint violations surface as typed [`StoreErrorKind`]s so callers never
//! inspect engine-specific error codes.

pub mod error;
pub mod models;
pub mod store;
pub mod validation;

pub use error::{StoreError, StoreErrorKind, StoreResult};
pub use models::{NewOrder, NewUser, Order, OrderWithUser, User, UserOrder};
pub use store::{MemoryStore, PgStore, Store, UserDeletion};
pub use validation::ValidationError;
