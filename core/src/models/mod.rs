// core/src/models/mod.rs

//! Contains data structures representing database entities.

pub mod order;
pub mod user;

pub use order::{NewOrder, Order, OrderWithUser, UserOrder};
pub use user::{NewUser, User};
