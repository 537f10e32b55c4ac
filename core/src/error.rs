// core/src/error.rs
use thiserror::Error;

/// Engine-independent classification of a store failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
  ForeignKeyViolation,
  UniqueViolation,
  CheckViolation,
  Other,
}

impl StoreErrorKind {
  /// Constraint violations are caused by client input; everything else is ours.
  pub fn is_constraint(self) -> bool {
    !matches!(self, StoreErrorKind::Other)
  }
}

#[derive(Debug, Error)]
pub enum StoreError {
  #[error("Foreign key violation: {0}")]
  ForeignKeyViolation(String),

  #[error("Unique violation: {0}")]
  UniqueViolation(String),

  #[error("Check violation: {0}")]
  CheckViolation(String),

  #[error("Database error: {0}")]
  Database(#[source] sqlx::Error),
}

impl StoreError {
  pub fn kind(&self) -> StoreErrorKind {
    match self {
      StoreError::ForeignKeyViolation(_) => StoreErrorKind::ForeignKeyViolation,
      StoreError::UniqueViolation(_) => StoreErrorKind::UniqueViolation,
      StoreError::CheckViolation(_) => StoreErrorKind::CheckViolation,
      StoreError::Database(_) => StoreErrorKind::Other,
    }
  }
}

// Classification goes through sqlx's own ErrorKind, never through SQLSTATE strings.
impl From<sqlx::Error> for StoreError {
  fn from(err: sqlx::Error) -> Self {
    let classified = err.as_database_error().map(|db_err| (db_err.kind(), db_err.message().to_string()));
    match classified {
      Some((sqlx::error::ErrorKind::ForeignKeyViolation, message)) => StoreError::ForeignKeyViolation(message),
      Some((sqlx::error::ErrorKind::UniqueViolation, message)) => StoreError::UniqueViolation(message),
      Some((sqlx::error::ErrorKind::CheckViolation, message)) => StoreError::CheckViolation(message),
      _ => StoreError::Database(err),
    }
  }
}

pub type StoreResult<T, E = StoreError> = std::result::Result<T, E>;
