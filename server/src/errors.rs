// server/src/errors.rs

use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use futures_util::FutureExt;
use orders_core::{StoreError, StoreErrorKind, ValidationError};
use serde_json::json;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use thiserror::Error;

/// Body of every 500 that does not come from the store.
const UNHANDLED_MESSAGE: &str = "Something broke!";

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  // A constraint violation the handler recognised and gave a specific message.
  #[error("Conflict: {message}")]
  Conflict {
    message: String,
    #[source]
    source: StoreError,
  },

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Store(#[from] StoreError),

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

impl From<ValidationError> for AppError {
  fn from(err: ValidationError) -> Self {
    AppError::Validation(err.to_string())
  }
}

impl AppError {
  /// Gives a store error of `kind` a route-specific message; other errors keep the generic mapping.
  pub fn conflict_on(err: StoreError, kind: StoreErrorKind, message: &str) -> Self {
    if err.kind() == kind {
      AppError::Conflict {
        message: message.to_string(),
        source: err,
      }
    } else {
      AppError::Store(err)
    }
  }

  /// The message sent to the client. Never includes internals.
  pub fn public_message(&self) -> String {
    match self {
      AppError::Validation(m) | AppError::NotFound(m) => m.clone(),
      AppError::Conflict { message, .. } => message.clone(),
      AppError::Store(e) => match e.kind() {
        StoreErrorKind::ForeignKeyViolation => "Referenced record does not exist".to_string(),
        StoreErrorKind::UniqueViolation => "Duplicate entry".to_string(),
        StoreErrorKind::CheckViolation => "Data validation failed".to_string(),
        StoreErrorKind::Other => "Database error".to_string(),
      },
      AppError::Config(_) | AppError::Internal(_) => UNHANDLED_MESSAGE.to_string(),
    }
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Validation(_) | AppError::Conflict { .. } => StatusCode::BAD_REQUEST,
      AppError::NotFound(_) => StatusCode::NOT_FOUND,
      AppError::Store(e) if e.kind().is_constraint() => StatusCode::BAD_REQUEST,
      AppError::Store(_) | AppError::Config(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    // Log the full error when it's turned into a response
    if status.is_server_error() {
      tracing::error!(application_error = %self, "Responding with error");
    } else {
      tracing::warn!(application_error = %self, "Responding with client error");
    }
    HttpResponse::build(status).json(json!({ "error": self.public_message() }))
  }
}

/// Runs the rest of the service chain and turns a panic into an error that
/// actix answers with a plain 500.
pub async fn catch_panic<F, B>(path: String, fut: F) -> std::result::Result<ServiceResponse<B>, actix_web::Error>
where
  F: Future<Output = std::result::Result<ServiceResponse<B>, actix_web::Error>>,
{
  match AssertUnwindSafe(fut).catch_unwind().await {
    Ok(res) => res,
    Err(_) => {
      tracing::error!(path = %path, "Handler panicked");
      Err(AppError::Internal("handler panicked".to_string()).into())
    }
  }
}

// Define a Result type alias for the application
pub type Result<T, E = AppError> = std::result::Result<T, E>;
