// server/src/web/handlers/user_handlers.rs

use actix_web::{web, HttpResponse};
use orders_core::validation::{parse_user_id, validate_user_payload};
use orders_core::{StoreErrorKind, UserDeletion};
use serde_json::{json, Value};
use tracing::{info, instrument, warn};

use super::json_object;
use crate::errors::AppError;
use crate::state::AppState;

const DUPLICATE_EMAIL: &str = "Email already exists";

fn user_not_found(user_id: i32) -> AppError {
  warn!("User with ID {} not found.", user_id);
  AppError::NotFound("User not found".to_string())
}

#[instrument(name = "handler::create_user", skip(app_state, payload))]
pub async fn create_user_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<Value>,
) -> Result<HttpResponse, AppError> {
  // Fields stay untyped so a wrong JSON type gets the same message as a missing field.
  let body = json_object(payload.into_inner())?;
  let new_user = validate_user_payload(body.get("name"), body.get("email"))?;

  let user_id = app_state
    .store
    .create_user(&new_user)
    .await
    .map_err(|e| AppError::conflict_on(e, StoreErrorKind::UniqueViolation, DUPLICATE_EMAIL))?;

  info!(user_id, "User created.");
  Ok(HttpResponse::Created().json(json!({
      "message": "User created",
      "user_id": user_id
  })))
}

#[instrument(name = "handler::list_users", skip(app_state))]
pub async fn list_users_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let users = app_state.store.list_users().await?;
  info!("Successfully fetched {} users.", users.len());
  Ok(HttpResponse::Ok().json(users))
}

#[instrument(name = "handler::get_user", skip(app_state, path), fields(raw_id = %path.as_str()))]
pub async fn get_user_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let user_id = parse_user_id(&path)?;

  match app_state.store.get_user(user_id).await? {
    Some(user) => Ok(HttpResponse::Ok().json(user)),
    None => Err(user_not_found(user_id)),
  }
}

#[instrument(name = "handler::update_user", skip(app_state, path, payload), fields(raw_id = %path.as_str()))]
pub async fn update_user_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
  payload: web::Json<Value>,
) -> Result<HttpResponse, AppError> {
  let user_id = parse_user_id(&path)?;
  // Fields stay untyped so a wrong JSON type gets the same message as a missing field.
  let body = json_object(payload.into_inner())?;
  let new_user = validate_user_payload(body.get("name"), body.get("email"))?;

  let updated = app_state
    .store
    .update_user(user_id, &new_user)
    .await
    .map_err(|e| AppError::conflict_on(e, StoreErrorKind::UniqueViolation, DUPLICATE_EMAIL))?;

  match updated {
    Some(user) => {
      info!(user_id, "User updated.");
      Ok(HttpResponse::Ok().json(json!({
          "message": "User updated",
          "user": user
      })))
    }
    None => Err(user_not_found(user_id)),
  }
}

#[instrument(name = "handler::delete_user", skip(app_state, path), fields(raw_id = %path.as_str()))]
pub async fn delete_user_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let user_id = parse_user_id(&path)?;

  match app_state.store.delete_user(user_id).await? {
    UserDeletion::Deleted(user) => {
      info!(user_id, "User deleted.");
      Ok(HttpResponse::Ok().json(json!({
          "message": "User deleted",
          "user": user
      })))
    }
    UserDeletion::HasOrders => {
      warn!(user_id, "Refusing to delete user with existing orders.");
      Err(AppError::Validation("Cannot delete user with existing orders".to_string()))
    }
    UserDeletion::NotFound => Err(user_not_found(user_id)),
  }
}
