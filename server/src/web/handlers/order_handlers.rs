// server/src/web/handlers/order_handlers.rs

use actix_web::{web, HttpResponse};
use orders_core::validation::{parse_user_id, validate_order_payload};
use orders_core::StoreErrorKind;
use serde_json::{json, Value};
use tracing::{info, instrument, warn};

use super::json_object;
use crate::errors::AppError;
use crate::state::AppState;

#[instrument(name = "handler::create_order", skip(app_state, payload))]
pub async fn create_order_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<Value>,
) -> Result<HttpResponse, AppError> {
  let body = json_object(payload.into_inner())?;
  let new_order = validate_order_payload(body.get("user_id"), body.get("order_total"))?;

  let order_id = app_state
    .store
    .create_order(&new_order)
    .await
    .map_err(|e| AppError::conflict_on(e, StoreErrorKind::ForeignKeyViolation, "User does not exist"))?;

  info!(order_id, user_id = new_order.user_id, "Order created.");
  Ok(HttpResponse::Created().json(json!({
      "message": "Order created",
      "order_id": order_id
  })))
}

#[instrument(name = "handler::list_orders", skip(app_state))]
pub async fn list_orders_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let orders = app_state.store.list_orders().await?;
  info!("Successfully fetched {} orders.", orders.len());
  Ok(HttpResponse::Ok().json(orders))
}

#[instrument(name = "handler::list_user_orders", skip(app_state, path), fields(raw_id = %path.as_str()))]
pub async fn list_user_orders_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let user_id = parse_user_id(&path)?;

  if !app_state.store.user_exists(user_id).await? {
    warn!("User with ID {} not found.", user_id);
    return Err(AppError::NotFound("User not found".to_string()));
  }

  let orders = app_state.store.list_user_orders(user_id).await?;
  info!(user_id, "Fetched {} orders for user.", orders.len());
  Ok(HttpResponse::Ok().json(orders))
}
