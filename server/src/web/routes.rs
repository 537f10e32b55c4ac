// server/src/web/routes.rs

use actix_web::error::JsonPayloadError;
use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::json;

use crate::errors::AppError;
use crate::web::handlers::{order_handlers, user_handlers};

async fn welcome_handler() -> HttpResponse {
  HttpResponse::Ok().json(json!({ "status": 200, "message": "Welcome to the orders API" }))
}

pub async fn not_found_handler() -> Result<HttpResponse, AppError> {
  Err(AppError::NotFound("Not found".to_string()))
}

// Unparsable bodies never reach a handler; non-object bodies are rejected by `handlers::json_object`.
fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
  tracing::warn!(error = %err, "Rejected request body.");
  AppError::Validation("Invalid JSON payload".to_string()).into()
}

// This function will be called by `build_app` to configure services for the Actix App.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg
    .app_data(web::JsonConfig::default().error_handler(json_error_handler))
    .route("/", web::get().to(welcome_handler))
    .service(
      web::scope("/users")
        .route("", web::post().to(user_handlers::create_user_handler))
        .route("", web::get().to(user_handlers::list_users_handler))
        .route("/{id}", web::get().to(user_handlers::get_user_handler))
        .route("/{id}", web::put().to(user_handlers::update_user_handler))
        .route("/{id}", web::delete().to(user_handlers::delete_user_handler))
        .route("/{id}/orders", web::get().to(order_handlers::list_user_orders_handler)),
    )
    .service(
      web::scope("/orders")
        .route("", web::post().to(order_handlers::create_order_handler))
        .route("", web::get().to(order_handlers::list_orders_handler)),
    );
}
