// server/src/lib.rs

//! HTTP surface of the users & orders service.
//!
//! [`build_app`] assembles the actix-web application around an [`AppState`];
//! the binary in `main.rs` binds it to a socket, tests drive it in-process.

pub mod config;
pub mod errors;
pub mod state;
pub mod web;

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{web as actix_data, App};

pub use crate::config::AppConfig;
pub use crate::errors::{AppError, Result};
pub use crate::state::AppState;

/// Builds the application: routes, JSON error handling, panic guard and request tracing.
pub fn build_app(
  app_state: AppState,
) -> App<
  impl ServiceFactory<
    ServiceRequest,
    Config = (),
    Response = ServiceResponse<impl MessageBody>,
    Error = actix_web::Error,
    InitError = (),
  >,
> {
  App::new()
    .app_data(actix_data::Data::new(app_state)) // Share AppState with handlers
    .configure(web::configure_app_routes)
    .default_service(actix_data::to(web::routes::not_found_handler))
    .wrap_fn(|req, srv| {
      // Routing needs sole ownership of the request, so only the path is kept for logging.
      let path = req.path().to_owned();
      errors::catch_panic(path, srv.call(req))
    })
    .wrap(tracing_actix_web::TracingLogger::default()) // Actix middleware for tracing requests
}
