pub mod error;
pub mod health;
pub mod openapi;
pub mod upload;

use actix_web::web;

/// Register every route of the service
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(health::configure)
        .configure(upload::configure)
        .configure(openapi::configure);
}
