use actix_web::web;

use crate::error::AppError;
use crate::handlers::pages;

pub mod auth;
pub mod contracts;
pub mod health;
pub mod shifts;

pub fn configure(cfg: &mut web::ServiceConfig) {
    // Malformed bodies get the same JSON envelope as every other error
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(err.to_string()).into()
    }))
    .route("/", web::get().to(pages::home))
    .configure(health::configure)
    .service(
        web::scope("/api/v1")
            .configure(auth::configure)
            .configure(contracts::configure)
            .configure(shifts::configure),
    );
}
