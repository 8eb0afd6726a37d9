//! Inference HTTP service

pub mod error;
pub mod handlers;
pub mod state;

use actix_web::{error::JsonPayloadError, web, HttpRequest};

pub use error::ApiError;
pub use handlers::{HealthcheckOutput, ListingOutput};
pub use state::AppState;

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::BadRequest(err.to_string()).into()
}

/// Registers the inference routes. The caller provides `web::Data<AppState>`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .route("/health", web::get().to(handlers::health))
        .route("/inference", web::post().to(handlers::inference));
}
