use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use dotenv::dotenv;
use tracing::info;

use listing_price_classifier::config::Settings;
use listing_price_classifier::model_store::MsgpackModelStore;
use listing_price_classifier::server::{self, AppState};
use listing_price_classifier::telemetry;

lazy_static::lazy_static! {
    static ref SETTINGS: Settings = Settings::from_env();
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables from .env file
    dotenv().ok();
    telemetry::init_tracing();

    // The model is read on the first inference request
    let store = Arc::new(MsgpackModelStore::new(&SETTINGS.model_path));
    let state = web::Data::new(AppState::new(store));

    info!("Starting server at http://{}:{}", SETTINGS.host, SETTINGS.port);
    info!("Model path: {}", SETTINGS.model_path.display());

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .configure(server::configure)
    })
    .bind((SETTINGS.host.as_str(), SETTINGS.port))?
    .run()
    .await
}
