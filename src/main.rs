use actix_web::{App, HttpServer, web};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod app;
mod model;
mod service;

#[cfg(test)]
mod test_support;

use app::AppState;
use model::Config;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present (ignore if missing)
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().map_err(|e| {
        tracing::error!(error = %e, "Invalid configuration");
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;
    let bind_addr = config.bind_addr();

    let state = AppState::new(config).map_err(|e| {
        tracing::error!(error = %e, "Failed to initialize services");
        std::io::Error::other(e)
    })?;

    let import_service = web::Data::from(state.import_service);
    let upload_settings = web::Data::new(state.upload);

    tracing::info!("App is listening for requests on {}", bind_addr);

    HttpServer::new(move || {
        App::new()
            .app_data(import_service.clone())
            .app_data(upload_settings.clone())
            .configure(api::configure)
    })
    .bind(&bind_addr)?
    .run()
    .await
}
