use actix_web::{App, HttpServer};
use chrono::Utc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod app;
mod feed;
mod model;
mod service;

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

    let config = Config::from_env();
    let bind_addr = config.bind_addr();

    let state = AppState::new(&config);

    // Optional scheduled export of the full threat report to disk
    if let Some(interval) = config.export_interval {
        let threat_service = state.threat_service.clone();
        let plan_store = state.plan_store.clone();

        tracing::info!(interval_secs = interval.as_secs(), "Starting threat report export job");

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                let report = threat_service.threat_report().await;
                if let Err(e) = plan_store.export_report(&report, Utc::now()).await {
                    tracing::error!(error = %e, "Failed to export threat report");
                }
            }
        });
    }

    tracing::info!("Starting threatfeed-intel server on {}", bind_addr);

    HttpServer::new(move || {
        App::new()
            .app_data(state.threat_service.clone())
            .app_data(state.mitigation_service.clone())
            .app_data(state.plan_store.clone())
            .app_data(state.dependencies.clone())
            .configure(api::dashboard::configure)
            .configure(api::threats::configure)
            .configure(api::mitigation::configure)
            .configure(api::health::configure)
            .configure(api::openapi::configure)
    })
    .bind(&bind_addr)?
    .run()
    .await
}
