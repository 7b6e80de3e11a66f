use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use anyhow::Context;
use dotenvy::dotenv;
use jar_ledger::{config::Config, database::Database, handlers, services::LedgerService};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    info!("Starting jar-ledger...");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    if std::env::var("DATABASE_URL").is_err() {
        warn!(
            "DATABASE_URL not set, falling back to embedded store at {}",
            config.database.url
        );
    }

    // Initialize database
    let db = Arc::new(
        Database::connect(&config.database.url, config.database.max_connections)
            .await
            .context("Failed to connect to database")?,
    );

    info!("Database connected successfully");

    // Initialize service
    let service = Arc::new(LedgerService::new(db));
    let service_data = web::Data::new(service);

    let server_config = config.server.clone();
    info!(
        "Starting HTTP server on {}:{}",
        server_config.host, server_config.port
    );

    HttpServer::new(move || {
        App::new()
            .app_data(service_data.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(middleware::Logger::default())
            .wrap(middleware::NormalizePath::trim())
            .configure(handlers::configure_routes)
    })
    .workers(server_config.workers)
    .bind((server_config.host, server_config.port))
    .context("Failed to bind HTTP server")?
    .run()
    .await
    .context("HTTP server error")
}
