//! # Tandang API Server
//!
//! The main entry point for the Actix-web HTTP server.

use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

mod config;
mod handlers;
mod middleware;
mod oauth;
mod observability;
mod sessions;
mod state;
mod telemetry;

use config::AppConfig;
use oauth::GithubIdentityProvider;
use observability::RequestIdMiddleware;
use state::AppState;
use tandang_core::ports::{IdentityProvider, TokenService};
use tandang_infra::JwtTokenService;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    telemetry::init_telemetry(&telemetry::TelemetryConfig::from_env());

    // Load configuration
    let config = AppConfig::from_env();

    tracing::info!(
        "Starting Tandang API Server on {}:{}",
        config.host,
        config.port
    );

    // Build application state and the auth services
    let state = AppState::new(&config).await.map_err(std::io::Error::other)?;
    let token_service: Arc<dyn TokenService> = Arc::new(JwtTokenService::from_env());
    let identity_provider: Arc<dyn IdentityProvider> =
        Arc::new(GithubIdentityProvider::new(config.oauth.clone()));

    // Start HTTP server
    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(RequestIdMiddleware)
            .app_data(web::PayloadConfig::new(handlers::MAX_UPLOAD_BYTES))
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(token_service.clone()))
            .app_data(web::Data::new(identity_provider.clone()))
            .configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
