mod api;
mod app_state;
mod config;
mod database;
mod middleware;
mod models;
mod seeds;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{http::header, middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::metrics::Metrics;
use crate::app_state::AppState;
use crate::config::AppConfig;
use crate::services::auth_service::JwtKeys;
use crate::services::{DiscoveryClient, SuggestionClient};

fn startup_error(context: &str, err: impl std::fmt::Display) -> std::io::Error {
    log::error!("❌ {}: {}", context, err);
    std::io::Error::new(std::io::ErrorKind::Other, format!("{}: {}", context, err))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(|e| startup_error("Invalid configuration", e))?;

    log::info!("🚀 Starting InfluenceFinder...");

    if config.discovery.api_key.is_none() {
        log::warn!("⚠️  RAPIDAPI_KEY is not set, searches will fail until it is configured");
    }
    if config.suggestions.api_key.is_none() {
        log::warn!("⚠️  GEMINI_API_KEY is not set, suggestions are disabled");
    }

    // Initialize MongoDB connection
    let db = database::MongoDB::new(&config.database_url)
        .await
        .map_err(|e| startup_error("Failed to connect to MongoDB", e))?;
    log::info!("✅ MongoDB connected successfully");

    let db = Arc::new(db);

    // 🌱 Bootstrap admin
    if let Err(e) = seeds::admin_seed::seed_admin(
        db.as_ref(),
        config.admin_email.as_deref(),
        config.admin_password.as_deref(),
        config.auth.bcrypt_cost,
    )
    .await
    {
        log::error!("❌ Failed to seed admin account: {}", e);
    }

    let state = AppState {
        influencers: db.clone(),
        users: db,
        discovery: DiscoveryClient::new(config.discovery.clone())
            .map_err(|e| startup_error("Failed to build discovery client", e))?,
        suggestions: SuggestionClient::new(config.suggestions.clone())
            .map_err(|e| startup_error("Failed to build suggestion client", e))?,
        keys: JwtKeys::new(&config.auth),
        auth: config.auth.clone(),
        metrics: Arc::new(Metrics::default()),
    };
    let state_data = web::Data::new(state);

    let host = config.host.clone();
    let port = config.port;
    let allowed_origins = config.allowed_origins.clone();

    log::info!("🌐 Server starting on {}:{}", host, port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", host, port);
    log::info!("📄 OpenAPI spec at: http://{}:{}/api-docs/openapi.json", host, port);

    // Start HTTP server
    HttpServer::new(move || {
        let cors = allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "POST", "PATCH", "DELETE", "OPTIONS"])
            .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
            .expose_headers(vec![header::CONTENT_TYPE, header::CONTENT_DISPOSITION])
            .supports_credentials()
            .max_age(3600);

        // Generate OpenAPI specification
        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(state_data.clone())
            .wrap(cors)
            .wrap(middleware::SecurityHeaders)
            .wrap(Logger::default())
            .service(SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi))
            .configure(api::routes::configure)
    })
    .bind(format!("{}:{}", host, port))?
    .run()
    .await
}
