mod api_doc;
mod assistant;
mod auth;
mod cache;
mod classifier;
mod comment;
mod config;
mod controller;
mod db;
mod images;
mod notification;
mod post;
mod routes;
mod schema_ext;
mod user;
mod websocket;

use dotenv::dotenv;
use redis::Client;
use sqlx::postgres::PgPoolOptions;
use std::{net::SocketAddr, sync::Arc};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::assistant::{gemini::GeminiClient, TravelAssistant};
use crate::auth::jwt::IdTokenService;
use crate::cache::redis::RedisCache;
use crate::classifier::ClassifierHandle;
use crate::config::AppConfig;
use crate::routes::AppState;

const PORT_ATTEMPTS: u16 = 5;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if it exists; RUST_LOG may come from it
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(config::log_filter()))
        .init();

    let config = AppConfig::from_env()?;

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await?;

    if !db::check_db_initialized(&pool).await {
        info!("Database schema missing, initializing");
        db::init_db(&pool).await?;
    }

    let redis_cache = match &config.redis_url {
        Some(url) => match Client::open(url.as_str()) {
            Ok(client) => {
                info!("Redis cache and pub/sub enabled");
                Some(RedisCache::new(client, None))
            }
            Err(e) => {
                error!("Failed to connect to Redis: {}", e);
                None
            }
        },
        None => {
            info!("No Redis URL configured, notifications stay in-process");
            None
        }
    };

    let classifier = ClassifierHandle::load(&config.model_path);

    let assistant: Option<Arc<dyn TravelAssistant>> = match &config.gemini_api_key {
        Some(key) => match GeminiClient::new(key.clone(), config.gemini_model.clone()) {
            Ok(client) => Some(Arc::new(client)),
            Err(e) => {
                error!("Failed to build Gemini client: {}", e);
                None
            }
        },
        None => {
            warn!("GEMINI_API_KEY not set, AI captions and recommendations disabled");
            None
        }
    };

    let tokens = Arc::new(IdTokenService::new(
        &config.id_token_secret,
        &config.firebase_project_id,
    ));

    let app = routes::app(AppState::new(
        pool,
        redis_cache,
        tokens,
        classifier,
        assistant,
    ));

    // Walk forward from the configured port until one binds
    let mut port = config.port;
    for attempt in 1..=PORT_ATTEMPTS {
        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        match axum::Server::try_bind(&addr) {
            Ok(server) => {
                info!("🚀 Server listening on http://localhost:{}", port);
                info!("📄 API documentation: http://localhost:{}/docs", port);
                info!(
                    "🔌 Notifications: ws://localhost:{}/api/notifications/ws?token=<ID token>",
                    port
                );
                return server
                    .serve(app.into_make_service())
                    .await
                    .map_err(|e| e.into());
            }
            Err(e) => {
                warn!("Port {} unavailable ({}), attempt {}/{}", port, e, attempt, PORT_ATTEMPTS);
                port = port.saturating_add(1);
            }
        }
    }

    Err("Failed to bind to any port".into())
}
