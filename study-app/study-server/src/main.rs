use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::http::{header, HeaderValue, Method};
use tower_http::{cors::CorsLayer, services::ServeDir};
use tracing::info;

use study_api::{build_router, AppState, Repositories};
use study_infrastructure::{
    create_pool, LocalObjectStorage, LogResetNotifier, MemoryForgotPasswordRepository,
    MemoryRefreshTokenRepository, MemoryUserRepository, PgForgotPasswordRepository,
    PgRefreshTokenRepository, PgUserRepository,
};
use study_shared::config::{AppConfig, DatabaseDriver, DatabaseSettings};

async fn repositories(settings: &DatabaseSettings) -> anyhow::Result<Repositories> {
    match settings.driver {
        DatabaseDriver::Postgres => {
            info!("Connecting to database...");
            let pool = create_pool(&settings.url, settings.max_connections, settings.min_connections)
                .await
                .context("connecting to database")?;
            info!("Database connection established.");

            Ok(Repositories {
                users: Arc::new(PgUserRepository::new(pool.clone())),
                refresh_tokens: Arc::new(PgRefreshTokenRepository::new(pool.clone())),
                reset_codes: Arc::new(PgForgotPasswordRepository::new(pool)),
            })
        }
        DatabaseDriver::Memory => {
            info!("Using in-memory repositories; data is lost on shutdown");
            Ok(Repositories {
                users: Arc::new(MemoryUserRepository::new()),
                refresh_tokens: Arc::new(MemoryRefreshTokenRepository::new()),
                reset_codes: Arc::new(MemoryForgotPasswordRepository::new()),
            })
        }
    }
}

fn cors(origin: &str) -> anyhow::Result<CorsLayer> {
    let origin: HeaderValue = origin.parse().context("invalid app.cors_origin")?;
    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("loading configuration")?;

    // Guard flushes the file appender on drop
    let _log_guard = study_shared::telemetry::init_telemetry(&config.log)?;

    info!("{} starting ({})", config.app.name, config.app.env);

    let repos = repositories(&config.database).await?;
    let storage = LocalObjectStorage::new(&config.storage.root, &config.storage.public_base_url);
    tokio::fs::create_dir_all(&config.storage.root)
        .await
        .with_context(|| format!("creating storage root {}", config.storage.root))?;

    let uploads_mount = config.storage.public_base_url.clone();
    let uploads_dir = config.storage.root.clone();
    let cors = cors(&config.app.cors_origin)?;
    let host: std::net::IpAddr = config.app.host.parse().context("invalid app.host")?;
    let addr = SocketAddr::from((host, config.app.port));

    let state = AppState::new(config, repos, Arc::new(storage), Arc::new(LogResetNotifier));

    let mut app = build_router(state);
    // Avatars are served from disk when their public URL is a local path
    if uploads_mount.starts_with('/') {
        app = app.nest_service(&uploads_mount, ServeDir::new(uploads_dir));
    }
    let app = app.layer(cors);

    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
