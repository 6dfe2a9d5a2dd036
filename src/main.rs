use actix_cors::Cors;
use actix_web::{http::header, web, App, HttpServer};
use anyhow::Context;
use storage_api::config::{Config, LogFormat, SecurityConfig};
use storage_api::core::storage;
use storage_api::core::traits::Service;
use storage_api::middleware::RateLimiter;
use storage_api::modules::{self, auth::SeedData};
use storage_api::AppState;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "storage_api=debug,actix_web=info".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

fn cors(security: &SecurityConfig) -> Cors {
    security
        .cors_allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
        .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(3600)
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    init_tracing(config.app.log_format);
    config.validate().context("Configuration validation failed")?;

    tracing::info!("Starting Storage API");
    tracing::info!("Environment: {}", config.app.env);

    let repositories = storage::connect(&config.database)
        .await
        .context("Failed to open storage")?;

    let state = AppState::new(
        repositories,
        config.jwt.clone(),
        config.storage.images_path.clone(),
    );
    state
        .product_service()
        .initialize()
        .await
        .context("Failed to prepare image directory")?;

    if let Some(seed_file) = &config.storage.seed_file {
        let raw = tokio::fs::read_to_string(seed_file)
            .await
            .with_context(|| format!("Failed to read seed file {}", seed_file.display()))?;
        let seed: SeedData = serde_yaml::from_str(&raw).context("Invalid seed file")?;
        state
            .auth_service()
            .seed(&seed)
            .await
            .context("Failed to seed users")?;
        tracing::info!(users = seed.users.len(), "Seed data applied");
    }

    let login_limiter = RateLimiter::new(config.security.login_rate_limit_per_minute);
    let security = config.security.clone();
    let data = web::Data::new(state);

    // Start HTTP server
    let bind_address = config.server.bind_address();
    let server = HttpServer::new(move || {
        let limiter = login_limiter.clone();
        App::new()
            .wrap(cors(&security))
            .wrap(TracingLogger::default())
            .app_data(data.clone())
            .configure(|cfg| modules::configure(cfg, limiter))
    })
    .workers(config.server.workers)
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .run();

    tracing::info!(
        workers = config.server.workers,
        "Server started at http://{}",
        bind_address
    );

    server.await?;
    Ok(())
}
