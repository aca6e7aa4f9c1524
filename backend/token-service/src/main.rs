/// Token Service Main Entry Point
///
/// Starts the HTTP server with:
/// - PostgreSQL connection pool (bounded acquire timeout)
/// - Rotation service wired to the Postgres store and SMTP alert sink
/// - Background purge task for expired refresh-token records
use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use token_service::{
    config::Settings,
    handlers::{health_check, issue_tokens, readiness_check, refresh_tokens},
    metrics,
    openapi::ApiDoc,
    AccessTokenCodec, EmailAlertService, PgRefreshTokenStore, RefreshTokenStore, RotationService,
};
use tracing::{info, warn};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "token_service=info,info".into()),
        )
        .with_target(false)
        .init();

    info!("Starting Token Service");

    let settings = Settings::load().context("Failed to load configuration")?;
    info!("Configuration loaded successfully");

    // Initialize database connection pool
    let db_pool = PgPoolOptions::new()
        .max_connections(settings.database.max_connections)
        .acquire_timeout(Duration::from_secs(settings.database.acquire_timeout))
        .connect(&settings.database.url)
        .await
        .context("Failed to connect to PostgreSQL")?;

    info!(
        "Database pool initialized with {} max connections",
        settings.database.max_connections
    );

    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .context("Failed to run database migrations")?;
    info!("Database migrations completed");

    let store = Arc::new(PgRefreshTokenStore::new(
        db_pool.clone(),
        settings.token.refresh_ttl_days,
    ));

    let alerts = EmailAlertService::new(&settings.alert)
        .context("Failed to initialize anomaly alert service")?;
    if alerts.is_enabled() {
        info!("Anomaly alert service initialized with SMTP");
    } else {
        info!("Anomaly alert service running in no-op mode (SMTP not configured)");
    }

    let codec = AccessTokenCodec::new(&settings.jwt);

    let rotation = web::Data::new(RotationService::new(
        store.clone(),
        Arc::new(alerts),
        codec,
        settings.token.bcrypt_cost,
    ));

    spawn_purge_task(store.clone(), settings.token.purge_interval_seconds);

    let pool_data = web::Data::new(db_pool);
    let addr = (settings.server.host.clone(), settings.server.port);
    info!("HTTP server listening on {}:{}", addr.0, addr.1);

    HttpServer::new(move || {
        App::new()
            .app_data(rotation.clone())
            .app_data(pool_data.clone())
            .route("/api/v1/tokens/issue", web::post().to(issue_tokens))
            .route("/api/v1/tokens/refresh", web::post().to(refresh_tokens))
            .route("/health", web::get().to(health_check))
            .route("/readiness", web::get().to(readiness_check))
            .route("/metrics", web::get().to(metrics::metrics_handler))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind(addr)
    .context("Failed to bind HTTP listener")?
    .run()
    .await
    .context("HTTP server error")?;

    info!("Token service shutdown complete");

    Ok(())
}

/// Periodically evict refresh-token records past their TTL.
///
/// Rows are otherwise only removed when consumed, so without this task the
/// table grows without bound for clients that never refresh.
fn spawn_purge_task(store: Arc<PgRefreshTokenStore>, interval_seconds: u64) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_seconds));
        loop {
            interval.tick().await;
            match store.purge_expired().await {
                Ok(0) => {}
                Ok(purged) => info!(purged, "Purged expired refresh-token records"),
                Err(e) => warn!("Refresh-token purge failed: {}", e),
            }
        }
    });
}
