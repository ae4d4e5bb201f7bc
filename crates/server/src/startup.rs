use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use dotenvy::dotenv;
use migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tracing::info;

use configs::AppConfig;
use service::booking::BookingService;
use service::notifier::{LogNotifier, Notifier};

use crate::auth::ServerState;
use crate::routes;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Connect, migrate, and assemble the router from a validated config.
pub async fn build_app(cfg: &AppConfig) -> anyhow::Result<Router> {
    let db = models::db::connect(&cfg.database).await?;
    migration::Migrator::up(&db, None).await?;
    info!("migrations applied");

    let notifier: Arc<dyn Notifier> = Arc::new(LogNotifier {
        from_email: cfg.notifications.from_email.clone(),
        contact_email: cfg.notifications.contact_email.clone(),
    });
    let state = ServerState {
        db,
        jwt_secret: cfg.auth.jwt_secret.clone(),
        booking: Arc::new(BookingService::new(notifier.clone())),
        notifier,
    };
    Ok(routes::build_router(state, build_cors()))
}

/// Public entry: load config, build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    let cfg = AppConfig::load_and_validate()?;
    let app = build_app(&cfg).await?;

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    info!(%addr, "starting salon booking server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
