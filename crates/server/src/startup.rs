use std::{future::Future, net::SocketAddr, sync::Arc};

use axum::{http::HeaderValue, Router};
use configs::{AppConfig, ServerConfig};
use migration::MigratorTrait;
use service::bank_account::{BankAccountService, SeaOrmBankAccountRepository};
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{info, warn};

use crate::{routes, state::ServerState};

/// Browser clients are served from a different origin; with no configured
/// origins every origin is allowed.
pub fn build_cors(server: &ServerConfig) -> anyhow::Result<CorsLayer> {
    if server.cors_allowed_origins.is_empty() {
        return Ok(CorsLayer::very_permissive());
    }
    let origins = server
        .cors_allowed_origins
        .iter()
        .map(|o| HeaderValue::from_str(o))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any))
}

fn bind_addr(cfg: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", cfg.server.host, cfg.server.port).parse()?)
}

/// Connect the pool, apply migrations if configured, and wire repository -> service -> state.
pub async fn build_state(cfg: &AppConfig) -> anyhow::Result<ServerState> {
    let db = models::db::connect_with_config(&cfg.database).await?;
    if cfg.database.run_migrations {
        migration::Migrator::up(&db, None).await?;
        info!(event = "migrations_applied", "database schema up to date");
    }
    let repo = Arc::new(SeaOrmBankAccountRepository);
    Ok(ServerState::new(BankAccountService::new(db, repo)))
}

pub fn build_app(cfg: &AppConfig, state: ServerState) -> anyhow::Result<Router> {
    Ok(routes::build_router(state, &cfg.server.base_path, build_cors(&cfg.server)?))
}

/// Resolves on Ctrl+C; a failing signal handler only disables graceful shutdown.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for ctrl_c; graceful shutdown disabled");
        std::future::pending::<()>().await;
    }
    info!(event = "shutdown_signal", "received Ctrl+C, draining connections");
}

/// Serve until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    Ok(())
}

/// Build the app from `cfg` and serve it until Ctrl+C.
pub async fn run_with_config(cfg: AppConfig) -> anyhow::Result<()> {
    let state = build_state(&cfg).await?;
    let app = build_app(&cfg, state)?;

    let addr = bind_addr(&cfg)?;
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, base_path = %cfg.server.base_path, "bank account service listening");
    serve(listener, app, shutdown_signal()).await
}
