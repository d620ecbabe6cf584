/*
 * Responsibility
 * - Config 読み込み → ServiceHandle bootstrap (1 回だけ, deadline 付き) → Router 組み立て
 * - Middleware の適用 (HTTP layers → CORS → routing → bearer)
 * - axum::serve() で起動
 */
use anyhow::Result;
use axum::Router;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    api::{self, RouteError},
    bootstrap::{self, Bootstrap},
    config::Config,
    middleware,
    state::{AppState, LoginSettings},
};

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,grammarhive_api=trace,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new("info,grammarhive_api=debug,tower_http=info")
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

pub async fn run() -> Result<()> {
    init_tracing();

    let config = Config::from_env()?;
    tracing::info!(
        "starting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    // Fatal on failure: nothing is served with a half-built handle.
    let service_bootstrap = Bootstrap::new(config.bootstrap_timeout);
    let services = service_bootstrap
        .get_or_init(|| bootstrap::initialize(&config))
        .await
        .inspect_err(|err| tracing::error!(error = %err, "bootstrap failed"))?;

    let state = AppState::new(services, LoginSettings::from(&config.auth));
    let app = build_router(state, &config)?;

    let listener = TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("shut down");
    Ok(())
}

/// Full request pipeline: HTTP layers → CORS preflight → route match → bearer gate → handler.
pub fn build_router(state: AppState, config: &Config) -> Result<Router, RouteError> {
    let router = api::api_routes()?.into_router(state);
    let router = middleware::cors::apply(router, config.app_env, &config.cors_allowed_origins);
    Ok(middleware::http::apply(router, &config.http))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
