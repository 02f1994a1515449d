/*
 * Responsibility
 * - Config読み込み → 依存生成 → Router 組み立て
 * - Middleware の適用 (bearer 認証 / security headers / CORS / HTTP)
 * - axum::serve() で起動
 */
use std::{panic, process, sync::Arc};

use anyhow::Result;
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::config::Config;
use crate::error::AppError;
use crate::middleware::{self, auth::SecurityConfig};
use crate::services::auth::{AuthService, build_auth_service};
use crate::state::AppState;

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,token_resource_server=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // Always surface panics via tracing; stderr may be hidden depending on how
        // the process is launched.
        tracing::error!(?info, "panic");

        // Development: crash the whole process. Production: default hook only.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting resource server in {:?} mode on {}",
        config.app_env,
        config.addr
    );
    tracing::info!(
        public_paths = ?config.public_paths.iter().map(|p| p.as_str()).collect::<Vec<_>>(),
        issuer = ?config.auth_issuer,
        audience = ?config.auth_audience,
        algorithm = ?config.access_jwt_algorithm,
        "security configuration"
    );

    let auth = build_auth_service(&config)?;
    let app = build_router(auth, SecurityConfig::from_config(&config), &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Assemble the full application: routes, bearer security, and the
/// cross-cutting HTTP layers. Integration tests drive this directly.
pub fn build_router(auth: Arc<AuthService>, security: SecurityConfig, config: &Config) -> Router {
    let state = AppState::new(auth, security);

    let routes = Router::new()
        .merge(api::v1::operational_routes())
        .nest("/api/v1", api::v1::routes())
        .fallback(not_found);

    let router = middleware::auth::access::apply(routes, state.clone()).with_state(state);

    // Outermost last: http → cors → security headers → auth → handlers
    let router = middleware::security_headers::apply(router);
    let router = middleware::cors::apply(router, config);
    middleware::http::apply(router, config)
}

async fn not_found() -> AppError {
    AppError::not_found("route")
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("shutdown signal received"),
        Err(err) => {
            // Without a signal handler, keep serving until the process is killed.
            tracing::error!(error = %err, "failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
