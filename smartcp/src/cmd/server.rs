use crate::{
    cmd::{connect_database, create_codeforces_client, stats_offset},
    modules::handlers::{liveness, readiness, stats::stats, user, welcome},
};
use anyhow::{Context, Result};
use axum::{extract::Extension, routing, Router, Server};
use clap::Args;
use http::{header::CONTENT_TYPE, HeaderValue, Method};
use smartcp_libs::{store::PgUserStore, Dashboard};
use std::{env, net::SocketAddr, sync::Arc};
use tower_http::cors::{AllowOrigin, CorsLayer};

#[derive(Debug, Args)]
pub struct ServerArgs {
    #[arg(long)]
    port: Option<u16>,
}

pub async fn run(args: ServerArgs) -> Result<()> {
    let pool = connect_database().await?;
    let client = create_codeforces_client()?;
    let offset = stats_offset()?;

    let dashboard = Dashboard::new(Arc::new(client), Arc::new(PgUserStore::new(pool)))
        .with_offset(offset);
    dashboard.ping().await.with_context(|| {
        let message = "user store is not available";
        tracing::error!(message);
        message
    })?;

    let mut app = create_router(Arc::new(dashboard));
    if let Ok(origin) = env::var("FRONTEND_ORIGIN_URL") {
        let origin: HeaderValue = origin.parse().with_context(|| {
            let message = format!("invalid FRONTEND_ORIGIN_URL `{}`", origin);
            tracing::error!(message);
            message
        })?;
        tracing::info!("CORS enabled for origin {:?}", origin);
        app = app.layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::exact(origin))
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([CONTENT_TYPE])
                .allow_credentials(true),
        );
    }

    let port = match args.port {
        Some(port) => port,
        None => {
            tracing::warn!("API server will be launched at default port number 8000");
            8000u16
        }
    };
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Server start at port {}", port);
    Server::bind(&addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .with_context(|| {
            let message = "server terminated unexpectedly";
            tracing::error!(message);
            message
        })?;

    Ok(())
}

pub fn create_router(dashboard: Arc<Dashboard>) -> Router {
    Router::new()
        .route("/", routing::get(welcome))
        .route("/api/liveness", routing::get(liveness))
        .route("/api/readiness", routing::get(readiness))
        .route("/api/users/:user_name/profile", routing::get(user::profile))
        .route("/api/users/:user_name/stats", routing::get(stats))
        .route(
            "/api/users/:user_name/submissions",
            routing::get(user::submissions),
        )
        .route(
            "/api/users/:user_name/new-failed-submissions",
            routing::get(user::new_failed_submissions),
        )
        .route(
            "/api/users/:user_name/update-last-checked",
            routing::post(user::update_last_checked),
        )
        .route(
            "/api/users/:user_name/suggestions",
            routing::get(user::suggestions),
        )
        .layer(Extension(dashboard))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler.");
    };

    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown.");
}
