// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Portfolio Contact Service
//!
//! Serves `POST /api/contact` for the portfolio site.
//!
//! ## Configuration
//!
//! Configuration is loaded from environment variables (a `.env` file in the
//! working directory is read first if present):
//!
//! - `BIND_ADDR`: Server bind address (default: 0.0.0.0:8080)
//! - `SMTP_HOST`, `SMTP_PORT`, `SMTP_USER`, `SMTP_PASS`: outbound mail server
//! - `CONTACT_EMAIL`: where submissions are delivered (default: `SMTP_USER`)
//! - `RATE_LIMIT_WINDOW`: window in milliseconds (default: 900000)
//! - `RATE_LIMIT_MAX_REQUESTS`: submissions per IP per window (default: 5)
//! - `TRUST_FORWARDED_FOR`: key clients by `X-Forwarded-For` (default: true)
//! - `CORS_ALLOW_ORIGIN`: allowed origin(s) (default: *)
//! - `METRICS_ENABLED` / `METRICS_PATH`: Prometheus endpoint (default: on, /metrics)

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use portfolio_contact::{
    config::Config, handlers::AppState, limiter::RateLimiter, mailer, metrics::ContactMetrics,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    if let Ok(path) = dotenv {
        info!(path = %path.display(), "Loaded environment file");
    }

    let config = Config::from_env();
    info!(
        bind_addr = %config.bind_addr,
        window_ms = config.rate_limit.window_ms,
        max_requests = config.rate_limit.max_requests,
        trust_forwarded_for = config.http.trust_forwarded_for,
        "Starting portfolio contact service"
    );

    let mailer = mailer::from_config(&config.smtp);
    match mailer.verify().await {
        Ok(()) => info!(transport = mailer.name(), "Mail transport ready"),
        Err(e) => warn!(transport = mailer.name(), error = %e, "Mail transport check failed"),
    }

    let state = Arc::new(AppState {
        limiter: RateLimiter::new(config.rate_limit.clone()),
        mailer,
        metrics: ContactMetrics::new()?,
        config: config.clone(),
    });

    // Spawn cleanup task
    let cleanup_state = state.clone();
    let cleanup_every = config.rate_limit.cleanup_interval();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(cleanup_every);
        loop {
            interval.tick().await;
            cleanup_state.limiter.cleanup().await;
        }
    });

    let app = portfolio_contact::router(state);

    // Start server
    let addr: SocketAddr = config.bind_addr.parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Server listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
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

    info!("Shutdown signal received");
}
