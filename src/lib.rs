// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Portfolio contact form service
//!
//! Receives contact form submissions from the portfolio site and forwards
//! them by email:
//!
//! - Field validation (name, email, message; basic email syntax)
//! - Per-IP sliding window rate limiting (5 per 15 minutes default)
//! - SMTP delivery, with failed submissions logged for manual follow-up
//! - CORS for the site origin, health and Prometheus endpoints

pub mod config;
pub mod error;
pub mod handlers;
pub mod limiter;
pub mod mailer;
pub mod metrics;
pub mod validator;

pub use config::Config;
pub use error::ContactError;
pub use handlers::AppState;
pub use limiter::{RateLimitResult, RateLimiter};
pub use mailer::{MailError, MailMessage, MailTransport};
pub use validator::{ContactSubmission, ValidationError};

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

/// Build the service router around shared state.
pub fn router(state: Arc<AppState>) -> Router {
    // OPTIONS never reaches the method router: the CORS layer answers it.
    let contact = post(handlers::contact).fallback(handlers::method_not_allowed);

    let mut app = Router::new()
        .route("/api/contact", contact)
        .route("/health", get(handlers::health))
        .route("/healthz", get(handlers::health));

    if state.config.metrics.enabled {
        let path = state.config.metrics.path.clone();
        if usable_metrics_path(&path) {
            app = app.route(&path, get(handlers::metrics));
        } else {
            warn!(path = %path, "Unusable metrics path, metrics endpoint disabled");
        }
    }

    app.layer(cors_layer(&state.config.http.cors_allow_origin))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Routes registered before the metrics endpoint.
const FIXED_ROUTES: &[&str] = &["/api/contact", "/health", "/healthz"];

/// A metrics path must be a plain absolute path that collides with no other
/// route; axum panics on overlaps and treats `:`, `*` and braces as captures.
fn usable_metrics_path(path: &str) -> bool {
    let trimmed = path.trim_end_matches('/');
    path.starts_with('/')
        && path.len() > 1
        && !path.contains(['{', '}', ':', '*'])
        && !path.chars().any(char::is_whitespace)
        && !FIXED_ROUTES.contains(&path)
        && !FIXED_ROUTES.contains(&trimmed)
}

/// CORS policy for the contact endpoint. `*` allows any origin; otherwise a
/// comma separated list of exact origins.
fn cors_layer(allow_origin: &str) -> CorsLayer {
    let origin = if allow_origin.trim() == "*" {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = allow_origin
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .filter_map(|o| match HeaderValue::from_str(o) {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(origin = %o, "Ignoring unusable CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}
