// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTTP handlers for the contact form service.
//!
//! A submission moves through validation, then the per-client rate limiter,
//! then the mail transport. Each gate can turn it away; see
//! [`ContactError`] for how that maps onto a response.

use crate::config::Config;
use crate::error::ContactError;
use crate::limiter::{RateLimitResult, RateLimiter};
use crate::mailer::MailTransport;
use crate::metrics::ContactMetrics;
use crate::validator::{self, ContactSubmission};
use axum::{
    extract::{rejection::JsonRejection, ConnectInfo, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub const SUCCESS_MESSAGE: &str = "Message sent successfully!";

/// Shared application state.
pub struct AppState {
    pub limiter: RateLimiter,
    pub mailer: Arc<dyn MailTransport>,
    pub metrics: ContactMetrics,
    pub config: Config,
}

/// Body of a successful submission.
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
    pub message: &'static str,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    /// Transport selected at startup (`smtp` or `unconfigured`)
    pub mailer: &'static str,
}

/// Health check endpoint.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "portfolio-contact",
        version: env!("CARGO_PKG_VERSION"),
        mailer: state.mailer.name(),
    })
}

/// `POST /api/contact`
pub async fn contact(
    State(state): State<Arc<AppState>>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    body: Result<Json<ContactSubmission>, JsonRejection>,
) -> Response {
    let client = client_id(
        &headers,
        connect_info.map(|ConnectInfo(addr)| addr),
        state.config.http.trust_forwarded_for,
    );

    match submit(&state, &client, body).await {
        Ok(()) => {
            state.metrics.record("sent");
            (
                StatusCode::OK,
                Json(SuccessResponse {
                    success: true,
                    message: SUCCESS_MESSAGE,
                }),
            )
                .into_response()
        }
        Err(err) => {
            state.metrics.record(err.outcome());
            err.into_response()
        }
    }
}

async fn submit(
    state: &AppState,
    client: &str,
    body: Result<Json<ContactSubmission>, JsonRejection>,
) -> Result<(), ContactError> {
    let Json(submission) = body.map_err(|rejection| {
        debug!(client, error = %rejection, "Unreadable contact form body");
        ContactError::InvalidBody
    })?;

    if let Err(err) = validator::validate(&submission) {
        info!(client, error = %err, "Validation failed");
        return Err(err.into());
    }

    if let RateLimitResult::Limited { retry_after } = state.limiter.check(client).await {
        info!(
            client,
            retry_after_secs = retry_after.as_secs(),
            "Contact form submission rate limited"
        );
        return Err(ContactError::RateLimited { retry_after });
    }

    let submission = submission.trimmed();
    match state.mailer.send(&submission).await {
        Ok(ack) => {
            info!(
                client,
                name = %submission.name,
                email = %submission.email,
                message_chars = submission.message.chars().count(),
                server_response = %ack,
                "Contact form email sent"
            );
            Ok(())
        }
        Err(err) => {
            error!(client, transport = state.mailer.name(), error = %err, "Contact form email failed");
            // The only record of an undelivered message; someone follows up by hand.
            warn!(
                target: "contact::followup",
                name = %submission.name,
                email = %submission.email,
                message = %submission.message,
                "Contact form submission (email failed)"
            );
            Err(err.into())
        }
    }
}

/// Any other method on `/api/contact`.
pub async fn method_not_allowed(State(state): State<Arc<AppState>>) -> Response {
    let err = ContactError::MethodNotAllowed;
    state.metrics.record(err.outcome());
    err.into_response()
}

/// Prometheus scrape endpoint.
pub async fn metrics(State(state): State<Arc<AppState>>) -> Response {
    state
        .metrics
        .set_tracked_clients(state.limiter.tracked_clients().await);

    match state.metrics.render() {
        Ok(text) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            text,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to encode metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Identify the submitting client for rate limiting.
///
/// Behind a proxy the first `X-Forwarded-For` hop is the visitor; otherwise
/// the peer address is used.
pub fn client_id(headers: &HeaderMap, peer: Option<SocketAddr>, trust_forwarded_for: bool) -> String {
    if trust_forwarded_for {
        let forwarded = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());

        if let Some(ip) = forwarded {
            return ip.to_string();
        }
    }

    peer.map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
