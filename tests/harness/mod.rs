// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Shared fixtures for driving the contact router in tests.
//!
//! Requests go through the full router with `tower::ServiceExt::oneshot`,
//! so CORS, routing and extraction behave as in production. Mail is
//! captured by in-memory transports instead of an SMTP server.

#![allow(dead_code)]

pub mod floods;
pub mod generators;
pub mod mailers;

use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use portfolio_contact::{
    config::{Config, RateLimitConfig},
    handlers::AppState,
    limiter::RateLimiter,
    mailer::MailTransport,
    metrics::ContactMetrics,
    ContactSubmission,
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

/// A router plus handles on its state.
pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
}

/// Response pieces tests look at.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestApp {
    pub fn new(config: Config, mailer: Arc<dyn MailTransport>) -> Self {
        let state = Arc::new(AppState {
            limiter: RateLimiter::new(config.rate_limit.clone()),
            mailer,
            metrics: ContactMetrics::new().expect("metrics registry"),
            config,
        });

        Self {
            router: portfolio_contact::router(state.clone()),
            state,
        }
    }

    /// Default configuration with a custom rate limit.
    pub fn with_limit(max_requests: u32, window_ms: u64, mailer: Arc<dyn MailTransport>) -> Self {
        let config = Config {
            rate_limit: RateLimitConfig {
                max_requests,
                window_ms,
                ..Default::default()
            },
            ..Default::default()
        };
        Self::new(config, mailer)
    }

    pub async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// POST a submission as JSON from `client_ip`.
    pub async fn submit(&self, submission: &ContactSubmission, client_ip: &str) -> TestResponse {
        let body = serde_json::to_string(submission).expect("serializable submission");
        self.request(contact_request(Method::POST, client_ip, Body::from(body)))
            .await
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        let request = Request::builder()
            .method(Method::GET)
            .uri(path)
            .body(Body::empty())
            .expect("valid request");
        self.request(request).await
    }
}

/// A request to `/api/contact` carrying a JSON body and forwarded client IP.
pub fn contact_request(method: Method, client_ip: &str, body: Body) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri("/api/contact")
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-forwarded-for", client_ip)
        .body(body)
        .expect("valid request")
}

pub fn ada() -> ContactSubmission {
    ContactSubmission::new("Ada", "ada@example.com", "Hello")
}
