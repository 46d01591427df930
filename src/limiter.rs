// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Sliding window rate limiter for contact form submissions.
//!
//! Each client keeps the timestamps of its admitted submissions. On every
//! check, timestamps that left the window are dropped first; the request is
//! admitted only while fewer than `max_requests` remain. Rejected requests
//! are not recorded.
//!
//! State lives in process memory and is not shared between instances.

use crate::config::RateLimitConfig;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

/// Result of a rate limit check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateLimitResult {
    /// Request is allowed
    Allowed {
        /// Submissions still available in the current window
        remaining: u32,
    },
    /// Request is rate limited
    Limited {
        /// Time until the oldest recorded submission leaves the window
        retry_after: Duration,
    },
}

impl RateLimitResult {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitResult::Allowed { .. })
    }
}

/// Admission timestamps for one client, oldest first.
#[derive(Debug, Default)]
struct Window {
    hits: VecDeque<Instant>,
}

impl Window {
    /// Drop every timestamp that is `window` old or older.
    fn prune(&mut self, now: Instant, window: Duration) {
        while let Some(&oldest) = self.hits.front() {
            if now.duration_since(oldest) >= window {
                self.hits.pop_front();
            } else {
                break;
            }
        }
    }

    fn retry_after(&self, now: Instant, window: Duration) -> Duration {
        self.hits
            .front()
            .map(|oldest| window.saturating_sub(now.duration_since(*oldest)))
            .unwrap_or(Duration::ZERO)
    }
}

/// Thread-safe per-client rate limiter.
#[derive(Clone)]
pub struct RateLimiter {
    window: Duration,
    max_requests: u32,
    clients: Arc<RwLock<HashMap<String, Window>>>,
}

impl RateLimiter {
    /// Create a new rate limiter with the given configuration.
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            window: config.window_duration(),
            max_requests: config.max_requests,
            clients: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Admit or reject one submission from `client_id`.
    pub async fn allow(&self, client_id: &str) -> bool {
        self.check(client_id).await.is_allowed()
    }

    /// Admit or reject one submission, reporting quota details.
    pub async fn check(&self, client_id: &str) -> RateLimitResult {
        let now = Instant::now();
        let mut clients = self.clients.write().await;
        let window = clients.entry(client_id.to_string()).or_default();

        window.prune(now, self.window);

        let used = window.hits.len() as u32;
        if used >= self.max_requests {
            let retry_after = window.retry_after(now, self.window);
            debug!(client = %client_id, used, ?retry_after, "Client rate limit exceeded");
            return RateLimitResult::Limited { retry_after };
        }

        window.hits.push_back(now);
        RateLimitResult::Allowed {
            remaining: self.max_requests - used - 1,
        }
    }

    /// Drop clients with no timestamps left in the window.
    pub async fn cleanup(&self) {
        let now = Instant::now();
        let mut clients = self.clients.write().await;
        let before = clients.len();

        clients.retain(|_, window| {
            window.prune(now, self.window);
            !window.hits.is_empty()
        });

        let removed = before - clients.len();
        if removed > 0 {
            debug!(removed, remaining = clients.len(), "Swept idle rate limit entries");
        }
    }

    /// Number of clients currently tracked.
    pub async fn tracked_clients(&self) -> usize {
        self.clients.read().await.len()
    }
}
