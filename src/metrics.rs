// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Prometheus counters for contact form traffic.

use prometheus::{Encoder, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

/// Metrics owned by one running service.
#[derive(Clone)]
pub struct ContactMetrics {
    registry: Registry,
    submissions: IntCounterVec,
    tracked_clients: IntGauge,
}

impl ContactMetrics {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let submissions = IntCounterVec::new(
            Opts::new(
                "contact_submissions_total",
                "Contact form submissions by outcome",
            ),
            &["outcome"],
        )?;
        let tracked_clients = IntGauge::new(
            "contact_rate_limit_clients",
            "Clients currently tracked by the rate limiter",
        )?;

        registry.register(Box::new(submissions.clone()))?;
        registry.register(Box::new(tracked_clients.clone()))?;

        Ok(Self {
            registry,
            submissions,
            tracked_clients,
        })
    }

    /// Count one request by its outcome label.
    pub fn record(&self, outcome: &str) {
        self.submissions.with_label_values(&[outcome]).inc();
    }

    pub fn submissions(&self, outcome: &str) -> u64 {
        self.submissions.with_label_values(&[outcome]).get()
    }

    pub fn set_tracked_clients(&self, count: usize) {
        self.tracked_clients.set(count as i64);
    }

    /// Render every metric in the text exposition format.
    pub fn render(&self) -> prometheus::Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
