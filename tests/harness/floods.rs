// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Submission flood patterns.

/// Flood pattern configuration.
#[derive(Debug, Clone)]
pub struct FloodConfig {
    /// Total number of submissions to send
    pub total_requests: usize,
    /// Number of unique client IPs to rotate through
    pub unique_ips: usize,
    /// Send valid submissions (otherwise every email is malformed)
    pub valid_payloads: bool,
}

impl Default for FloodConfig {
    fn default() -> Self {
        Self {
            total_requests: 50,
            unique_ips: 1,
            valid_payloads: true,
        }
    }
}

/// Predefined flood patterns.
impl FloodConfig {
    /// One visitor hammering the form.
    pub fn single_ip_flood() -> Self {
        Self {
            total_requests: 100,
            unique_ips: 1,
            ..Default::default()
        }
    }

    /// Many clients, a few submissions each.
    pub fn distributed_flood() -> Self {
        Self {
            total_requests: 400,
            unique_ips: 40,
            ..Default::default()
        }
    }

    /// Garbage that should never reach the limiter.
    pub fn malformed_flood() -> Self {
        Self {
            total_requests: 60,
            unique_ips: 1,
            valid_payloads: false,
        }
    }
}
