// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the contact form service.
//!
//! Everything is sourced from environment variables (optionally seeded from a
//! `.env` file). Numeric values that are missing, unparseable or zero fall
//! back to their defaults.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the contact form service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address (default: 0.0.0.0:8080)
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Outbound mail configuration
    #[serde(default)]
    pub smtp: SmtpConfig,

    /// HTTP surface configuration
    #[serde(default)]
    pub http: HttpConfig,

    /// Metrics configuration
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Sliding window rate limiting, keyed by client IP.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Window length in milliseconds (default: 900000, 15 minutes)
    #[serde(default = "default_window_ms")]
    pub window_ms: u64,

    /// Maximum submissions per client inside one window (default: 5)
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,

    /// How often idle clients are swept from memory, in seconds (default: 60)
    #[serde(default = "default_cleanup_secs")]
    pub cleanup_interval_secs: u64,
}

/// SMTP settings as read from the environment.
///
/// Every field is optional here; [`SmtpConfig::resolve`] decides whether the
/// set is complete enough to deliver mail.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct SmtpConfig {
    pub host: Option<String>,
    /// Raw port value, kept as text so a bad value can be reported by name.
    pub port: Option<String>,
    pub user: Option<String>,
    #[serde(skip_serializing)]
    pub pass: Option<String>,
    /// Destination mailbox (falls back to `user` when absent)
    pub contact_email: Option<String>,
}

impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("pass", &self.pass.as_ref().map(|_| "<redacted>"))
            .field("contact_email", &self.contact_email)
            .finish()
    }
}

/// A complete SMTP configuration.
#[derive(Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub pass: String,
    pub contact_email: String,
}

impl std::fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("pass", &"<redacted>")
            .field("contact_email", &self.contact_email)
            .finish()
    }
}

/// HTTP surface configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Use the first `X-Forwarded-For` entry as the client id (default: true)
    #[serde(default = "default_true")]
    pub trust_forwarded_for: bool,

    /// Value for `Access-Control-Allow-Origin` (default: *)
    #[serde(default = "default_allow_origin")]
    pub cors_allow_origin: String,
}

/// Metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Enable Prometheus metrics endpoint (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Metrics endpoint path (default: /metrics)
    #[serde(default = "default_metrics_path")]
    pub path: String,
}

// Default value functions
fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_window_ms() -> u64 {
    15 * 60 * 1000
}

fn default_max_requests() -> u32 {
    5
}

fn default_cleanup_secs() -> u64 {
    60
}

fn default_true() -> bool {
    true
}

fn default_allow_origin() -> String {
    "*".to_string()
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            rate_limit: RateLimitConfig::default(),
            smtp: SmtpConfig::default(),
            http: HttpConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_ms: default_window_ms(),
            max_requests: default_max_requests(),
            cleanup_interval_secs: default_cleanup_secs(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            trust_forwarded_for: default_true(),
            cors_allow_origin: default_allow_origin(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            path: default_metrics_path(),
        }
    }
}

impl RateLimitConfig {
    /// Get the rate window duration
    pub fn window_duration(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }

    /// Get the cleanup interval
    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs)
    }
}

impl SmtpConfig {
    /// Names of the required variables that are absent or unusable.
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.host.is_none() {
            missing.push("SMTP_HOST");
        }
        if self.port.as_deref().and_then(|p| p.parse::<u16>().ok()).is_none() {
            missing.push("SMTP_PORT");
        }
        if self.user.is_none() {
            missing.push("SMTP_USER");
        }
        if self.pass.is_none() {
            missing.push("SMTP_PASS");
        }
        missing
    }

    /// Resolve into complete settings, or return the missing variable names.
    pub fn resolve(&self) -> Result<SmtpSettings, Vec<&'static str>> {
        let missing = self.missing();
        match (&self.host, &self.port, &self.user, &self.pass) {
            (Some(host), Some(port), Some(user), Some(pass)) if missing.is_empty() => {
                Ok(SmtpSettings {
                    host: host.clone(),
                    port: port.parse().map_err(|_| vec!["SMTP_PORT"])?,
                    user: user.clone(),
                    pass: pass.clone(),
                    contact_email: self.contact_email.clone().unwrap_or_else(|| user.clone()),
                })
            }
            _ => Err(missing),
        }
    }
}

impl SmtpSettings {
    /// Port 465 speaks TLS from the first byte; anything else upgrades with STARTTLS.
    pub fn implicit_tls(&self) -> bool {
        self.port == 465
    }
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        // Blank values count as unset.
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Config {
            bind_addr: var("BIND_ADDR").unwrap_or_else(default_bind_addr),
            rate_limit: RateLimitConfig {
                window_ms: positive(var("RATE_LIMIT_WINDOW")).unwrap_or_else(default_window_ms),
                max_requests: positive(var("RATE_LIMIT_MAX_REQUESTS"))
                    .unwrap_or_else(default_max_requests),
                cleanup_interval_secs: positive(var("RATE_LIMIT_CLEANUP_SECS"))
                    .unwrap_or_else(default_cleanup_secs),
            },
            smtp: SmtpConfig {
                host: var("SMTP_HOST"),
                port: var("SMTP_PORT").map(|p| p.trim().to_string()),
                user: var("SMTP_USER"),
                pass: var("SMTP_PASS"),
                contact_email: var("CONTACT_EMAIL"),
            },
            http: HttpConfig {
                trust_forwarded_for: var("TRUST_FORWARDED_FOR")
                    .and_then(|v| parse_bool(&v))
                    .unwrap_or_else(default_true),
                cors_allow_origin: var("CORS_ALLOW_ORIGIN").unwrap_or_else(default_allow_origin),
            },
            metrics: MetricsConfig {
                enabled: var("METRICS_ENABLED")
                    .and_then(|v| parse_bool(&v))
                    .unwrap_or_else(default_true),
                path: var("METRICS_PATH").unwrap_or_else(default_metrics_path),
            },
        }
    }
}

/// Parse a strictly positive number; zero is treated as unset.
fn positive<T>(raw: Option<String>) -> Option<T>
where
    T: std::str::FromStr + PartialEq + Default,
{
    raw.and_then(|v| v.trim().parse::<T>().ok())
        .filter(|v| *v != T::default())
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
