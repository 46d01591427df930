// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact form submission validator.
//!
//! Checks that every field is present after trimming and that the email
//! address has a basic `local@domain.tld` shape. Nothing is sanitized here.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::debug;

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("The regex should be valid"));

/// A single contact form submission, as posted by the site.
///
/// Absent and `null` keys deserialize as empty strings so they are reported
/// as missing fields rather than as a malformed body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSubmission {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub message: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl ContactSubmission {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            message: message.into(),
        }
    }

    /// Copy of the submission with surrounding whitespace removed.
    pub fn trimmed(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            message: self.message.trim().to_string(),
        }
    }
}

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{} is required", capitalize(.0))]
    MissingField(&'static str),

    #[error("Invalid email address")]
    InvalidEmailFormat,
}

/// Validate a submission. Fields are checked in form order and the first
/// problem found is returned.
pub fn validate(submission: &ContactSubmission) -> Result<(), ValidationError> {
    let fields = [
        ("name", &submission.name),
        ("email", &submission.email),
        ("message", &submission.message),
    ];

    for (field, value) in fields {
        if value.trim().is_empty() {
            debug!(field, "Missing contact form field");
            return Err(ValidationError::MissingField(field));
        }
    }

    if !is_valid_email(submission.email.trim()) {
        debug!("Email address failed format check");
        return Err(ValidationError::InvalidEmailFormat);
    }

    Ok(())
}

/// Basic `local@domain.tld` check; no whitespace, exactly one `@`.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email)
}

fn capitalize(field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
