// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Error types for the contact endpoint and their HTTP mapping.
//!
//! Response bodies only ever carry the fixed messages below. Transport
//! detail stays in the logs.

use crate::mailer::MailError;
use crate::validator::ValidationError;
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

pub const RATE_LIMITED_MESSAGE: &str =
    "Too many contact form submissions. Please try again later.";
pub const CONFIG_ERROR_MESSAGE: &str =
    "Email service configuration error. Please contact support.";
pub const SEND_ERROR_MESSAGE: &str = "Failed to send message. Please try again later.";

/// Ways a contact submission can be turned away.
#[derive(Debug, Error)]
pub enum ContactError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Invalid request body")]
    InvalidBody,

    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Admission control, not a fault.
    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    #[error(transparent)]
    Mail(#[from] MailError),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ContactError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::InvalidBody => StatusCode::BAD_REQUEST,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::Mail(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message shown to the visitor.
    pub fn public_message(&self) -> String {
        match self {
            Self::Validation(e) => e.to_string(),
            Self::InvalidBody | Self::MethodNotAllowed => self.to_string(),
            Self::RateLimited { .. } => RATE_LIMITED_MESSAGE.to_string(),
            Self::Mail(MailError::Config(_)) => CONFIG_ERROR_MESSAGE.to_string(),
            Self::Mail(_) => SEND_ERROR_MESSAGE.to_string(),
        }
    }

    /// Label used for the outcome metric.
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::Validation(ValidationError::MissingField(_)) => "missing_field",
            Self::Validation(ValidationError::InvalidEmailFormat) => "invalid_email",
            Self::InvalidBody => "invalid_body",
            Self::MethodNotAllowed => "method_not_allowed",
            Self::RateLimited { .. } => "rate_limited",
            Self::Mail(MailError::Config(_)) => "transport_config_error",
            Self::Mail(_) => "send_error",
        }
    }
}

impl IntoResponse for ContactError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(ErrorResponse {
            success: false,
            error: self.public_message(),
        });

        match self {
            Self::RateLimited { retry_after } => {
                // Round up so clients never retry a moment too early.
                let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
                (status, [(header::RETRY_AFTER, secs.to_string())], body).into_response()
            }
            _ => (status, body).into_response(),
        }
    }
}
