// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Outbound mail for contact form submissions.
//!
//! The handler only sees the [`MailTransport`] capability. Which
//! implementation backs it is decided once at startup by [`from_config`]:
//! a complete SMTP configuration yields an [`SmtpMailer`], anything less
//! yields an [`UnconfiguredMailer`] that refuses every send without opening
//! a connection.
//!
//! Sends are never retried.

use crate::config::{SmtpConfig, SmtpSettings};
use crate::validator::ContactSubmission;
use async_trait::async_trait;
use lettre::{
    message::{Mailbox, MultiPart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

const FOOTER: &str = "Sent from your portfolio contact form";

/// Mail transport errors.
#[derive(Debug, Error)]
pub enum MailError {
    /// Required settings are absent or unusable; nothing was sent.
    #[error("mail transport is not configured: {0}")]
    Config(String),

    #[error("could not build message: {0}")]
    Message(String),

    #[error("SMTP exchange failed: {0}")]
    Send(String),
}

/// The email derived from one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub from: String,
    pub to: String,
    pub reply_to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

impl MailMessage {
    /// Build the notification email for a submission. Fields are trimmed;
    /// the HTML body escapes them.
    pub fn compose(submission: &ContactSubmission, from: &str, to: &str) -> Self {
        let ContactSubmission { name, email, message } = submission.trimmed();

        let html = format!(
            "<h2>New Contact Form Submission</h2>\n\
             <p><strong>Name:</strong> {}</p>\n\
             <p><strong>Email:</strong> {}</p>\n\
             <p><strong>Message:</strong></p>\n\
             <p>{}</p>\n\
             <hr>\n\
             <p><em>{FOOTER}</em></p>\n",
            escape_html(&name),
            escape_html(&email),
            escape_html(&message).replace('\n', "<br>"),
        );

        let text = format!(
            "New Contact Form Submission\n\n\
             Name: {name}\n\
             Email: {email}\n\
             Message: {message}\n\n\
             {FOOTER}\n"
        );

        Self {
            from: from.to_string(),
            to: to.to_string(),
            reply_to: email,
            subject: format!("New Contact Form Message from {name}"),
            html,
            text,
        }
    }

    /// Convert into a MIME message with plain text and HTML alternatives.
    pub fn to_message(&self) -> Result<Message, MailError> {
        let mailbox = |raw: &str| {
            raw.parse::<Mailbox>()
                .map_err(|e| MailError::Message(format!("bad address {raw:?}: {e}")))
        };

        Message::builder()
            .from(mailbox(&self.from)?)
            .reply_to(mailbox(&self.reply_to)?)
            .to(mailbox(&self.to)?)
            .subject(self.subject.as_str())
            .multipart(MultiPart::alternative_plain_html(
                self.text.clone(),
                self.html.clone(),
            ))
            .map_err(|e| MailError::Message(e.to_string()))
    }
}

/// Capability for delivering contact form submissions.
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Deliver one submission. Returns the server's acknowledgement text.
    async fn send(&self, submission: &ContactSubmission) -> Result<String, MailError>;

    /// Check that the transport can reach its server.
    async fn verify(&self) -> Result<(), MailError> {
        Ok(())
    }

    /// Short label for logs.
    fn name(&self) -> &'static str;
}

/// SMTP delivery through a pooled async transport.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
    to: String,
}

impl SmtpMailer {
    /// Build the transport. No connection is opened until the first send.
    pub fn new(settings: &SmtpSettings) -> Result<Self, MailError> {
        let builder = if settings.implicit_tls() {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
        }
        .map_err(|e| MailError::Config(format!("SMTP_HOST {:?}: {e}", settings.host)))?;

        let transport = builder
            .port(settings.port)
            .credentials(Credentials::new(
                settings.user.clone(),
                settings.pass.clone(),
            ))
            .build();

        Ok(Self {
            transport,
            from: settings.user.clone(),
            to: settings.contact_email.clone(),
        })
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn send(&self, submission: &ContactSubmission) -> Result<String, MailError> {
        let message = MailMessage::compose(submission, &self.from, &self.to).to_message()?;

        debug!(to = %self.to, "Sending contact form email");
        let response = self
            .transport
            .send(message)
            .await
            .map_err(|e| MailError::Send(e.to_string()))?;

        Ok(response.message().collect::<Vec<_>>().join(" "))
    }

    async fn verify(&self) -> Result<(), MailError> {
        match self.transport.test_connection().await {
            Ok(true) => Ok(()),
            Ok(false) => Err(MailError::Send("server did not accept NOOP".to_string())),
            Err(e) => Err(MailError::Send(e.to_string())),
        }
    }

    fn name(&self) -> &'static str {
        "smtp"
    }
}

/// Stand-in used when SMTP settings are incomplete.
pub struct UnconfiguredMailer {
    reason: String,
}

impl UnconfiguredMailer {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

#[async_trait]
impl MailTransport for UnconfiguredMailer {
    async fn send(&self, _submission: &ContactSubmission) -> Result<String, MailError> {
        Err(MailError::Config(self.reason.clone()))
    }

    async fn verify(&self) -> Result<(), MailError> {
        Err(MailError::Config(self.reason.clone()))
    }

    fn name(&self) -> &'static str {
        "unconfigured"
    }
}

/// Pick the transport for this process.
pub fn from_config(config: &SmtpConfig) -> Arc<dyn MailTransport> {
    let settings = match config.resolve() {
        Ok(settings) => settings,
        Err(missing) => {
            warn!(missing = ?missing, "SMTP settings incomplete, contact form will not deliver mail");
            return Arc::new(UnconfiguredMailer::new(format!("missing {}", missing.join(", "))));
        }
    };

    match SmtpMailer::new(&settings) {
        Ok(mailer) => {
            info!(
                host = %settings.host,
                port = settings.port,
                implicit_tls = settings.implicit_tls(),
                to = %settings.contact_email,
                "SMTP transport configured"
            );
            Arc::new(mailer)
        }
        Err(e) => {
            warn!(error = %e, "SMTP transport could not be built");
            Arc::new(UnconfiguredMailer::new(e.to_string()))
        }
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
