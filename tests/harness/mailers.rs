// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! In-memory mail transports.

use async_trait::async_trait;
use portfolio_contact::{
    mailer::{MailError, MailMessage, MailTransport},
    ContactSubmission,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Accepts every submission and keeps the composed message.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<MailMessage>>,
}

impl RecordingMailer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn sent(&self) -> Vec<MailMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl MailTransport for RecordingMailer {
    async fn send(&self, submission: &ContactSubmission) -> Result<String, MailError> {
        let message = MailMessage::compose(submission, "site@example.com", "owner@example.com");
        let mut sent = self.sent.lock().unwrap();
        sent.push(message);
        Ok(format!("2.0.0 Ok: queued as {}", sent.len()))
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

/// Fails every send as if the SMTP server refused it.
#[derive(Default)]
pub struct FailingMailer {
    attempts: AtomicUsize,
}

impl FailingMailer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MailTransport for FailingMailer {
    async fn send(&self, _submission: &ContactSubmission) -> Result<String, MailError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(MailError::Send(
            "535 5.7.8 Username and Password not accepted".to_string(),
        ))
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}
