// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Test data generators.

use portfolio_contact::ContactSubmission;
use std::net::{IpAddr, Ipv4Addr};

/// Generate a pool of IP addresses for testing.
pub fn generate_ips(count: usize) -> Vec<IpAddr> {
    (0..count)
        .map(|i| {
            // Use 10.x.x.x private range
            let a = ((i >> 16) & 0xFF) as u8;
            let b = ((i >> 8) & 0xFF) as u8;
            let c = (i & 0xFF) as u8;
            IpAddr::V4(Ipv4Addr::new(10, a, b, c))
        })
        .collect()
}

/// Distinct valid submissions.
pub fn generate_submissions(count: usize) -> Vec<ContactSubmission> {
    (0..count)
        .map(|i| {
            ContactSubmission::new(
                format!("Visitor {i}"),
                format!("visitor{i}@example.com"),
                format!("Message number {i}\nwith a second line"),
            )
        })
        .collect()
}

/// Addresses that fail the `local@domain.tld` check.
pub fn generate_invalid_emails() -> Vec<&'static str> {
    vec![
        "not-an-email",
        "plainaddress",
        "missing-tld@example",
        "@no-local.com",
        "no-domain@.com.",
        "two@@example.com",
        "spaces in@example.com",
        "ada@exam ple.com",
        "ada@example.",
    ]
}

/// Submissions with one blank field each, with the expected message.
pub fn generate_blank_fields() -> Vec<(ContactSubmission, &'static str)> {
    let ada = || ContactSubmission::new("Ada", "ada@example.com", "Hello");
    vec![
        (ContactSubmission { name: String::new(), ..ada() }, "Name is required"),
        (ContactSubmission { name: " \t ".into(), ..ada() }, "Name is required"),
        (ContactSubmission { email: String::new(), ..ada() }, "Email is required"),
        (ContactSubmission { email: "\n".into(), ..ada() }, "Email is required"),
        (ContactSubmission { message: String::new(), ..ada() }, "Message is required"),
        (ContactSubmission { message: "   ".into(), ..ada() }, "Message is required"),
    ]
}

/// Raw bodies that are not a JSON object of strings.
pub fn generate_junk_bodies() -> Vec<&'static str> {
    vec![
        "",
        "name=Ada&email=ada@example.com",
        "{\"name\": \"Ada\"",
        "[1, 2, 3]",
        "{\"name\": 42, \"email\": \"ada@example.com\", \"message\": \"Hi\"}",
    ]
}
