// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Hostile and malformed form input generators.

use super::valid_submission;
use contact_relay::models::{ContactSubmission, Field};

/// Markup and template-injection payloads.
pub fn injection_payloads() -> Vec<&'static str> {
    vec![
        "<script>alert('x')</script>",
        "<img src=x onerror=alert(1)>",
        "\"><svg/onload=alert(1)>",
        "<<b>>nested<</b>>",
        "{{constructor.constructor('alert(1)')()}}",
        "</textarea><iframe src=javascript:alert(1)>",
    ]
}

/// Submissions whose message carries an injection payload.
pub fn injected_submissions() -> Vec<ContactSubmission> {
    injection_payloads()
        .into_iter()
        .map(|payload| ContactSubmission {
            name: format!("<b>{}</b>", "Mallory"),
            subject: format!("Hello {payload}"),
            message: format!("Please read this carefully: {payload}"),
            ..valid_submission()
        })
        .collect()
}

/// Malformed submissions paired with the field that must be flagged.
pub fn malformed_submissions() -> Vec<(ContactSubmission, Field)> {
    vec![
        (
            ContactSubmission {
                name: " ".to_string(),
                ..valid_submission()
            },
            Field::Name,
        ),
        (
            ContactSubmission {
                name: "n".repeat(51),
                ..valid_submission()
            },
            Field::Name,
        ),
        (
            ContactSubmission {
                email: "grace@localhost".to_string(),
                ..valid_submission()
            },
            Field::Email,
        ),
        (
            ContactSubmission {
                email: "grace hopper@example.com".to_string(),
                ..valid_submission()
            },
            Field::Email,
        ),
        (
            ContactSubmission {
                phone: Some("call me maybe".to_string()),
                ..valid_submission()
            },
            Field::Phone,
        ),
        (
            ContactSubmission {
                phone: Some("+0044 20 7946".to_string()),
                ..valid_submission()
            },
            Field::Phone,
        ),
        (
            ContactSubmission {
                subject: "Hi".to_string(),
                ..valid_submission()
            },
            Field::Subject,
        ),
        (
            ContactSubmission {
                subject: "s".repeat(101),
                ..valid_submission()
            },
            Field::Subject,
        ),
        (
            ContactSubmission {
                message: "short".to_string(),
                ..valid_submission()
            },
            Field::Message,
        ),
        (
            ContactSubmission {
                message: "m".repeat(10_000),
                ..valid_submission()
            },
            Field::Message,
        ),
    ]
}
