// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact form validator.
//!
//! Field-level checks for a [`ContactSubmission`]:
//! - name, subject and message: required, trimmed length within bounds
//! - email: required, loose `local@domain.tld` shape
//! - phone: optional, digits with an optional leading `+`
//!
//! Validation never fails outright; every problem is reported through the
//! returned [`ValidationErrors`].

use crate::config::{LengthBounds, ValidationConfig};
use crate::models::{ContactSubmission, Field};
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::debug;

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));

// Optional `+`, non-zero leading digit, at most 15 digits overall (E.164).
static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[1-9][0-9]{0,14}$").expect("valid phone pattern"));

/// Field name to error message. An empty mapping means the input is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<Field, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(f, m)| (*f, m.as_str()))
    }
}

/// Contact form validator.
#[derive(Debug, Clone, Default)]
pub struct ContactValidator {
    config: ValidationConfig,
}

impl ContactValidator {
    /// Create a new validator with the given bounds.
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Validate a complete submission.
    pub fn validate(&self, submission: &ContactSubmission) -> ValidationErrors {
        let mut errors = ValidationErrors::new();

        if let Some(message) = check_length(Field::Name, &submission.name, self.config.name) {
            errors.insert(Field::Name, message);
        }
        if let Some(message) = check_email(&submission.email) {
            errors.insert(Field::Email, message);
        }
        if let Some(message) = submission.phone().and_then(check_phone) {
            errors.insert(Field::Phone, message);
        }
        if let Some(message) = check_length(Field::Subject, &submission.subject, self.config.subject)
        {
            errors.insert(Field::Subject, message);
        }
        if let Some(message) = check_length(Field::Message, &submission.message, self.config.message)
        {
            errors.insert(Field::Message, message);
        }

        if errors.is_empty() {
            debug!("Submission valid");
        } else {
            debug!(fields = ?errors.fields().collect::<Vec<_>>(), "Submission invalid");
        }

        errors
    }
}

/// Validate with the default bounds.
pub fn validate_form(submission: &ContactSubmission) -> ValidationErrors {
    ContactValidator::default().validate(submission)
}

fn check_length(field: Field, value: &str, bounds: LengthBounds) -> Option<String> {
    let trimmed = value.trim();
    let len = trimmed.chars().count();

    if trimmed.is_empty() {
        Some(format!("{} is required", field.label()))
    } else if len < bounds.min {
        Some(format!(
            "{} must be at least {} characters",
            field.label(),
            bounds.min
        ))
    } else if len > bounds.max {
        Some(format!(
            "{} must be less than {} characters",
            field.label(),
            bounds.max
        ))
    } else {
        None
    }
}

fn check_email(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Some("Email is required".to_string())
    } else if !EMAIL_PATTERN.is_match(trimmed) {
        Some("Please enter a valid email address".to_string())
    } else {
        None
    }
}

fn check_phone(value: &str) -> Option<String> {
    let compact: String = value
        .chars()
        .filter(|c| !(c.is_whitespace() || matches!(c, '-' | '(' | ')')))
        .collect();

    if PHONE_PATTERN.is_match(&compact) {
        None
    } else {
        Some("Please enter a valid phone number".to_string())
    }
}
