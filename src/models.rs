// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact form data types.

use crate::sanitizer::sanitize_input;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A contact form submission as entered by the visitor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
}

/// Contact form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Name,
    Email,
    Phone,
    Subject,
    Message,
}

impl Field {
    /// Capitalized label used in user-facing messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Email => "Email",
            Self::Phone => "Phone",
            Self::Subject => "Subject",
            Self::Message => "Message",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Subject => "subject",
            Self::Message => "message",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ContactSubmission {
    /// Phone number, if one was entered.
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref().filter(|p| !p.trim().is_empty())
    }

    /// Copy of the submission with every field passed through
    /// [`sanitize_input`].
    pub fn sanitized(&self) -> Self {
        Self {
            name: sanitize_input(&self.name),
            email: sanitize_input(&self.email),
            phone: self.phone.as_deref().map(sanitize_input),
            subject: sanitize_input(&self.subject),
            message: sanitize_input(&self.message),
        }
    }
}
