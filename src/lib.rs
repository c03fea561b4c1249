// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact Relay
//!
//! Contact form pipeline for a static portfolio site:
//!
//! - Field validation (name, email, optional phone, subject, message)
//! - Best-effort sanitization of free text
//! - Advisory fixed-window submission gate (3 per hour default) over a
//!   persisted counter
//! - Delivery through the EmailJS transactional email API
//! - HTTP endpoints the site's form posts to

pub mod clock;
pub mod config;
pub mod dispatcher;
pub mod handlers;
pub mod limiter;
pub mod models;
pub mod sanitizer;
pub mod storage;
pub mod validator;

pub use config::Config;
pub use dispatcher::{DispatchOutcome, DispatchResult, EmailDispatcher, EmailJsProvider, EmailProvider};
pub use limiter::{RateLimitResult, SubmissionGate};
pub use models::ContactSubmission;
pub use sanitizer::sanitize_input;
pub use validator::{validate_form, ContactValidator, ValidationErrors};
