// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the contact relay.
//!
//! Every value can be supplied through the environment (optionally via a
//! `.env` file loaded by the binary). Numeric settings silently fall back to
//! their defaults when malformed.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// EmailJS REST endpoint used when no override is configured.
pub const DEFAULT_EMAILJS_API_URL: &str = "https://api.emailjs.com/api/v1.0/email/send";

/// Configuration error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid URL in {var}: {source}")]
    InvalidUrl {
        var: &'static str,
        #[source]
        source: url::ParseError,
    },
}

/// Configuration for the contact relay service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address (default: 0.0.0.0:8080)
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Origin of the site allowed to post the form. `None` allows any origin.
    #[serde(default)]
    pub cors_allowed_origin: Option<String>,

    /// Submission gate configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Field validation bounds
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Email provider configuration
    #[serde(default)]
    pub email: EmailJsConfig,

    /// Fixed recipient of every contact message
    #[serde(default)]
    pub recipient: RecipientConfig,
}

/// Submission gate configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Maximum successful submissions per window (default: 3)
    #[serde(default = "default_max_submissions")]
    pub max_submissions: u32,

    /// Window length in seconds (default: 3600)
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,

    /// Directory holding the persisted gate state (default: ./state)
    #[serde(default = "default_state_dir")]
    pub state_dir: PathBuf,
}

/// Inclusive character-count bounds for a free-text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LengthBounds {
    pub min: usize,
    pub max: usize,
}

impl LengthBounds {
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }
}

/// Validation bounds for the contact form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    #[serde(default = "default_name_bounds")]
    pub name: LengthBounds,

    #[serde(default = "default_subject_bounds")]
    pub subject: LengthBounds,

    #[serde(default = "default_message_bounds")]
    pub message: LengthBounds,
}

/// EmailJS provider identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailJsConfig {
    #[serde(default)]
    pub service_id: String,

    #[serde(default)]
    pub template_id: String,

    #[serde(default)]
    pub public_key: String,

    /// Private key, required by accounts that restrict non-browser callers
    #[serde(default)]
    pub access_token: Option<String>,

    #[serde(default = "default_api_url")]
    pub api_url: Url,
}

/// Recipient of the contact messages.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecipientConfig {
    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub name: String,
}

fn parse_var<T: FromStr>(value: Option<String>) -> Option<T> {
    value.and_then(|v| v.trim().parse().ok())
}

fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_max_submissions() -> u32 {
    3
}

fn default_window_secs() -> u64 {
    60 * 60
}

fn default_state_dir() -> PathBuf {
    PathBuf::from("./state")
}

fn default_name_bounds() -> LengthBounds {
    LengthBounds::new(2, 50)
}

fn default_subject_bounds() -> LengthBounds {
    LengthBounds::new(5, 100)
}

fn default_message_bounds() -> LengthBounds {
    LengthBounds::new(10, 1000)
}

fn default_api_url() -> Url {
    Url::parse(DEFAULT_EMAILJS_API_URL).expect("default EmailJS URL is valid")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            cors_allowed_origin: None,
            rate_limit: RateLimitConfig::default(),
            validation: ValidationConfig::default(),
            email: EmailJsConfig::default(),
            recipient: RecipientConfig::default(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_submissions: default_max_submissions(),
            window_secs: default_window_secs(),
            state_dir: default_state_dir(),
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            name: default_name_bounds(),
            subject: default_subject_bounds(),
            message: default_message_bounds(),
        }
    }
}

impl Default for EmailJsConfig {
    fn default() -> Self {
        Self {
            service_id: String::new(),
            template_id: String::new(),
            public_key: String::new(),
            access_token: None,
            api_url: default_api_url(),
        }
    }
}

impl RateLimitConfig {
    /// Get the gate window duration
    pub fn window_duration(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}

impl EmailJsConfig {
    /// Names of the required provider settings that are still empty.
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.service_id.trim().is_empty() {
            missing.push("EMAILJS_SERVICE_ID");
        }
        if self.template_id.trim().is_empty() {
            missing.push("EMAILJS_TEMPLATE_ID");
        }
        if self.public_key.trim().is_empty() {
            missing.push("EMAILJS_PUBLIC_KEY");
        }
        missing
    }

    pub fn is_configured(&self) -> bool {
        self.missing().is_empty()
    }
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_url = match var("EMAILJS_API_URL") {
            Some(raw) => Url::parse(raw.trim()).map_err(|source| ConfigError::InvalidUrl {
                var: "EMAILJS_API_URL",
                source,
            })?,
            None => default_api_url(),
        };

        Ok(Config {
            bind_addr: var("BIND_ADDR").unwrap_or_else(default_bind_addr),
            cors_allowed_origin: var("CORS_ALLOWED_ORIGIN"),
            rate_limit: RateLimitConfig {
                max_submissions: parse_var(var("RATE_LIMIT_MAX_SUBMISSIONS"))
                    .unwrap_or_else(default_max_submissions),
                window_secs: parse_var(var("RATE_LIMIT_WINDOW_SECS")).unwrap_or_else(default_window_secs),
                state_dir: var("RATE_LIMIT_STATE_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(default_state_dir),
            },
            validation: ValidationConfig::default(),
            email: EmailJsConfig {
                service_id: var("EMAILJS_SERVICE_ID").unwrap_or_default(),
                template_id: var("EMAILJS_TEMPLATE_ID").unwrap_or_default(),
                public_key: var("EMAILJS_PUBLIC_KEY").unwrap_or_default(),
                access_token: var("EMAILJS_ACCESS_TOKEN"),
                api_url,
            },
            recipient: RecipientConfig {
                email: var("CONTACT_RECIPIENT_EMAIL").unwrap_or_default(),
                name: var("CONTACT_RECIPIENT_NAME").unwrap_or_default(),
            },
        })
    }
}
