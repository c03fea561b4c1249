// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Email dispatch through a transactional email provider.
//!
//! [`EmailDispatcher::send_email`] takes an already validated submission,
//! sanitizes it, asks the [`SubmissionGate`] for quota, hands the template
//! variables to the [`EmailProvider`] and folds every outcome into a
//! [`DispatchResult`]. A failed send is reported once; nothing is retried.

use crate::config::{EmailJsConfig, RecipientConfig};
use crate::limiter::{RateLimitResult, SubmissionGate};
use crate::models::ContactSubmission;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

pub const SUCCESS_MESSAGE: &str =
    "Message sent successfully! I'll get back to you within 24 hours.";
pub const NETWORK_ERROR_MESSAGE: &str =
    "Network error. Please check your connection and try again.";
pub const RATE_ERROR_MESSAGE: &str = "Too many requests. Please try again later.";

/// Variables handed to the provider's email template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateParams {
    pub from_name: String,
    pub from_email: String,
    pub phone: String,
    pub subject: String,
    pub message: String,
    pub to_email: String,
    pub to_name: String,
    pub reply_to: String,
    pub recipient_email: String,
    pub recipient: String,
}

impl TemplateParams {
    /// Build template variables from a sanitized submission.
    pub fn new(submission: &ContactSubmission, recipient: &RecipientConfig) -> Self {
        Self {
            from_name: submission.name.clone(),
            from_email: submission.email.clone(),
            phone: submission.phone().unwrap_or_default().to_string(),
            subject: submission.subject.clone(),
            message: submission.message.clone(),
            to_email: recipient.email.clone(),
            to_name: recipient.name.clone(),
            reply_to: submission.email.clone(),
            recipient_email: recipient.email.clone(),
            recipient: recipient.email.clone(),
        }
    }
}

/// Successful provider answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderResponse {
    pub status: u16,
    pub text: String,
}

/// Provider error types.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Failed to initialize email provider client: {0}")]
    Init(String),

    #[error("network error while contacting email provider: {0}")]
    Network(String),

    #[error("email provider returned status {status}: {text}")]
    Status { status: u16, text: String },

    #[error("{0}")]
    Other(String),
}

/// Transactional email provider.
#[async_trait]
pub trait EmailProvider: Send + Sync {
    /// Deliver one templated email.
    async fn send(&self, params: &TemplateParams) -> Result<ProviderResponse, ProviderError>;
}

/// EmailJS REST client.
#[derive(Debug, Clone)]
pub struct EmailJsProvider {
    client: reqwest::Client,
    config: EmailJsConfig,
}

#[derive(Serialize)]
struct SendRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: &'a TemplateParams,
    #[serde(rename = "accessToken", skip_serializing_if = "Option::is_none")]
    access_token: Option<&'a str>,
}

impl EmailJsProvider {
    /// Set up the provider client with its public key and template identity.
    pub fn init(config: EmailJsConfig) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ProviderError::Init(e.to_string()))?;

        debug!(
            service_id = %config.service_id,
            template_id = %config.template_id,
            api_url = %config.api_url,
            "EmailJS provider initialized"
        );
        Ok(Self { client, config })
    }
}

#[async_trait]
impl EmailProvider for EmailJsProvider {
    async fn send(&self, params: &TemplateParams) -> Result<ProviderResponse, ProviderError> {
        let body = SendRequest {
            service_id: &self.config.service_id,
            template_id: &self.config.template_id,
            user_id: &self.config.public_key,
            template_params: params,
            access_token: self.config.access_token.as_deref(),
        };

        let response = self
            .client
            .post(self.config.api_url.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        if (200..300).contains(&status) {
            Ok(ProviderResponse { status, text })
        } else {
            Err(ProviderError::Status { status, text })
        }
    }
}

/// Category of a failed send, used to pick the visitor-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Network,
    RateLimited,
    Other,
}

impl FailureKind {
    /// Classify a failure by keywords in its message. Matching is
    /// case-sensitive.
    pub fn from_error_text(text: &str) -> Self {
        if text.contains("network") || text.contains("fetch") {
            Self::Network
        } else if text.contains("rate") || text.contains("limit") {
            Self::RateLimited
        } else {
            Self::Other
        }
    }

    /// Classify a provider error.
    ///
    /// A rejection is judged by its status code alone; the provider's
    /// response body is never scanned for keywords.
    pub fn classify(error: &ProviderError) -> Self {
        match error {
            ProviderError::Status { status: 429, .. } => Self::RateLimited,
            ProviderError::Status { .. } => Self::Other,
            ProviderError::Network(_) => Self::Network,
            ProviderError::Init(message) | ProviderError::Other(message) => {
                Self::from_error_text(message)
            }
        }
    }
}

/// What happened to a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Sent,
    RateLimited { retry_after_minutes: u64 },
    Failed(FailureKind),
}

/// Uniform result surfaced to the visitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchResult {
    pub success: bool,
    pub message: String,
    #[serde(skip)]
    pub outcome: DispatchOutcome,
}

impl DispatchResult {
    fn sent() -> Self {
        Self {
            success: true,
            message: SUCCESS_MESSAGE.to_string(),
            outcome: DispatchOutcome::Sent,
        }
    }

    fn rate_limited(retry_after_minutes: u64) -> Self {
        Self {
            success: false,
            message: format!(
                "Too many submissions. Please try again in {retry_after_minutes} minutes."
            ),
            outcome: DispatchOutcome::RateLimited {
                retry_after_minutes,
            },
        }
    }

    fn failed(kind: FailureKind, contact_email: &str) -> Self {
        let message = match kind {
            FailureKind::Network => NETWORK_ERROR_MESSAGE.to_string(),
            FailureKind::RateLimited => RATE_ERROR_MESSAGE.to_string(),
            FailureKind::Other if contact_email.is_empty() => {
                "Failed to send message. Please try again later.".to_string()
            }
            FailureKind::Other => format!(
                "Failed to send message. Please try again or contact me directly at {contact_email}"
            ),
        };
        Self {
            success: false,
            message,
            outcome: DispatchOutcome::Failed(kind),
        }
    }
}

/// Sends validated submissions to the provider under the submission gate.
pub struct EmailDispatcher {
    provider: Arc<dyn EmailProvider>,
    gate: Arc<SubmissionGate>,
    recipient: RecipientConfig,
}

impl EmailDispatcher {
    pub fn new(
        provider: Arc<dyn EmailProvider>,
        gate: Arc<SubmissionGate>,
        recipient: RecipientConfig,
    ) -> Self {
        Self {
            provider,
            gate,
            recipient,
        }
    }

    /// Send a validated submission from `client`.
    ///
    /// The caller must validate first; this only sanitizes. `client` picks
    /// the submission gate window the send is counted against.
    pub async fn send_email(&self, submission: &ContactSubmission, client: &str) -> DispatchResult {
        let clean = submission.sanitized();

        if let RateLimitResult::Limited {
            retry_after_minutes,
        } = self.gate.check_rate_limit(client)
        {
            return DispatchResult::rate_limited(retry_after_minutes);
        }

        let params = TemplateParams::new(&clean, &self.recipient);
        let error = match self.provider.send(&params).await {
            Ok(response) if response.status == 200 => {
                self.gate.record_submission(client);
                info!(from = %params.from_email, %client, "Contact message sent");
                return DispatchResult::sent();
            }
            Ok(response) => ProviderError::Status {
                status: response.status,
                text: response.text,
            },
            Err(error) => error,
        };

        let kind = FailureKind::classify(&error);
        warn!(%error, ?kind, %client, "Email sending failed");
        DispatchResult::failed(kind, &self.recipient.email)
    }
}

/// Provider setup guide, logged when the provider is not configured.
pub fn setup_instructions() -> String {
    r#"EmailJS setup:

1. Create an account at https://www.emailjs.com/
2. Add an email service (Gmail, Outlook, ...) and note its Service ID
3. Create an email template using these variables:
   {{from_name}} {{from_email}} {{phone}} {{subject}} {{message}}
   {{to_email}} {{to_name}} {{reply_to}}
4. Set EMAILJS_SERVICE_ID, EMAILJS_TEMPLATE_ID and EMAILJS_PUBLIC_KEY
   (and EMAILJS_ACCESS_TOKEN if the account restricts API access)
5. Set CONTACT_RECIPIENT_EMAIL to the address that should receive messages

Recommended template:

Subject: New Contact Form Message: {{subject}}

From: {{from_name}} ({{from_email}})
Phone: {{phone}}

Message:
{{message}}

---
Sent from the portfolio contact form. Reply to this email to answer {{from_name}}.
"#
    .to_string()
}
