// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Test harness for the contact relay.
//!
//! Provides a scripted email provider, a pipeline builder over in-memory
//! state and a mock clock, and generators for hostile form input.

#![allow(dead_code)]

pub mod generators;
pub mod metrics;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use contact_relay::{
    clock::MockClock,
    config::{RateLimitConfig, RecipientConfig},
    dispatcher::{EmailDispatcher, EmailProvider, ProviderError, ProviderResponse, TemplateParams},
    limiter::SubmissionGate,
    models::ContactSubmission,
    storage::MemoryStore,
};
use std::sync::{Arc, Mutex};

/// Client identity used by single-visitor tests.
pub const CLIENT: &str = "203.0.113.7";

/// How the scripted provider answers.
#[derive(Debug, Clone)]
pub enum Reply {
    Status(u16),
    Fail(String),
}

/// Email provider that answers from a script and records every call.
#[derive(Debug)]
pub struct StubProvider {
    reply: Mutex<Reply>,
    sent: Mutex<Vec<TemplateParams>>,
}

impl StubProvider {
    pub fn new(reply: Reply) -> Self {
        Self {
            reply: Mutex::new(reply),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn ok() -> Self {
        Self::new(Reply::Status(200))
    }

    pub fn set_reply(&self, reply: Reply) {
        *self.reply.lock().unwrap() = reply;
    }

    pub fn calls(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn sent(&self) -> Vec<TemplateParams> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmailProvider for StubProvider {
    async fn send(&self, params: &TemplateParams) -> Result<ProviderResponse, ProviderError> {
        self.sent.lock().unwrap().push(params.clone());
        match self.reply.lock().unwrap().clone() {
            Reply::Status(status) => Ok(ProviderResponse {
                status,
                text: "OK".to_string(),
            }),
            Reply::Fail(message) => Err(ProviderError::Other(message)),
        }
    }
}

/// Everything a pipeline test needs to poke at.
pub struct Pipeline {
    pub provider: Arc<StubProvider>,
    pub store: Arc<MemoryStore>,
    pub clock: MockClock,
    pub gate: Arc<SubmissionGate>,
    pub dispatcher: EmailDispatcher,
}

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, 15, 9, 26).unwrap()
}

pub fn recipient() -> RecipientConfig {
    RecipientConfig {
        email: "owner@example.com".to_string(),
        name: "Site Owner".to_string(),
    }
}

pub fn pipeline(reply: Reply) -> Pipeline {
    pipeline_with(reply, RateLimitConfig::default())
}

pub fn pipeline_with(reply: Reply, rate_limit: RateLimitConfig) -> Pipeline {
    let provider = Arc::new(StubProvider::new(reply));
    let store = Arc::new(MemoryStore::new());
    let clock = MockClock::new(start_time());
    let gate = Arc::new(SubmissionGate::new(
        rate_limit,
        store.clone(),
        Arc::new(clock.clone()),
    ));
    let dispatcher = EmailDispatcher::new(provider.clone(), gate.clone(), recipient());

    Pipeline {
        provider,
        store,
        clock,
        gate,
        dispatcher,
    }
}

impl Pipeline {
    /// Submissions counted in [`CLIENT`]'s current window.
    pub fn count(&self) -> u32 {
        self.gate.current_state(CLIENT).map(|s| s.count).unwrap_or(0)
    }
}

pub fn valid_submission() -> ContactSubmission {
    ContactSubmission {
        name: "Grace Hopper".to_string(),
        email: "grace@example.com".to_string(),
        phone: Some("+1 (555) 010-0199".to_string()),
        subject: "Compiler question".to_string(),
        message: "Could we talk about your portfolio project?".to_string(),
    }
}
