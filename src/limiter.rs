// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Fixed-window submission gate.
//!
//! Allows at most `max_submissions` successful sends per window. The window
//! starts when the persisted state is (re)created and lasts exactly
//! `window_secs`; it does not slide.
//!
//! Each client gets its own window, stored under [`state_key`]. The gate is
//! advisory: it only sees the state in its own store, and any storage fault
//! lets the submission through rather than blocking a visitor.

use crate::clock::Clock;
use crate::config::RateLimitConfig;
use crate::storage::StateStore;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Storage key prefix of the persisted gate state.
pub const RATE_LIMIT_KEY: &str = "contact_form_submissions";

/// Storage key holding the gate state of one client.
///
/// Characters outside `[A-Za-z0-9]` become `_`, so an IP address maps to a
/// key every store accepts. An empty client falls back to the bare prefix.
pub fn state_key(client: &str) -> String {
    let client = client.trim();
    if client.is_empty() {
        return RATE_LIMIT_KEY.to_string();
    }
    let scope: String = client
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("{RATE_LIMIT_KEY}_{scope}")
}

/// Persisted gate state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitState {
    /// Successful submissions in the current window
    pub count: u32,
    /// Window end, in milliseconds since the Unix epoch
    pub reset_time: i64,
}

impl RateLimitState {
    fn fresh(now: DateTime<Utc>, window: Duration) -> Self {
        let reset = now.checked_add_signed(window).unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self {
            count: 0,
            reset_time: reset.timestamp_millis(),
        }
    }
}

/// Result of a gate check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitResult {
    /// Submission may proceed
    Allowed {
        /// Submissions left in the current window, when known
        remaining: Option<u32>,
    },
    /// Quota exhausted for the current window
    Limited {
        /// Whole minutes until the window resets, rounded up
        retry_after_minutes: u64,
    },
}

impl RateLimitResult {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }
}

/// Submission gate backed by a [`StateStore`].
pub struct SubmissionGate {
    config: RateLimitConfig,
    store: Arc<dyn StateStore>,
    clock: Arc<dyn Clock>,
}

impl SubmissionGate {
    /// Create a new gate over the given store and clock.
    pub fn new(config: RateLimitConfig, store: Arc<dyn StateStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            store,
            clock,
        }
    }

    fn window(&self) -> Duration {
        Duration::from_std(self.config.window_duration())
            .unwrap_or_else(|_| Duration::days(365 * 100))
    }

    /// Check whether `client` may submit again.
    ///
    /// Never increments the counter; only creates or resets the window.
    pub fn check_rate_limit(&self, client: &str) -> RateLimitResult {
        let now = self.clock.now();
        let max = self.config.max_submissions;
        let key = state_key(client);

        let state = match self.load(&key) {
            Ok(state) => state,
            Err(error) => {
                warn!(%error, %client, "Rate limit check failed, allowing submission");
                return RateLimitResult::Allowed { remaining: None };
            }
        };

        let state = match state {
            Some(state) if now.timestamp_millis() <= state.reset_time => state,
            previous => {
                let fresh = RateLimitState::fresh(now, self.window());
                if previous.is_some() {
                    debug!(
                        %client,
                        reset_time = fresh.reset_time,
                        "Rate limit window elapsed, resetting"
                    );
                }
                if let Err(error) = self.save(&key, &fresh) {
                    warn!(%error, "Failed to persist rate limit state");
                }
                return RateLimitResult::Allowed {
                    remaining: Some(max),
                };
            }
        };

        if state.count >= max {
            let remaining_ms = (state.reset_time - now.timestamp_millis()).max(0);
            let retry_after_minutes = (remaining_ms as u64).div_ceil(60_000);
            info!(
                %client,
                count = state.count,
                retry_after_minutes, "Submission rate limited"
            );
            return RateLimitResult::Limited {
                retry_after_minutes,
            };
        }

        RateLimitResult::Allowed {
            remaining: Some(max - state.count),
        }
    }

    /// Count one successful submission by `client` against its window.
    ///
    /// Does nothing when no state has been created yet.
    pub fn record_submission(&self, client: &str) {
        let key = state_key(client);
        let mut state = match self.load(&key) {
            Ok(Some(state)) => state,
            Ok(None) => return,
            Err(error) => {
                warn!(%error, "Rate limit update failed");
                return;
            }
        };

        state.count = state
            .count
            .saturating_add(1)
            .min(self.config.max_submissions);
        match self.save(&key, &state) {
            Ok(()) => debug!(%client, count = state.count, "Recorded submission"),
            Err(error) => warn!(%error, "Rate limit update failed"),
        }
    }

    /// Current persisted state of `client`, if any.
    pub fn current_state(&self, client: &str) -> Option<RateLimitState> {
        self.load(&state_key(client)).ok().flatten()
    }

    fn load(&self, key: &str) -> anyhow::Result<Option<RateLimitState>> {
        match self.store.get(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn save(&self, key: &str, state: &RateLimitState) -> anyhow::Result<()> {
        let raw = serde_json::to_string(state)?;
        self.store.set(key, &raw)?;
        Ok(())
    }
}
