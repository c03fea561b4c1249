// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Outcome tally for repeated-submission simulations.

use contact_relay::dispatcher::{DispatchOutcome, DispatchResult};
use std::collections::HashMap;
use std::fmt;

/// Outcome of one simulated submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Invalid,
    Sent,
    Gated,
    Failed,
}

impl From<&DispatchResult> for Outcome {
    fn from(result: &DispatchResult) -> Self {
        match result.outcome {
            DispatchOutcome::Sent => Outcome::Sent,
            DispatchOutcome::RateLimited { .. } => Outcome::Gated,
            DispatchOutcome::Failed(_) => Outcome::Failed,
        }
    }
}

/// Counts outcomes across a simulation.
#[derive(Debug, Default)]
pub struct SubmissionMetrics {
    outcomes: HashMap<Outcome, usize>,
}

impl SubmissionMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: Outcome) {
        *self.outcomes.entry(outcome).or_insert(0) += 1;
    }

    pub fn count(&self, outcome: Outcome) -> usize {
        self.outcomes.get(&outcome).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.outcomes.values().sum()
    }
}

impl fmt::Display for SubmissionMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "total={} sent={} gated={} invalid={} failed={}",
            self.total(),
            self.count(Outcome::Sent),
            self.count(Outcome::Gated),
            self.count(Outcome::Invalid),
            self.count(Outcome::Failed),
        )
    }
}
