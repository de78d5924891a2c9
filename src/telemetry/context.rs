//! Deadline-bearing context threaded through every outbound call.

use opentelemetry::Context;
use std::time::{Duration, Instant};

/// Trace context plus the absolute deadline of the inbound request.
///
/// Derived contexts keep the deadline of their parent, so every call made
/// while serving one request shares a single budget.
#[derive(Debug, Clone)]
pub struct CallContext {
    trace: Context,
    deadline: Instant,
}

impl CallContext {
    /// Start a budget of `budget` from now
    pub fn new(trace: Context, budget: Duration) -> Self {
        Self {
            trace,
            deadline: Instant::now() + budget,
        }
    }

    /// Same deadline, different trace parent
    pub fn with_trace(&self, trace: Context) -> Self {
        Self {
            trace,
            deadline: self.deadline,
        }
    }

    pub fn trace(&self) -> &Context {
        &self.trace
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Time left before the deadline, `None` once it has passed
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .checked_duration_since(Instant::now())
            .filter(|left| !left.is_zero())
    }

    /// Timeout for a single outbound call: the remaining budget, optionally
    /// capped by a per-call limit
    pub fn call_timeout(&self, per_call: Option<Duration>) -> Option<Duration> {
        let remaining = self.remaining()?;
        Some(per_call.map_or(remaining, |cap| cap.min(remaining)))
    }
}
