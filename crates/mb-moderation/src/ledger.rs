//! # UserLedger
//!
//! Per-user violation state: a single decaying "heat" scalar plus a queue
//! of recent reasons used only to render justification text.
//!
//! The two decay mechanisms are deliberately separate. The threshold
//! decision runs on the pooled `heat` value, which decays continuously
//! since the last update. The reason queue prunes entries individually,
//! each against its own timestamp. Unifying them changes observable
//! timeout timing, so don't.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
struct ReasonEntry {
    points: i32,
    reason: String,
    timestamp: DateTime<Utc>,
}

/// Decaying point accumulator for one user. Created lazily on the first
/// recorded violation, reset whenever a timeout is issued from points.
#[derive(Debug, Clone)]
pub struct UserLedger {
    heat: f64,
    last_update: DateTime<Utc>,
    recent_reasons: VecDeque<ReasonEntry>,
}

impl UserLedger {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { heat: 0.0, last_update: now, recent_reasons: VecDeque::new() }
    }

    /// Current heat without recording anything. Applies no mutation.
    pub fn heat(&self) -> f64 {
        self.heat
    }

    pub fn reason_count(&self) -> usize {
        self.recent_reasons.len()
    }

    /// Records a violation and returns the resulting heat.
    ///
    /// Decay is applied before the addition and heat is clamped at zero,
    /// so idle time can never push a user into negative territory.
    pub fn record_violation(
        &mut self,
        points: i32,
        reason: &str,
        now: DateTime<Utc>,
        decay_per_second: f64,
    ) -> f64 {
        // `now` can sit before `last_update`: the wall clock may step
        // backwards, and concurrent same-user checks capture their
        // timestamps before entering the critical section. Negative
        // elapsed time must neither inflate heat nor rewind the decay
        // window.
        let elapsed_secs =
            ((now - self.last_update).num_milliseconds() as f64 / 1000.0).max(0.0);
        self.heat = (self.heat - decay_per_second * elapsed_secs).max(0.0);
        self.last_update = self.last_update.max(now);
        self.heat += f64::from(points);

        self.recent_reasons.push_back(ReasonEntry {
            points,
            reason: reason.to_owned(),
            timestamp: now,
        });
        self.prune_decayed(now, decay_per_second);

        self.heat
    }

    /// Drops leading reason entries that have individually fully decayed:
    /// `(now - entry.timestamp) * rate >= entry.points`. Never touches heat.
    fn prune_decayed(&mut self, now: DateTime<Utc>, decay_per_second: f64) {
        while let Some(front) = self.recent_reasons.front() {
            let age_secs = (now - front.timestamp).num_milliseconds() as f64 / 1000.0;
            if age_secs * decay_per_second >= f64::from(front.points) {
                self.recent_reasons.pop_front();
            } else {
                break;
            }
        }
    }

    /// Joins the surviving reasons into one justification string:
    /// comma-separated, last item joined with "and" ("A, B and C").
    pub fn compose_reason(&self) -> String {
        let reasons: Vec<&str> = self.recent_reasons.iter().map(|e| e.reason.as_str()).collect();
        match reasons.as_slice() {
            [] => String::new(),
            [only] => (*only).to_string(),
            [head @ .., last] => format!("{} and {}", head.join(", "), last),
        }
    }

    /// Clears heat and reasons in one step, the instant a timeout fires.
    pub fn reset(&mut self) {
        self.heat = 0.0;
        self.recent_reasons.clear();
    }
}
