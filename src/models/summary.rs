//! Batch summary
//!
//! Counts of terminal states after an execution batch has settled.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use super::{Status, TestCase};

/// Summary of one execution batch
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BatchSummary {
    pub started_at: DateTime<Utc>,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub exceptions: usize,
    /// Cases skipped because another batch was already running them
    pub rejected: usize,
    pub total_duration_ms: u64,
}

impl BatchSummary {
    pub fn new(
        started_at: DateTime<Utc>,
        cases: &[Arc<TestCase>],
        rejected: usize,
        total_duration_ms: u64,
    ) -> Self {
        let statuses: Vec<Status> = cases.iter().map(|c| c.status()).collect();
        let count = |status: Status| statuses.iter().filter(|s| **s == status).count();

        Self {
            started_at,
            total: cases.len(),
            succeeded: count(Status::Succeeded),
            failed: count(Status::Failed),
            exceptions: count(Status::ExceptionThrown),
            rejected,
            total_duration_ms,
        }
    }

    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.succeeded as f64 / self.total as f64) * 100.0
        }
    }

    pub fn is_all_passed(&self) -> bool {
        self.succeeded == self.total
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Total: {} | Pass: {} | Fail: {} | Error: {} | Pass Rate: {:.1}% | Duration: {}ms",
            self.total,
            self.succeeded,
            self.failed,
            self.exceptions,
            self.pass_rate(),
            self.total_duration_ms
        )?;
        if self.rejected > 0 {
            write!(f, " | Rejected: {}", self.rejected)?;
        }
        Ok(())
    }
}
