//! Parallel test execution
//!
//! Runs a batch of cases concurrently, one task per case, and records each
//! outcome on the case itself.

use chrono::Utc;
use futures::future::join_all;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::invoker::{classify_error, classify_panic, Invoker};
use crate::models::{BatchSummary, CaseResult, Status, TestCase};
use crate::utils::Timer;

/// Concurrent execution engine
#[derive(Clone)]
pub struct ExecutionEngine {
    invoker: Arc<dyn Invoker>,
    limiter: Option<Arc<Semaphore>>,
}

impl ExecutionEngine {
    /// Unbounded fan-out: every case of a batch starts immediately
    pub fn new(invoker: impl Invoker) -> Self {
        Self {
            invoker: Arc::new(invoker),
            limiter: None,
        }
    }

    /// Cap the number of cases executing at once across all batches
    pub fn with_max_concurrent(mut self, max_concurrent: Option<usize>) -> Self {
        self.limiter = max_concurrent
            .filter(|n| *n > 0)
            .map(|n| Arc::new(Semaphore::new(n)));
        self
    }

    /// Start a batch without waiting for it.
    ///
    /// Claimed cases are `Running` when this returns. Cases that are already
    /// running in another batch are rejected and left untouched.
    pub fn start(&self, cases: Vec<Arc<TestCase>>) -> BatchHandle {
        let started_at = Utc::now();
        let timer = Timer::start("batch");

        let mut claimed = Vec::with_capacity(cases.len());
        let mut rejected = 0;
        for case in cases {
            if case.try_claim() {
                claimed.push(case);
            } else {
                warn!("Skipping {}: already running", case);
                rejected += 1;
            }
        }

        info!(
            "Starting batch of {} cases ({} rejected)",
            claimed.len(),
            rejected
        );

        let handles: Vec<JoinHandle<()>> = claimed
            .iter()
            .map(|case| {
                let case = Arc::clone(case);
                let invoker = Arc::clone(&self.invoker);
                let limiter = self.limiter.clone();

                tokio::spawn(async move {
                    let _permit = match limiter {
                        Some(semaphore) => semaphore.acquire_owned().await.ok(),
                        None => None,
                    };
                    execute_case(&case, invoker.as_ref()).await;
                })
            })
            .collect();

        let cases = claimed.clone();
        let task = tokio::spawn(async move {
            for joined in join_all(handles).await {
                if let Err(e) = joined {
                    error!("Case task aborted: {}", e);
                }
            }

            let summary = BatchSummary::new(started_at, &cases, rejected, timer.elapsed_ms());
            info!(
                "Batch completed in {}ms - Pass: {}/{} ({:.1}%)",
                summary.total_duration_ms,
                summary.succeeded,
                summary.total,
                summary.pass_rate()
            );
            summary
        });

        BatchHandle {
            task,
            cases: claimed,
            rejected,
            started_at,
        }
    }

    /// Run a batch and wait until every claimed case has settled
    pub async fn run(&self, cases: Vec<Arc<TestCase>>) -> BatchSummary {
        self.start(cases).wait().await
    }
}

/// Invoke one claimed case and record its terminal state
async fn execute_case(case: &TestCase, invoker: &dyn Invoker) {
    debug!("Starting {}", case);
    let timer = Timer::start(case.label());

    let outcome = AssertUnwindSafe(async {
        invoker
            .invoke(&case.identity, case.parameter_values())
            .await
    })
    .catch_unwind()
    .await;

    let duration = timer.stop();
    let (status, result) = match outcome {
        Ok(Ok(())) => (Status::Succeeded, CaseResult::success(duration)),
        Ok(Err(err)) => {
            let (status, message) = classify_error(&err);
            (status, CaseResult::failure(duration, message))
        }
        Err(payload) => {
            let (status, message) = classify_panic(payload);
            (status, CaseResult::failure(duration, message))
        }
    };

    debug!("{} finished: {}", case, status);
    case.settle(status, result);
}

/// Completion handle of a started batch
pub struct BatchHandle {
    task: JoinHandle<BatchSummary>,
    cases: Vec<Arc<TestCase>>,
    rejected: usize,
    started_at: chrono::DateTime<Utc>,
}

impl BatchHandle {
    /// Cases claimed by this batch
    pub fn cases(&self) -> &[Arc<TestCase>] {
        &self.cases
    }

    pub fn rejected(&self) -> usize {
        self.rejected
    }

    /// Take the summary if the batch has settled, otherwise hand the handle back
    pub fn finish(mut self) -> Result<BatchSummary, BatchHandle> {
        if !self.task.is_finished() {
            return Err(self);
        }
        match (&mut self.task).now_or_never() {
            Some(joined) => Ok(self.summary_from(joined)),
            None => Err(self),
        }
    }

    /// Wait for every claimed case to settle
    pub async fn wait(mut self) -> BatchSummary {
        let joined = (&mut self.task).await;
        self.summary_from(joined)
    }

    fn summary_from(&self, joined: Result<BatchSummary, tokio::task::JoinError>) -> BatchSummary {
        joined.unwrap_or_else(|e| {
            error!("Batch task failed: {}", e);
            BatchSummary::new(self.started_at, &self.cases, self.rejected, 0)
        })
    }
}
