//! Test execution engine
//!
//! Provides concurrent batch execution and the headless runner built on it.

mod invoker;
mod parallel;
mod runner;

pub(crate) use invoker::panic_reason;
pub use invoker::{Invoker, RegistryInvoker};
pub use parallel::{BatchHandle, ExecutionEngine};
pub use runner::{CaseFilter, RunOutcome, TestRunner};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("No test cases match the given filter")]
    EmptySelection,
}
