//! Data models for test exploration
//!
//! This module contains the test case records shared by the trees, the
//! execution engine and the renderer.

mod summary;
mod test_case;

pub use summary::BatchSummary;
pub use test_case::{
    CaseResult, CategoryPath, Identity, Parameter, Status, TestCase, NAMESPACE_SEPARATOR,
    UNCATEGORIZED,
};
