//! Test invocation and outcome classification
//!
//! The `Invoker` is the seam between the engine and the code under test. The
//! default implementation calls the handles resolved by the registry.

use serde_json::Value;
use std::any::Any;
use std::backtrace::BacktraceStatus;
use std::collections::HashMap;
use std::sync::Arc;

use crate::assert::AssertionFailed;
use crate::models::{Identity, Status};
use crate::registry::{Registry, TestFn, TestFuture};

/// Executes a single test given its identity and resolved arguments
pub trait Invoker: Send + Sync + 'static {
    fn invoke(&self, identity: &Identity, args: Vec<Value>) -> TestFuture;
}

/// Invoker backed by the registry's identity → handle map
#[derive(Clone)]
pub struct RegistryInvoker {
    handles: Arc<HashMap<Identity, TestFn>>,
}

impl RegistryInvoker {
    pub fn new(handles: Arc<HashMap<Identity, TestFn>>) -> Self {
        Self { handles }
    }

    pub fn from_registry(registry: &Registry) -> Self {
        Self::new(registry.handles())
    }
}

impl Invoker for RegistryInvoker {
    fn invoke(&self, identity: &Identity, args: Vec<Value>) -> TestFuture {
        match self.handles.get(identity) {
            Some(handle) => handle(args),
            None => {
                let identity = identity.clone();
                Box::pin(async move { Err(anyhow::anyhow!("no test registered for {identity}")) })
            }
        }
    }
}

const INDENT: &str = "    ";

/// A labelled block with every body line indented
fn block(label: &str, body: &str) -> String {
    let mut out = format!("{label}:\n");
    for line in body.lines() {
        out.push_str(INDENT);
        out.push_str(line);
        out.push('\n');
    }
    out
}

/// Map a test error to its terminal status and failure message
pub(crate) fn classify_error(err: &anyhow::Error) -> (Status, String) {
    if let Some(assertion) = err
        .chain()
        .find_map(|cause| cause.downcast_ref::<AssertionFailed>())
    {
        let body = format!("{}\nat {}", assertion.message, assertion.location);
        return (Status::Failed, block("Assertion failed", &body));
    }

    let mut body = err.to_string();
    let backtrace = err.backtrace();
    if backtrace.status() == BacktraceStatus::Captured {
        body.push('\n');
        body.push_str(&backtrace.to_string());
    }

    let mut message = block("Exception", &body);
    for cause in err.chain().skip(1) {
        message.push_str(&block("Inner exception", &cause.to_string()));
    }

    (Status::ExceptionThrown, message)
}

/// Failure message for a test that panicked
pub(crate) fn classify_panic(payload: Box<dyn Any + Send>) -> (Status, String) {
    let reason = panic_reason(&*payload);
    (
        Status::ExceptionThrown,
        block("Exception", &format!("test panicked: {reason}")),
    )
}

/// Message carried by a panic payload
pub(crate) fn panic_reason(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic payload"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert;
    use anyhow::Context;
    use std::io;

    #[test]
    fn test_assertion_is_failed() {
        let err: anyhow::Error = assert::same("x", "y", "x≠y").unwrap_err().into();
        let (status, message) = classify_error(&err);
        assert_eq!(status, Status::Failed);
        assert!(message.starts_with("Assertion failed:\n"));
        assert!(message.contains("    Assertion Failed: x≠y"));
        assert!(message.contains("    at "));
    }

    #[test]
    fn test_nested_assertion_is_failed() {
        let err = Err::<(), _>(assert::same(1, 2, "").unwrap_err())
            .context("while checking totals")
            .unwrap_err();
        let (status, _) = classify_error(&err);
        assert_eq!(status, Status::Failed);
    }

    #[test]
    fn test_wrapped_error_has_inner_block() {
        let err = Err::<(), _>(io::Error::new(io::ErrorKind::Other, "io fail"))
            .context("could not load fixture")
            .unwrap_err();
        let (status, message) = classify_error(&err);
        assert_eq!(status, Status::ExceptionThrown);
        assert!(message.starts_with("Exception:\n    could not load fixture"));
        assert!(message.contains("Inner exception:\n    io fail"));
    }

    #[test]
    fn test_plain_error_has_single_block() {
        let err = anyhow::anyhow!("boom");
        let (_, message) = classify_error(&err);
        assert!(!message.contains("Inner exception"));
    }

    #[test]
    fn test_panic_payload() {
        let (status, message) = classify_panic(Box::new("kaboom"));
        assert_eq!(status, Status::ExceptionThrown);
        assert!(message.contains("test panicked: kaboom"));

        let (_, message) = classify_panic(Box::new(format!("index {} out of range", 3)));
        assert!(message.contains("test panicked: index 3 out of range"));
    }

    #[tokio::test]
    async fn test_unknown_identity_errors() {
        let invoker = RegistryInvoker::new(Arc::new(HashMap::new()));
        let result = invoker
            .invoke(&Identity::new("", "Missing", "gone"), vec![])
            .await;
        assert!(result.is_err());
    }
}
