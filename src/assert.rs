//! Assertions for registered tests
//!
//! Every helper returns `Err(AssertionFailed)` on mismatch. The execution
//! engine recognizes this error anywhere in a test's error chain and records
//! the case as `Failed` instead of `ExceptionThrown`.

use std::collections::HashMap;
use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::panic::Location;

/// Expected-vs-actual mismatch raised by test logic
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct AssertionFailed {
    pub message: String,
    /// `file:line:column` of the failing assertion
    pub location: String,
}

impl AssertionFailed {
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let caller = Location::caller();
        Self {
            message: message.into(),
            location: format!("{}:{}:{}", caller.file(), caller.line(), caller.column()),
        }
    }
}

pub type AssertResult = Result<(), AssertionFailed>;

#[track_caller]
fn failure(fail_message: &str, default: impl FnOnce() -> String) -> AssertionFailed {
    if fail_message.is_empty() {
        AssertionFailed::new(format!("Assertion Failed: {}", default()))
    } else {
        AssertionFailed::new(format!("Assertion Failed: {fail_message}"))
    }
}

/// `actual` must equal `expected`
#[track_caller]
pub fn same<T: PartialEq + Debug>(actual: T, expected: T, fail_message: &str) -> AssertResult {
    if actual == expected {
        return Ok(());
    }
    Err(failure(fail_message, || {
        format!("Expected {expected:?} but got {actual:?}")
    }))
}

#[track_caller]
pub fn is_true(condition: bool, fail_message: &str) -> AssertResult {
    if condition {
        return Ok(());
    }
    Err(failure(fail_message, || "Expected true but got false".to_string()))
}

/// Same length, then elementwise equality
#[track_caller]
pub fn same_seq<T: PartialEq + Debug>(actual: &[T], expected: &[T], fail_message: &str) -> AssertResult {
    if actual.len() != expected.len() {
        return Err(failure(fail_message, || {
            format!(
                "Expected {} elements but got {}",
                expected.len(),
                actual.len()
            )
        }));
    }

    for (index, (a, e)) in actual.iter().zip(expected).enumerate() {
        if a != e {
            return Err(failure(fail_message, || {
                format!("Expected {e:?} at index {index} but got {a:?}")
            }));
        }
    }

    Ok(())
}

/// Same size, then per-key equality
#[track_caller]
pub fn same_map<K, V>(
    actual: &HashMap<K, V>,
    expected: &HashMap<K, V>,
    fail_message: &str,
) -> AssertResult
where
    K: Eq + Hash + Debug,
    V: PartialEq + Debug,
{
    if actual.len() != expected.len() {
        return Err(failure(fail_message, || {
            format!(
                "Expected {} elements but got {}",
                expected.len(),
                actual.len()
            )
        }));
    }

    for (key, value) in expected {
        match actual.get(key) {
            Some(found) if found == value => {}
            found => {
                return Err(failure(fail_message, || {
                    format!("Expected {value:?} at key {key:?} but got {found:?}")
                }));
            }
        }
    }

    Ok(())
}

/// `action` must fail with exactly `expected_message`
#[track_caller]
pub fn fails<T, E, F>(action: F, expected_message: &str, fail_message: &str) -> AssertResult
where
    F: FnOnce() -> Result<T, E>,
    E: Display,
{
    match action() {
        Ok(_) => Err(failure(fail_message, || {
            format!("Expected error \"{expected_message}\" but no error was returned")
        })),
        Err(err) => {
            let message = err.to_string();
            if message == expected_message {
                Ok(())
            } else {
                Err(failure(fail_message, || {
                    format!("Expected error message \"{expected_message}\" but got \"{message}\"")
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same() {
        assert!(same(1, 1, "").is_ok());

        let err = same(2, 3, "").unwrap_err();
        assert_eq!(err.message, "Assertion Failed: Expected 3 but got 2");
        assert!(err.location.contains("assert.rs"));

        let err = same("a", "b", "custom").unwrap_err();
        assert_eq!(err.message, "Assertion Failed: custom");
    }

    #[test]
    fn test_same_seq() {
        assert!(same_seq(&[1, 2], &[1, 2], "").is_ok());
        assert_eq!(
            same_seq(&[1], &[1, 2], "").unwrap_err().message,
            "Assertion Failed: Expected 2 elements but got 1"
        );
        assert_eq!(
            same_seq(&[1, 5], &[1, 2], "").unwrap_err().message,
            "Assertion Failed: Expected 2 at index 1 but got 5"
        );
    }

    #[test]
    fn test_same_map() {
        let expected = HashMap::from([("a", 1), ("b", 2)]);
        let actual = HashMap::from([("a", 1), ("b", 3)]);
        assert!(same_map(&expected, &expected.clone(), "").is_ok());

        let err = same_map(&actual, &expected, "").unwrap_err();
        assert_eq!(
            err.message,
            "Assertion Failed: Expected 2 at key \"b\" but got Some(3)"
        );
    }

    #[test]
    fn test_fails() {
        let ok = fails(|| Err::<(), _>("boom"), "boom", "");
        assert!(ok.is_ok());

        let wrong = fails(|| Err::<(), _>("bang"), "boom", "").unwrap_err();
        assert!(wrong.message.contains("but got \"bang\""));

        let none = fails(|| Ok::<_, String>(()), "boom", "").unwrap_err();
        assert!(none.message.contains("no error was returned"));
    }

    #[test]
    fn test_is_true() {
        assert!(is_true(true, "").is_ok());
        assert_eq!(
            is_true(false, "must hold").unwrap_err().message,
            "Assertion Failed: must hold"
        );
    }
}
