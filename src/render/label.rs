//! Leaf labels

use serde_json::Value;
use std::sync::Arc;

use crate::models::{Parameter, TestCase};

/// `type name = value`, with literal newlines escaped
pub fn format_parameter(param: &Parameter) -> String {
    let value = match &param.value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    format!(
        "{} {} = {}",
        param.type_name,
        param.name,
        value.replace('\n', "\\n")
    )
}

/// Case label followed by its parameter list, if any
pub fn case_label(case: &TestCase) -> String {
    if case.parameters.is_empty() {
        return case.label().to_string();
    }
    let params: Vec<String> = case.parameters.iter().map(format_parameter).collect();
    format!("{} ({})", case.label(), params.join(", "))
}

/// Suffix telling `case` apart from holder siblings that render the same label.
///
/// The bare type name is used when it is enough, the namespace-qualified type
/// otherwise.
pub fn disambiguation_suffix(case: &Arc<TestCase>, siblings: &[Arc<TestCase>]) -> String {
    let label = case_label(case);
    let twins: Vec<&Arc<TestCase>> = siblings
        .iter()
        .filter(|other| {
            !Arc::ptr_eq(other, case)
                && !other.identity.same_declaring_type(&case.identity)
                && case_label(other) == label
        })
        .collect();

    if twins.is_empty() {
        return String::new();
    }

    let type_is_unique = twins
        .iter()
        .all(|other| other.identity.type_name != case.identity.type_name);
    if type_is_unique {
        format!(" [{}]", case.identity.type_name)
    } else {
        format!(" [{}]", case.identity.qualified_type())
    }
}
