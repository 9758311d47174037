//! Argument completion for prompts and resource references.

use serde::Deserialize;
use serde_json::Value;

use crate::error::McpError;
use crate::types::{CompleteResult, Completion};

/// Example completion values, keyed by argument name.
const COMPLETIONS: &[(&str, &[&str])] = &[
    ("style", &["casual", "formal", "technical", "friendly"]),
    ("temperature", &["0", "0.5", "0.7", "1.0"]),
    ("resourceId", &["1", "2", "3", "4", "5"]),
];

#[derive(Debug, Deserialize)]
struct CompleteParams {
    #[serde(rename = "ref")]
    reference: Reference,
    argument: Argument,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum Reference {
    #[serde(rename = "ref/resource")]
    Resource { uri: String },
    #[serde(rename = "ref/prompt")]
    Prompt {
        #[allow(dead_code)]
        name: String,
    },
}

#[derive(Debug, Deserialize)]
struct Argument {
    name: String,
    value: String,
}

fn lookup(name: &str) -> Option<&'static [&'static str]> {
    COMPLETIONS
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, values)| *values)
}

fn filtered(candidates: &[&str], prefix: &str) -> Vec<String> {
    candidates
        .iter()
        .filter(|value| value.starts_with(prefix))
        .map(|value| value.to_string())
        .collect()
}

/// Complete an argument value against the example completion sets.
pub fn complete(params: Option<Value>) -> Result<CompleteResult, McpError> {
    let params: CompleteParams = serde_json::from_value(params.unwrap_or(Value::Null))
        .map_err(|e| McpError::invalid_params(format!("invalid completion request: {e}")))?;

    let values = match &params.reference {
        Reference::Resource { uri } => {
            // Completing the {id} slot of the resource template
            if uri.rsplit('/').next().unwrap_or("").is_empty() {
                return Ok(empty());
            }
            match lookup("resourceId") {
                Some(candidates) => filtered(candidates, &params.argument.value),
                None => return Ok(empty()),
            }
        }
        Reference::Prompt { .. } => match lookup(&params.argument.name) {
            Some(candidates) => filtered(candidates, &params.argument.value),
            None => return Ok(empty()),
        },
    };

    let total = values.len();
    Ok(CompleteResult {
        completion: Completion {
            values,
            has_more: Some(false),
            total: Some(total),
        },
    })
}

fn empty() -> CompleteResult {
    CompleteResult {
        completion: Completion {
            values: Vec::new(),
            has_more: None,
            total: None,
        },
    }
}
