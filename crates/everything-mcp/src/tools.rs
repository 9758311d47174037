//! Demo tools: `echo` and `add`.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::McpError;
use crate::types::{CallToolResult, Content, ListToolsResult, Tool};

pub const ECHO: &str = "echo";
pub const ADD: &str = "add";

#[derive(Debug, Deserialize)]
struct EchoArgs {
    message: String,
}

#[derive(Debug, Deserialize)]
struct AddArgs {
    a: f64,
    b: f64,
}

pub fn list_tools() -> ListToolsResult {
    ListToolsResult {
        tools: vec![
            Tool {
                name: ECHO.to_string(),
                description: "Echoes back the input".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "message": {
                            "type": "string",
                            "description": "Message to echo"
                        }
                    },
                    "required": ["message"]
                }),
            },
            Tool {
                name: ADD.to_string(),
                description: "Adds two numbers".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "a": { "type": "number", "description": "First number" },
                        "b": { "type": "number", "description": "Second number" }
                    },
                    "required": ["a", "b"]
                }),
            },
        ],
    }
}

/// Invoke a tool by name with the given arguments.
pub fn call_tool(name: &str, args: Option<Value>) -> Result<CallToolResult, McpError> {
    match name {
        ECHO => {
            let args: EchoArgs = parse_args(args)?;
            Ok(CallToolResult {
                content: vec![Content::text(format!("Echo: {}", args.message))],
            })
        }
        ADD => {
            let args: AddArgs = parse_args(args)?;
            let sum = args.a + args.b;
            Ok(CallToolResult {
                content: vec![Content::text(format!(
                    "The sum of {} and {} is {}.",
                    args.a, args.b, sum
                ))],
            })
        }
        other => Err(McpError::invalid_params(format!("Unknown tool: {other}"))),
    }
}

fn parse_args<T: serde::de::DeserializeOwned>(args: Option<Value>) -> Result<T, McpError> {
    serde_json::from_value(args.unwrap_or(Value::Null))
        .map_err(|e| McpError::invalid_params(format!("invalid arguments: {e}")))
}
