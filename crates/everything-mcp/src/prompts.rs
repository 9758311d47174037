//! Demo prompts: `simple_prompt` and `complex_prompt`.

use serde_json::Value;

use crate::error::McpError;
use crate::types::{
    Content, GetPromptResult, ListPromptsResult, Prompt, PromptArgument, PromptMessage, Role,
};

pub const SIMPLE: &str = "simple_prompt";
pub const COMPLEX: &str = "complex_prompt";

pub fn list_prompts() -> ListPromptsResult {
    ListPromptsResult {
        prompts: vec![
            Prompt {
                name: SIMPLE.to_string(),
                description: "A prompt without arguments".to_string(),
                arguments: None,
            },
            Prompt {
                name: COMPLEX.to_string(),
                description: "A prompt with arguments".to_string(),
                arguments: Some(vec![
                    PromptArgument {
                        name: "temperature".to_string(),
                        description: "Temperature setting".to_string(),
                        required: true,
                    },
                    PromptArgument {
                        name: "style".to_string(),
                        description: "Output style".to_string(),
                        required: false,
                    },
                ]),
            },
        ],
    }
}

/// Render a prompt by name with the given arguments.
pub fn get_prompt(name: &str, args: Option<&Value>) -> Result<GetPromptResult, McpError> {
    match name {
        SIMPLE => Ok(GetPromptResult {
            messages: vec![PromptMessage {
                role: Role::User,
                content: Content::text("This is a simple prompt without arguments."),
            }],
        }),
        COMPLEX => {
            let temperature = args
                .and_then(|a| a.get("temperature"))
                .and_then(Value::as_str)
                .ok_or_else(|| {
                    McpError::invalid_params("missing required argument: temperature")
                })?;
            let style = args
                .and_then(|a| a.get("style"))
                .and_then(Value::as_str)
                .unwrap_or_default();

            Ok(GetPromptResult {
                messages: vec![
                    PromptMessage {
                        role: Role::User,
                        content: Content::text(format!(
                            "This is a complex prompt with arguments: temperature={temperature}, style={style}"
                        )),
                    },
                    PromptMessage {
                        role: Role::Assistant,
                        content: Content::text(
                            "I understand. You've provided a complex prompt with temperature \
                             and style arguments. How would you like me to proceed?",
                        ),
                    },
                ],
            })
        }
        other => Err(McpError::invalid_params(format!("Unknown prompt: {other}"))),
    }
}
