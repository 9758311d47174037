//! Tools, prompts, completion, and logging through the dispatch path.

use pretty_assertions::assert_eq;
use serde_json::json;

use crate::{call, server};

#[test]
fn initialize_reports_name_and_capabilities() {
    let (server, _bus) = server();
    let result = call(&server, "initialize", Some(json!({})), 1);
    assert_eq!(result["serverInfo"]["name"], "example-servers/everything");
    assert_eq!(result["protocolVersion"], "2024-11-05");
    assert_eq!(result["capabilities"]["resources"]["subscribe"], true);
}

#[test]
fn tools_list_and_call_roundtrip() {
    let (server, _bus) = server();

    let listed = call(&server, "tools/list", None, 1);
    let names: Vec<&str> = listed["tools"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["echo", "add"]);

    let echoed = call(
        &server,
        "tools/call",
        Some(json!({"name": "echo", "arguments": {"message": "hello"}})),
        2,
    );
    assert_eq!(echoed["content"][0]["text"], "Echo: hello");

    let summed = call(
        &server,
        "tools/call",
        Some(json!({"name": "add", "arguments": {"a": 1.5, "b": 2.5}})),
        3,
    );
    assert_eq!(summed["content"][0]["text"], "The sum of 1.5 and 2.5 is 4.");
}

#[test]
fn prompts_list_and_get() {
    let (server, _bus) = server();

    let listed = call(&server, "prompts/list", None, 1);
    let prompts = listed["prompts"].as_array().unwrap();
    assert_eq!(prompts.len(), 2);
    assert_eq!(prompts[0]["name"], "simple_prompt");
    assert!(prompts[0].get("arguments").is_none() || prompts[0]["arguments"].is_null());
    assert_eq!(prompts[1]["arguments"][0]["required"], true);

    let rendered = call(
        &server,
        "prompts/get",
        Some(json!({
            "name": "complex_prompt",
            "arguments": {"temperature": "0.5", "style": "formal"}
        })),
        2,
    );
    let messages = rendered["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["role"], "user");
    assert!(messages[0]["content"]["text"]
        .as_str()
        .unwrap()
        .contains("temperature=0.5"));
    assert_eq!(messages[1]["role"], "assistant");
}

#[test]
fn prompt_missing_required_argument_fails() {
    let (server, _bus) = server();
    let req = everything_mcp::JsonRpcRequest::new(
        "prompts/get",
        Some(json!({"name": "complex_prompt", "arguments": {"style": "casual"}})),
        1,
    );
    let resp = server.handle(&req).unwrap();
    assert_eq!(resp.error.expect("error response").code, -32602);
}

#[test]
fn completion_filters_known_argument_values() {
    let (server, _bus) = server();
    let result = call(
        &server,
        "completion/complete",
        Some(json!({
            "ref": {"type": "ref/prompt", "name": "complex_prompt"},
            "argument": {"name": "style", "value": "c"}
        })),
        1,
    );
    assert_eq!(result["completion"]["values"], json!(["casual"]));
    assert_eq!(result["completion"]["hasMore"], false);
}

#[test]
fn set_level_is_stored_and_announced() {
    let (server, bus) = server();
    let mut rx = bus.subscribe();

    let _ = call(
        &server,
        "logging/setLevel",
        Some(json!({"level": "error"})),
        1,
    );
    assert_eq!(
        server.log_level(),
        everything_mcp::LoggingLevel::Error
    );

    let emitted = rx.try_recv().expect("notification on bus");
    assert_eq!(emitted["method"], "notifications/message");
    assert_eq!(emitted["params"]["logger"], "test-server");
}
