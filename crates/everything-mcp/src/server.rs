//! The Everything demo server: all capability handlers wired into one
//! dispatch registry, plus the periodic resource-update notifier.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use everything_core::NotificationSender;

use crate::error::McpError;
use crate::jsonrpc::{JsonRpcRequest, JsonRpcResponse};
use crate::registry::HandlerRegistry;
use crate::resources::ResourceStore;
use crate::types::{Implementation, InitializeResult, LoggingLevel, ServerCapabilities};
use crate::{completion, prompts, sampling, tools, PROTOCOL_VERSION, SERVER_NAME};

/// How often subscribed resources report an update.
pub const RESOURCE_UPDATE_PERIOD: Duration = Duration::from_secs(5);

/// State shared between the registered handlers.
struct Shared {
    resources: ResourceStore,
    subscriptions: RwLock<HashSet<String>>,
    log_level: RwLock<LoggingLevel>,
    notifications: NotificationSender,
}

/// The demo server: a registry of request handlers over shared state.
///
/// Cheap to share behind an `Arc`; dispatch never blocks and holds no lock
/// across handler boundaries.
pub struct EverythingServer {
    registry: HandlerRegistry,
    shared: Arc<Shared>,
}

impl EverythingServer {
    pub fn new(notifications: NotificationSender) -> Self {
        let shared = Arc::new(Shared {
            resources: ResourceStore::new(),
            subscriptions: RwLock::new(HashSet::new()),
            log_level: RwLock::new(LoggingLevel::Debug),
            notifications,
        });

        let registry = build_registry(shared.clone());
        info!("[Everything] Server ready ({} methods)", registry.methods().len());
        Self { registry, shared }
    }

    /// Dispatch one request. `None` for notifications.
    pub fn handle(&self, request: &JsonRpcRequest) -> Option<JsonRpcResponse> {
        self.registry.dispatch(request)
    }

    /// Registered method names (for diagnostics).
    pub fn methods(&self) -> Vec<&str> {
        self.registry.methods()
    }

    /// Snapshot of currently subscribed resource URIs.
    pub fn subscriptions(&self) -> Vec<String> {
        self.shared.subscriptions.read().iter().cloned().collect()
    }

    /// Current client-requested logging threshold.
    pub fn log_level(&self) -> LoggingLevel {
        *self.shared.log_level.read()
    }

    /// Start the periodic resource-update notifier.
    ///
    /// Every tick, one `notifications/resources/updated` notification is
    /// emitted on the bus per subscribed URI. The returned handle cancels
    /// the task; stopping twice is safe.
    pub fn start_update_notifier(&self, period: Duration) -> UpdateNotifier {
        let token = CancellationToken::new();
        let task_token = token.clone();
        let shared = self.shared.clone();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = task_token.cancelled() => {
                        debug!("[Everything] Update notifier stopped");
                        break;
                    }
                    _ = interval.tick() => {
                        let uris: Vec<String> =
                            shared.subscriptions.read().iter().cloned().collect();
                        for uri in uris {
                            let note = JsonRpcRequest::notification(
                                "notifications/resources/updated",
                                Some(json!({ "uri": uri })),
                            );
                            if let Ok(value) = serde_json::to_value(&note) {
                                shared.notifications.emit(value);
                            }
                        }
                    }
                }
            }
        });

        UpdateNotifier { token }
    }
}

/// Handle for the resource-update notifier task.
pub struct UpdateNotifier {
    token: CancellationToken,
}

impl UpdateNotifier {
    /// Stop the notifier. Idempotent.
    pub fn shutdown(&self) {
        self.token.cancel();
    }
}

fn build_registry(shared: Arc<Shared>) -> HandlerRegistry {
    let mut registry = HandlerRegistry::new();

    registry.register("initialize", |_params| {
        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities::everything(),
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                version: "1.0.0".to_string(),
            },
        };
        to_result(&result)
    });

    registry.register("ping", |_params| Ok(json!({})));

    registry.register("tools/list", |_params| to_result(&tools::list_tools()));

    registry.register("tools/call", |params| {
        let (name, args) = split_named_params(params)?;
        to_result(&tools::call_tool(&name, args)?)
    });

    {
        let shared = shared.clone();
        registry.register("resources/list", move |params| {
            let cursor = params
                .as_ref()
                .and_then(|p| p.get("cursor"))
                .and_then(Value::as_str)
                .map(str::to_string);
            to_result(&shared.resources.list(cursor.as_deref()))
        });
    }

    {
        let shared = shared.clone();
        registry.register("resources/templates/list", move |_params| {
            to_result(&shared.resources.templates())
        });
    }

    {
        let shared = shared.clone();
        registry.register("resources/read", move |params| {
            let uri = require_str_param(params.as_ref(), "uri")?;
            to_result(&shared.resources.read(&uri)?)
        });
    }

    {
        let shared = shared.clone();
        registry.register("resources/subscribe", move |params| {
            let uri = require_str_param(params.as_ref(), "uri")?;
            shared.subscriptions.write().insert(uri.clone());
            debug!(%uri, "[Everything] Resource subscribed");

            // The reference server asks the client for a completion when a
            // subscription starts; emitted fire-and-forget on the bus.
            let request =
                sampling::create_message_request("A new subscription was started", &uri, None);
            if let Ok(value) = serde_json::to_value(&request) {
                shared.notifications.emit(value);
            }
            Ok(json!({}))
        });
    }

    {
        let shared = shared.clone();
        registry.register("resources/unsubscribe", move |params| {
            let uri = require_str_param(params.as_ref(), "uri")?;
            shared.subscriptions.write().remove(&uri);
            debug!(%uri, "[Everything] Resource unsubscribed");
            Ok(json!({}))
        });
    }

    registry.register("prompts/list", |_params| to_result(&prompts::list_prompts()));

    registry.register("prompts/get", |params| {
        let (name, args) = split_named_params(params)?;
        to_result(&prompts::get_prompt(&name, args.as_ref())?)
    });

    registry.register("completion/complete", |params| {
        to_result(&completion::complete(params)?)
    });

    {
        let shared = shared.clone();
        registry.register("logging/setLevel", move |params| {
            let level: LoggingLevel = serde_json::from_value(
                params
                    .as_ref()
                    .and_then(|p| p.get("level"))
                    .cloned()
                    .ok_or_else(|| McpError::invalid_params("missing level"))?,
            )
            .map_err(|e| McpError::invalid_params(format!("invalid level: {e}")))?;

            *shared.log_level.write() = level;

            let note = JsonRpcRequest::notification(
                "notifications/message",
                Some(json!({
                    "level": "debug",
                    "logger": "test-server",
                    "data": format!("Logging level set to: {level}"),
                })),
            );
            if let Ok(value) = serde_json::to_value(&note) {
                shared.notifications.emit(value);
            }
            Ok(json!({}))
        });
    }

    registry
}

fn to_result<T: serde::Serialize>(value: &T) -> Result<Value, McpError> {
    serde_json::to_value(value).map_err(|e| McpError::internal(e.to_string()))
}

/// Pull `name` + `arguments` out of tool/prompt call params.
fn split_named_params(params: Option<Value>) -> Result<(String, Option<Value>), McpError> {
    let params = params.ok_or_else(|| McpError::invalid_params("missing params"))?;
    let name = params
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| McpError::invalid_params("missing name"))?
        .to_string();
    let args = params.get("arguments").cloned();
    Ok((name, args))
}

fn require_str_param(params: Option<&Value>, key: &str) -> Result<String, McpError> {
    params
        .and_then(|p| p.get(key))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| McpError::invalid_params(format!("missing {key}")))
}
