//! HTTP handlers for the gateway server.

use std::convert::Infallible;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{
        sse::{Event, Sse},
        IntoResponse, Json, Response,
    },
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use everything_core::{SessionId, StreamError};
use everything_mcp::JsonRpcRequest;

use super::state::AppState;

/// Header carrying the session identity, on both the stream response and
/// inbound message requests.
pub const CONNECTION_ID_HEADER: &str = "x-connection-id";

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Health check endpoint
pub async fn health() -> Json<HealthResponse> {
    debug!("[Gateway] Health check");
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Stream endpoint query parameters
#[derive(Debug, Deserialize)]
pub struct StreamQuery {
    /// Optional resumption identity from a previous stream
    pub session: Option<String>,
}

/// `GET /sse` - open a long-lived SSE stream.
///
/// Creates or resumes the session, attaches as its single live sink, and
/// emits `data: <json>\n\n` frames until the client goes away. The
/// assigned id is exposed in the `X-Connection-Id` response header so the
/// client can address `POST /message` and resume later.
pub async fn sse_stream(
    State(state): State<AppState>,
    Query(query): Query<StreamQuery>,
) -> Response {
    // The assigned id travels back in a response header, so a resume id
    // must be a valid header value. Rejected before any session exists.
    let resume = match query.session {
        Some(raw) => {
            if HeaderValue::from_str(&raw).is_err() {
                warn!("[Gateway] Rejected non-header-safe session id");
                return (
                    StatusCode::BAD_REQUEST,
                    "Session id is not a valid header value\n",
                )
                    .into_response();
            }
            Some(SessionId::from(raw))
        }
        None => None,
    };
    let resuming = resume.is_some();
    let session = state.registry.get_or_create(resume);
    let id = session.id().clone();

    let mut attachment = match state.adapter.attach(&id) {
        Ok(attachment) => attachment,
        Err(StreamError::AlreadyAttached(id)) => {
            warn!(session = %id, "[Gateway] Rejected second concurrent stream");
            return (
                StatusCode::CONFLICT,
                "Session already has an active stream\n",
            )
                .into_response();
        }
        Err(e) => {
            warn!(session = %id, error = %e, "[Gateway] Stream attach failed");
            return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response();
        }
    };

    info!(session = %id, resuming, "[Gateway] Stream attached");

    // The attachment lives inside the body stream; when the client
    // disconnects the stream is dropped and the drop guard detaches the
    // session, leaving its buffer accumulating for the next attach.
    let frames = async_stream::stream! {
        while let Some(frame) = attachment.next_frame().await {
            yield Ok::<Event, Infallible>(Event::default().data(frame.to_wire()));
        }
    };

    let mut response = Sse::new(frames).into_response();
    let headers = response.headers_mut();
    headers.insert(header::CACHE_CONTROL, "no-cache".parse().expect("static header"));
    // Infallible: resume ids were validated above, generated ids are UUIDs
    headers.insert(
        CONNECTION_ID_HEADER,
        id.as_str().parse().expect("header-safe session id"),
    );
    response
}

/// `POST /message` - deliver an out-of-band message to a session.
///
/// Target id travels in the `X-Connection-Id` header; the JSON body is
/// relayed to the session's stream as a response frame. Always either
/// enqueued or explicitly rejected, never silently dropped.
pub async fn post_message(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let Some(target) = headers
        .get(CONNECTION_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
    else {
        return (StatusCode::BAD_REQUEST, "Missing X-Connection-Id header\n").into_response();
    };

    match state.inbound.route(&SessionId::from(target), &body) {
        Ok(()) => StatusCode::OK.into_response(),
        Err(e @ StreamError::UnknownTarget(_)) => {
            debug!(session = target, "[Gateway] Message for unknown session");
            (StatusCode::NOT_FOUND, format!("{e}\n")).into_response()
        }
        Err(e @ StreamError::InvalidPayload(_)) => {
            debug!(session = target, "[Gateway] Malformed message body");
            (StatusCode::BAD_REQUEST, format!("{e}\n")).into_response()
        }
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, format!("{e}\n")).into_response(),
    }
}

/// `POST /mcp` - direct JSON-RPC request/response transport.
///
/// Requests get a JSON-RPC response body; notifications are accepted with
/// an empty 202.
pub async fn mcp_dispatch(
    State(state): State<AppState>,
    Json(request): Json<JsonRpcRequest>,
) -> Response {
    match state.mcp.handle(&request) {
        Some(response) => Json(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}
