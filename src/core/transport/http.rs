//! HTTP transport: JSON-RPC 2.0 over POST.
//!
//! Lets plain HTTP clients (curl, webhooks, browser tooling) drive the
//! WhatsApp tools without an MCP session. Each request stands alone.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{debug, info, instrument, warn};

use super::{TransportError, TransportResult, config::HttpConfig};
use crate::core::McpServer;
use crate::core::server::SERVER_INSTRUCTIONS;

/// Protocol revisions this endpoint answers to, newest first.
const SUPPORTED_PROTOCOL_VERSIONS: [&str; 3] = ["2025-06-18", "2025-03-26", "2024-11-05"];

const PARSE_ERROR: i32 = -32700;
const INVALID_REQUEST: i32 = -32600;
const METHOD_NOT_FOUND: i32 = -32601;
const INVALID_PARAMS: i32 = -32602;

pub struct HttpTransport {
    config: HttpConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcResponse {
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self::from_error(
            id,
            JsonRpcError {
                code,
                message: message.into(),
                data: None,
            },
        )
    }

    /// Carry an rmcp error through unchanged, structured `data` included.
    pub fn from_mcp_error(id: Option<Value>, err: rmcp::ErrorData) -> Self {
        Self::from_error(
            id,
            JsonRpcError {
                code: err.code.0,
                message: err.message.into_owned(),
                data: err.data,
            },
        )
    }

    fn from_error(id: Option<Value>, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }
}

#[derive(Clone)]
struct AppState {
    server: McpServer,
    rpc_path: String,
}

impl HttpTransport {
    pub fn new(config: HttpConfig) -> Self {
        Self { config }
    }

    fn router(&self, server: McpServer) -> Router {
        let state = AppState {
            server,
            rpc_path: self.config.rpc_path.clone(),
        };

        let app = Router::new()
            .route(&self.config.rpc_path, post(handle_rpc))
            .route("/health", get(health_check))
            .route("/", get(root_handler))
            .layer(TraceLayer::new_for_http())
            .with_state(state);

        if self.config.enable_cors {
            app.layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            )
        } else {
            app
        }
    }

    pub async fn run(self, server: McpServer) -> TransportResult<()> {
        let addr = self.config.address();
        let app = self.router(server);

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        info!(
            cors = self.config.enable_cors,
            "Ready - listening on {} (JSON-RPC: POST {}, health: GET /health)",
            addr,
            self.config.rpc_path
        );

        axum::serve(listener, app).await?;
        Ok(())
    }
}

async fn root_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "name": state.server.name(),
        "version": state.server.version(),
        "transport": "HTTP",
        "protocol": "JSON-RPC 2.0",
        "endpoints": {
            "rpc": state.rpc_path,
            "health": "/health"
        },
        "tools": state.server.registry().tool_names(),
    }))
}

async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "phone_number_id": state.server.registry().manager().phone_number_id(),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Takes the raw body so malformed JSON still gets a JSON-RPC parse error.
/// Notifications are acknowledged with an empty `202 Accepted`.
#[instrument(skip_all, fields(method))]
async fn handle_rpc(State(state): State<AppState>, body: String) -> Response {
    let response = match serde_json::from_str::<JsonRpcRequest>(&body) {
        Ok(request) => {
            tracing::Span::current().record("method", request.method.as_str());
            process_request(&state.server, request).await
        }
        Err(e) => {
            warn!("Rejected malformed JSON-RPC body: {}", e);
            Some(JsonRpcResponse::error(None, PARSE_ERROR, format!("Parse error: {e}")))
        }
    };

    match response {
        Some(response) => Json(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

/// `None` means the message was a notification and gets no reply.
async fn process_request(server: &McpServer, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
    if request.jsonrpc != "2.0" {
        return Some(JsonRpcResponse::error(request.id, INVALID_REQUEST, "Invalid Request"));
    }

    debug!(method = %request.method, "Processing JSON-RPC request");

    let response = match request.method.as_str() {
        "initialize" => initialize(server, request),
        "tools/list" => JsonRpcResponse::success(
            request.id,
            json!({ "tools": server.list_tools() }),
        ),
        "tools/call" => call_tool(server, request).await,
        "ping" => JsonRpcResponse::success(request.id, json!({})),
        method if method.starts_with("notifications/") => {
            debug!("Notification ignored over stateless HTTP: {}", method);
            return None;
        }
        method => {
            warn!("Unknown method: {}", method);
            JsonRpcResponse::error(request.id, METHOD_NOT_FOUND, "Method not found")
        }
    };

    Some(response)
}

fn initialize(server: &McpServer, request: JsonRpcRequest) -> JsonRpcResponse {
    let requested = request
        .params
        .as_ref()
        .and_then(|p| p.get("protocolVersion"))
        .and_then(Value::as_str);

    let version = requested
        .filter(|v| SUPPORTED_PROTOCOL_VERSIONS.contains(v))
        .unwrap_or(SUPPORTED_PROTOCOL_VERSIONS[0]);

    JsonRpcResponse::success(
        request.id,
        json!({
            "protocolVersion": version,
            "capabilities": { "tools": {} },
            "serverInfo": {
                "name": server.name(),
                "version": server.version()
            },
            "instructions": SERVER_INSTRUCTIONS
        }),
    )
}

async fn call_tool(server: &McpServer, request: JsonRpcRequest) -> JsonRpcResponse {
    let params = request.params.unwrap_or(Value::Null);

    let Some(name) = params.get("name").and_then(Value::as_str) else {
        return JsonRpcResponse::error(request.id, INVALID_PARAMS, "Missing tool name");
    };

    let arguments = params.get("arguments").cloned().unwrap_or_else(|| json!({}));

    match server.call_tool(name, arguments).await {
        Ok(result) => JsonRpcResponse::success(request.id, result),
        Err(e) => JsonRpcResponse::from_mcp_error(request.id, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Config;
    use crate::core::graph::testing::RecordingTransport;
    use crate::domains::whatsapp::WhatsAppManager;
    use std::sync::Arc;

    fn server(transport: Arc<RecordingTransport>) -> McpServer {
        let manager = WhatsAppManager::with_transport("42", transport).unwrap();
        McpServer::with_manager(Config::default(), manager)
    }

    fn rpc(method: &str, params: Value) -> JsonRpcRequest {
        JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            id: Some(json!(1)),
            method: method.to_string(),
            params: Some(params),
        }
    }

    async fn reply(server: &McpServer, request: JsonRpcRequest) -> JsonRpcResponse {
        process_request(server, request)
            .await
            .expect("request should get a reply")
    }

    fn state(server: McpServer) -> State<AppState> {
        State(AppState {
            server,
            rpc_path: "/mcp".to_string(),
        })
    }

    #[tokio::test]
    async fn test_initialize_negotiates_version() {
        let server = server(Arc::new(RecordingTransport::new()));

        let response =
            reply(&server, rpc("initialize", json!({"protocolVersion": "2024-11-05"})))
                .await;
        let result = response.result.unwrap();
        assert_eq!(result["protocolVersion"], "2024-11-05");
        assert_eq!(result["serverInfo"]["name"], "whatsapp-mcp-server");
        assert!(result["capabilities"].get("resources").is_none());

        let response =
            reply(&server, rpc("initialize", json!({"protocolVersion": "1999-01-01"})))
                .await;
        assert_eq!(response.result.unwrap()["protocolVersion"], "2025-06-18");
    }

    #[tokio::test]
    async fn test_tools_list() {
        let server = server(Arc::new(RecordingTransport::new()));
        let response = reply(&server, rpc("tools/list", json!({}))).await;
        let tools = response.result.unwrap()["tools"].as_array().unwrap().len();
        assert_eq!(tools, 9);
    }

    #[tokio::test]
    async fn test_tools_call_success() {
        let transport = Arc::new(RecordingTransport::new());
        let server = server(transport.clone());

        let response = reply(
            &server,
            rpc(
                "tools/call",
                json!({"name": "wa_send_text", "arguments": {"to": "15551234567", "body": "hello"}}),
            ),
        )
        .await;

        let result = response.result.unwrap();
        assert_ne!(result["isError"], json!(true));
        assert!(result["content"][0]["text"].as_str().unwrap().contains("wamid.TEST"));
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_tools_call_invalid_arguments() {
        let transport = Arc::new(RecordingTransport::new());
        let server = server(transport.clone());

        let response = reply(
            &server,
            rpc("tools/call", json!({"name": "wa_send_video", "arguments": {"to": "1"}})),
        )
        .await;

        let error = response.error.unwrap();
        assert_eq!(error.code, INVALID_PARAMS);
        assert_eq!(error.data.unwrap()["tool"], "wa_send_video");
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_tools_call_graph_failure_is_tool_error() {
        let server = server(Arc::new(RecordingTransport::failing(400)));
        let response = reply(
            &server,
            rpc("tools/call", json!({"name": "wa_send_text", "arguments": {"to": "1", "body": "x"}})),
        )
        .await;
        assert!(response.error.is_none());
        assert_eq!(response.result.unwrap()["isError"], json!(true));
    }

    #[tokio::test]
    async fn test_missing_tool_name() {
        let server = server(Arc::new(RecordingTransport::new()));
        let response = reply(&server, rpc("tools/call", json!({}))).await;
        assert_eq!(response.error.unwrap().code, INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_unknown_method_and_bad_version() {
        let server = server(Arc::new(RecordingTransport::new()));

        let response = reply(&server, rpc("resources/list", json!({}))).await;
        assert_eq!(response.error.unwrap().code, METHOD_NOT_FOUND);

        let mut request = rpc("ping", json!({}));
        request.jsonrpc = "1.0".to_string();
        let response = reply(&server, request).await;
        assert_eq!(response.error.unwrap().code, INVALID_REQUEST);
    }

    #[tokio::test]
    async fn test_notification_gets_no_reply() {
        let server = server(Arc::new(RecordingTransport::new()));
        let mut request = rpc("notifications/initialized", json!({}));
        request.id = None;
        assert!(process_request(&server, request).await.is_none());

        let response = handle_rpc(
            state(server),
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#.to_string(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_body_is_parse_error() {
        let server = server(Arc::new(RecordingTransport::new()));
        let response = handle_rpc(state(server), "{not json".to_string()).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["error"]["code"], PARSE_ERROR);
    }

    #[test]
    fn test_error_response_omits_result() {
        let response = JsonRpcResponse::error(Some(json!(7)), METHOD_NOT_FOUND, "Method not found");
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(
            value,
            json!({"jsonrpc": "2.0", "id": 7, "error": {"code": -32601, "message": "Method not found"}})
        );
    }
}
