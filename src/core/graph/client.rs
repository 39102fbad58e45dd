//! Graph API request shape and HTTP client.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

use super::error::{GraphApiError, GraphResult};
use crate::core::config::WhatsAppConfig;

/// HTTP methods used against the Graph API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    fn as_reqwest(self) -> Method {
        match self {
            Self::Get => Method::GET,
            Self::Post => Method::POST,
        }
    }
}

/// A single outbound Graph API call.
///
/// `endpoint` is relative to the versioned Graph root, e.g. `<phone-id>/messages`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphRequest {
    pub method: HttpMethod,
    pub endpoint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, String>,
}

impl GraphRequest {
    /// A GET request with no query parameters.
    pub fn get(endpoint: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            endpoint: endpoint.into(),
            body: None,
            params: BTreeMap::new(),
        }
    }

    /// A POST request carrying a JSON body.
    pub fn post(endpoint: impl Into<String>, body: Value) -> Self {
        Self {
            method: HttpMethod::Post,
            endpoint: endpoint.into(),
            body: Some(body),
            params: BTreeMap::new(),
        }
    }

    /// Add a query parameter.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

/// Executes Graph requests.
///
/// The manager only builds requests; authentication, connection pooling and
/// error normalization belong to the implementor.
#[async_trait]
pub trait GraphTransport: Send + Sync {
    /// Perform the request and return the decoded JSON response.
    async fn request(&self, request: GraphRequest) -> GraphResult<Value>;
}

/// reqwest-backed Graph API client.
#[derive(Clone)]
pub struct GraphApiClient {
    http: Client,
    base_url: Url,
    access_token: String,
}

impl std::fmt::Debug for GraphApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

impl GraphApiClient {
    /// Build a client for the versioned Graph root described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is not a valid http(s) URL or the
    /// underlying HTTP client cannot be created.
    pub fn new(config: &WhatsAppConfig, access_token: impl Into<String>) -> GraphResult<Self> {
        let mut base_url = Url::parse(&config.graph_url())?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(GraphApiError::InvalidUrl(format!(
                "unsupported scheme '{}' in {}",
                base_url.scheme(),
                base_url
            )));
        }
        // Url::join replaces the last segment unless the path ends with '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url,
            access_token: access_token.into(),
        })
    }

    /// Resolve an endpoint and its query parameters against the base URL.
    pub fn url_for(&self, request: &GraphRequest) -> GraphResult<Url> {
        let mut url = self.base_url.join(request.endpoint.trim_start_matches('/'))?;
        if !request.params.is_empty() {
            url.query_pairs_mut().extend_pairs(request.params.iter());
        }
        Ok(url)
    }
}

#[async_trait]
impl GraphTransport for GraphApiClient {
    #[instrument(skip_all, fields(method = ?request.method, endpoint = %request.endpoint))]
    async fn request(&self, request: GraphRequest) -> GraphResult<Value> {
        let url = self.url_for(&request)?;
        debug!("Sending Graph API request");

        let mut builder = self
            .http
            .request(request.method.as_reqwest(), url)
            .bearer_auth(&self.access_token);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;
        debug!(status = status.as_u16(), "Graph API responded");

        if !status.is_success() {
            return Err(GraphApiError::from_response(status.as_u16(), &text));
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| GraphApiError::InvalidResponse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Router,
        body::Bytes,
        http::{HeaderMap, Method as AxumMethod, StatusCode, Uri},
        routing::any,
    };
    use serde_json::json;
    use tokio::net::TcpListener;

    async fn echo_handler(
        method: AxumMethod,
        uri: Uri,
        headers: HeaderMap,
        body: Bytes,
    ) -> (StatusCode, axum::Json<Value>) {
        if uri.path().ends_with("/fail") {
            return (
                StatusCode::BAD_REQUEST,
                axum::Json(json!({
                    "error": {
                        "message": "(#100) Invalid parameter",
                        "type": "OAuthException",
                        "code": 100,
                        "fbtrace_id": "trace-1"
                    }
                })),
            );
        }

        let authorization = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);

        (
            StatusCode::OK,
            axum::Json(json!({
                "method": method.as_str(),
                "path": uri.path(),
                "query": uri.query().unwrap_or(""),
                "authorization": authorization,
                "body": body,
            })),
        )
    }

    async fn spawn_echo_server() -> (String, tokio::sync::oneshot::Sender<()>) {
        let app = Router::new().route("/{*path}", any(echo_handler));
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local_addr");
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        let server = axum::serve(listener, app).with_graceful_shutdown(async move {
            let _ = shutdown_rx.await;
        });
        tokio::spawn(async move { server.await });
        (format!("http://{addr}"), shutdown_tx)
    }

    fn client_for(base_url: &str) -> GraphApiClient {
        let config = WhatsAppConfig {
            base_url: base_url.to_string(),
            api_version: "v21.0".to_string(),
            ..WhatsAppConfig::default()
        };
        GraphApiClient::new(&config, "test-token").expect("client")
    }

    #[test]
    fn test_url_for_joins_endpoint_and_params() {
        let client = client_for("https://graph.example.com");
        let request = GraphRequest::get("123/whatsapp_business_profile")
            .with_param("fields", "about,email");
        let url = client.url_for(&request).unwrap();
        assert_eq!(
            url.as_str(),
            "https://graph.example.com/v21.0/123/whatsapp_business_profile?fields=about%2Cemail"
        );
    }

    #[test]
    fn test_rejects_non_http_base_url() {
        let config = WhatsAppConfig {
            base_url: "ftp://graph.example.com".to_string(),
            ..WhatsAppConfig::default()
        };
        let err = GraphApiClient::new(&config, "token").unwrap_err();
        assert!(matches!(err, GraphApiError::InvalidUrl(_)));
    }

    #[test]
    fn test_debug_redacts_token() {
        let client = client_for("https://graph.example.com");
        let debug_str = format!("{:?}", client);
        assert!(!debug_str.contains("test-token"));
        assert!(debug_str.contains("REDACTED"));
    }

    #[tokio::test]
    async fn test_post_sends_bearer_token_and_json_body() {
        let (base_url, shutdown) = spawn_echo_server().await;
        let client = client_for(&base_url);

        let response = client
            .request(GraphRequest::post("555/messages", json!({"to": "1"})))
            .await
            .expect("request");

        assert_eq!(response["method"], "POST");
        assert_eq!(response["path"], "/v21.0/555/messages");
        assert_eq!(response["authorization"], "Bearer test-token");
        assert_eq!(response["body"], json!({"to": "1"}));

        let _ = shutdown.send(());
    }

    #[tokio::test]
    async fn test_get_sends_query_params() {
        let (base_url, shutdown) = spawn_echo_server().await;
        let client = client_for(&base_url);

        let response = client
            .request(GraphRequest::get("555/whatsapp_business_profile").with_param("fields", "about"))
            .await
            .expect("request");

        assert_eq!(response["method"], "GET");
        assert_eq!(response["query"], "fields=about");
        assert_eq!(response["body"], Value::Null);

        let _ = shutdown.send(());
    }

    #[tokio::test]
    async fn test_error_status_is_normalized() {
        let (base_url, shutdown) = spawn_echo_server().await;
        let client = client_for(&base_url);

        let err = client
            .request(GraphRequest::post("555/fail", json!({})))
            .await
            .unwrap_err();

        match err {
            GraphApiError::Api {
                status,
                code,
                message,
                ..
            } => {
                assert_eq!(status, 400);
                assert_eq!(code, Some(100));
                assert_eq!(message, "(#100) Invalid parameter");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let _ = shutdown.send(());
    }
}
