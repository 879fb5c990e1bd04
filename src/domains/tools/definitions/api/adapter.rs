//! HTTP client for the configured custom API.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, Response};
use serde_json::{Value, json};
use tracing::{error, info, instrument, warn};

use crate::core::config::CustomApiConfig;
use crate::domains::tools::{ToolError, ToolResult};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Join a base URL and an endpoint with exactly one slash between them.
pub fn join_url(base: &str, endpoint: &str) -> String {
    let base = base.strip_suffix('/').unwrap_or(base);
    let endpoint = endpoint.strip_prefix('/').unwrap_or(endpoint);
    format!("{}/{}", base, endpoint)
}

pub struct ApiAdapter {
    config: CustomApiConfig,
    /// A builder failure is kept and reported on every call.
    client: Result<reqwest::Client, String>,
}

impl ApiAdapter {
    pub fn new(config: CustomApiConfig) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("universal-mcp-server/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| {
                error!("Failed to build custom API HTTP client: {}", e);
                e.to_string()
            });
        Self { config, client }
    }

    fn client(&self) -> ToolResult<&reqwest::Client> {
        self.client
            .as_ref()
            .map_err(|e| ToolError::remote(format!("HTTP client unavailable: {}", e)))
    }

    fn base_url(&self) -> ToolResult<&str> {
        if self.config.is_configured() {
            Ok(&self.config.base_url)
        } else {
            Err(ToolError::configuration_missing(
                "CUSTOM_API_URL not configured",
            ))
        }
    }

    /// JSON content type, then the static headers, then the bearer token.
    /// Later entries replace earlier ones with the same name.
    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        for (name, value) in &self.config.headers {
            match (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(value)) => {
                    headers.insert(name, value);
                }
                _ => warn!("Skipping invalid custom header '{}'", name),
            }
        }

        if !self.config.api_key.is_empty() {
            match HeaderValue::from_str(&format!("Bearer {}", self.config.api_key)) {
                Ok(mut value) => {
                    value.set_sensitive(true);
                    headers.insert(AUTHORIZATION, value);
                }
                Err(_) => warn!("CUSTOM_API_KEY is not a valid header value; sending no token"),
            }
        }
        headers
    }

    async fn send(
        &self,
        method: Method,
        endpoint: &str,
        query: Option<Vec<(String, String)>>,
        body: Option<Value>,
    ) -> ToolResult<(u16, String)> {
        let url = join_url(self.base_url()?, endpoint);
        info!("{} {}", method, url);

        let mut request = self.client()?.request(method, &url).headers(self.headers());
        if let Some(query) = query {
            request = request.query(&query);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        read_response(response).await
    }

    #[instrument(skip_all, fields(endpoint = %endpoint))]
    pub async fn get(&self, endpoint: &str, params: &str) -> ToolResult<Value> {
        self.base_url()?;
        let query = parse_query(params)?;
        let (status, text) = self.send(Method::GET, endpoint, Some(query), None).await?;
        Ok(json!({"status_code": status, "data": decode_body(&text)}))
    }

    #[instrument(skip_all, fields(endpoint = %endpoint))]
    pub async fn post(&self, endpoint: &str, body: &str) -> ToolResult<Value> {
        self.with_body(Method::POST, endpoint, body).await
    }

    #[instrument(skip_all, fields(endpoint = %endpoint))]
    pub async fn put(&self, endpoint: &str, body: &str) -> ToolResult<Value> {
        self.with_body(Method::PUT, endpoint, body).await
    }

    async fn with_body(&self, method: Method, endpoint: &str, body: &str) -> ToolResult<Value> {
        self.base_url()?;
        let body = parse_body(body)?;
        let (status, text) = self.send(method, endpoint, None, body).await?;
        Ok(json!({"status_code": status, "data": decode_body(&text)}))
    }

    #[instrument(skip_all, fields(endpoint = %endpoint))]
    pub async fn delete(&self, endpoint: &str) -> ToolResult<Value> {
        let (status, _) = self.send(Method::DELETE, endpoint, None, None).await?;
        Ok(json!({
            "status_code": status,
            "message": "Resource deleted successfully",
        }))
    }
}

async fn read_response(response: Response) -> ToolResult<(u16, String)> {
    let status = response.status();
    let text = response.text().await?;
    if !status.is_success() {
        warn!("Custom API returned {}", status);
        return Err(ToolError::remote(format!("HTTP {}: {}", status, text)));
    }
    Ok((status.as_u16(), text))
}

/// Query parameters from a JSON object. Arrays repeat the key; nulls are dropped.
fn parse_query(params: &str) -> ToolResult<Vec<(String, String)>> {
    if params.trim().is_empty() {
        return Ok(Vec::new());
    }
    let Value::Object(map) = serde_json::from_str::<Value>(params)? else {
        return Err(ToolError::invalid_input("params must be a JSON object"));
    };

    let mut pairs = Vec::new();
    for (key, value) in map {
        let values = match value {
            Value::Array(items) => items,
            other => vec![other],
        };
        for value in values {
            match value {
                Value::Null => {}
                Value::String(s) => pairs.push((key.clone(), s)),
                other => pairs.push((key.clone(), other.to_string())),
            }
        }
    }
    Ok(pairs)
}

fn parse_body(body: &str) -> ToolResult<Option<Value>> {
    if body.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(body)?))
}

/// JSON when the body parses, the raw text when it does not, null when empty.
fn decode_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domains::tools::ErrorKind;
    use std::collections::HashMap;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::sync::oneshot;
    use tokio::task::JoinHandle;

    #[test]
    fn test_join_url_slash_combinations() {
        for base in ["https://api.x.com", "https://api.x.com/"] {
            for endpoint in ["users", "/users"] {
                assert_eq!(join_url(base, endpoint), "https://api.x.com/users");
            }
        }
        assert_eq!(
            join_url("https://api.x.com/v1/", "/users/1/"),
            "https://api.x.com/v1/users/1/"
        );
    }

    #[test]
    fn test_headers_precedence() {
        let config = CustomApiConfig {
            base_url: "http://localhost".to_string(),
            api_key: "s3cret".to_string(),
            headers: HashMap::from([
                ("Content-Type".to_string(), "application/vnd.api+json".to_string()),
                ("Authorization".to_string(), "Basic abc".to_string()),
                ("X-Team".to_string(), "core".to_string()),
                ("bad header".to_string(), "x".to_string()),
            ]),
        };
        let headers = ApiAdapter::new(config).headers();

        assert_eq!(headers[CONTENT_TYPE], "application/vnd.api+json");
        assert_eq!(headers[AUTHORIZATION], "Bearer s3cret");
        assert_eq!(headers["x-team"], "core");
        assert_eq!(headers.len(), 3);
    }

    #[test]
    fn test_query_and_body_parsing() {
        let pairs = parse_query(r#"{"q": "rust", "page": 2, "tag": ["a", "b"], "skip": null}"#)
            .unwrap();
        assert!(pairs.contains(&("q".to_string(), "rust".to_string())));
        assert!(pairs.contains(&("page".to_string(), "2".to_string())));
        assert_eq!(pairs.iter().filter(|(k, _)| k == "tag").count(), 2);
        assert!(!pairs.iter().any(|(k, _)| k == "skip"));

        assert_eq!(parse_query("[1]").unwrap_err().kind(), ErrorKind::InvalidInput);
        assert_eq!(parse_body("{oops").unwrap_err().kind(), ErrorKind::InvalidInput);
        assert_eq!(parse_body("").unwrap(), None);
    }

    #[test]
    fn test_decode_body_falls_back_to_text() {
        assert_eq!(decode_body(r#"{"ok": true}"#), json!({"ok": true}));
        assert_eq!(decode_body("plain text"), json!("plain text"));
        assert_eq!(decode_body(""), Value::Null);
    }

    /// Read one request (head plus `Content-Length` body) off the socket.
    async fn read_request(socket: &mut TcpStream) -> String {
        let mut raw = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            raw.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&raw).to_string();
            if let Some(end) = text.find("\r\n\r\n") {
                let length = text[..end]
                    .lines()
                    .find_map(|l| {
                        let (name, value) = l.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())?
                    })
                    .unwrap_or(0);
                if raw.len() >= end + 4 + length || n == 0 {
                    break;
                }
            } else if n == 0 {
                break;
            }
        }
        String::from_utf8_lossy(&raw).to_string()
    }

    fn canned_response(status: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        )
    }

    /// Serve one canned HTTP response and hand back the raw request text.
    pub(crate) async fn serve_once(status: &str, body: &str) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel();
        let response = canned_response(status, body);

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            tx.send(request).ok();
        });

        (format!("http://{}/", addr), rx)
    }

    /// Serve `200 OK` with each body in turn, one connection per request.
    /// The handle resolves to the raw requests once every body was sent.
    pub(crate) async fn serve_sequence(bodies: Vec<String>) -> (String, JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let mut requests = Vec::new();
            for body in bodies {
                let (mut socket, _) = listener.accept().await.unwrap();
                requests.push(read_request(&mut socket).await);
                let response = canned_response("200 OK", &body);
                socket.write_all(response.as_bytes()).await.unwrap();
                socket.shutdown().await.ok();
            }
            requests
        });

        (format!("http://{}/", addr), handle)
    }

    fn adapter(base_url: String, api_key: &str) -> ApiAdapter {
        ApiAdapter::new(CustomApiConfig {
            base_url,
            api_key: api_key.to_string(),
            headers: HashMap::new(),
        })
    }

    #[tokio::test]
    async fn test_get_sends_query_and_token() {
        let (base, request) = serve_once("200 OK", r#"[{"id": 1}]"#).await;
        let result = adapter(base, "tok")
            .get("/users", r#"{"active": true}"#)
            .await
            .unwrap();

        assert_eq!(result, json!({"status_code": 200, "data": [{"id": 1}]}));
        let request = request.await.unwrap();
        assert!(request.starts_with("GET /users?active=true HTTP/1.1"));
        assert!(request.to_lowercase().contains("authorization: bearer tok"));
    }

    #[tokio::test]
    async fn test_post_sends_json_body() {
        let (base, request) = serve_once("201 Created", r#"{"id": 9}"#).await;
        let result = adapter(base, "")
            .post("users", r#"{"name": "ada"}"#)
            .await
            .unwrap();

        assert_eq!(result["status_code"], 201);
        assert_eq!(result["data"]["id"], 9);
        let request = request.await.unwrap();
        assert!(request.starts_with("POST /users HTTP/1.1"));
        assert!(request.ends_with(r#"{"name":"ada"}"#));
        assert!(!request.to_lowercase().contains("authorization"));
    }

    #[tokio::test]
    async fn test_error_status_is_remote_failure() {
        let (base, _request) = serve_once("404 Not Found", r#"{"detail": "missing"}"#).await;
        let err = adapter(base, "").delete("/users/1").await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::RemoteFailure);
        assert!(err.to_string().starts_with("HTTP 404"));
        assert!(err.to_string().contains("missing"));
    }

    #[tokio::test]
    async fn test_client_build_failure_is_reported_per_call() {
        let adapter = ApiAdapter {
            config: CustomApiConfig {
                base_url: "http://127.0.0.1:9".to_string(),
                api_key: String::new(),
                headers: HashMap::new(),
            },
            client: Err("TLS backend cannot be initialized".to_string()),
        };
        let err = adapter.get("/users", "").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RemoteFailure);
        assert_eq!(
            err.to_string(),
            "HTTP client unavailable: TLS backend cannot be initialized"
        );
    }

    #[tokio::test]
    async fn test_not_configured() {
        let err = adapter(String::new(), "")
            .get("/users", "{}")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigurationMissing);
        assert_eq!(err.to_string(), "CUSTOM_API_URL not configured");
    }
}
