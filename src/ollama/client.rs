//! Ollama HTTP client
//!
//! - `POST /api/chat` (non-streaming, with tool descriptors)
//! - `GET /api/tags` for health check and model listing

use crate::errors::{BridgeError, Result};
use crate::ollama::wire::{ChatRequest, ChatResponse, TagsResponse};
use crate::ollama::{ChatEndpoint, EndpointError};
use crate::types::messages::Turn;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Default Ollama API endpoint
pub const DEFAULT_OLLAMA_URL: &str = "http://127.0.0.1:11434";

/// Default model
pub const DEFAULT_MODEL: &str = "qwen3:latest";

/// Default request timeout
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Timeout for `/api/tags` probes
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Ollama chat client
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    /// Create new Ollama client with default settings
    pub fn new() -> Result<Self> {
        Self::with_config(DEFAULT_OLLAMA_URL, DEFAULT_MODEL, DEFAULT_REQUEST_TIMEOUT)
    }

    /// Create Ollama client with custom configuration
    pub fn with_config(base_url: &str, model: &str, request_timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(BridgeError::HttpError)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }

    /// Check if Ollama is reachable
    pub async fn health_check(&self) -> bool {
        let url = format!("{}/api/tags", self.base_url);

        match self.client.get(&url).timeout(PROBE_TIMEOUT).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!("health check failed: {}", e);
                false
            }
        }
    }

    /// List installed models
    pub async fn list_models(&self) -> Result<Vec<String>> {
        let url = format!("{}/api/tags", self.base_url);

        let response = self
            .client
            .get(&url)
            .timeout(PROBE_TIMEOUT)
            .send()
            .await
            .map_err(|e| BridgeError::OllamaApiError(format!("Failed to list models: {}", e)))?;

        if !response.status().is_success() {
            return Err(BridgeError::OllamaApiError(format!(
                "API returned status: {}",
                response.status()
            )));
        }

        let tags: TagsResponse = response
            .json()
            .await
            .map_err(|e| BridgeError::OllamaApiError(format!("Failed to parse models: {}", e)))?;

        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    /// Get current model name
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Get base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ChatEndpoint for OllamaClient {
    async fn chat(&self, turns: &[Turn], tools: &[Value]) -> std::result::Result<Turn, EndpointError> {
        let url = format!("{}/api/chat", self.base_url);
        let request = ChatRequest::new(&self.model, turns, tools);

        debug!(model = %self.model, turns = turns.len(), tools = tools.len(), "POST /api/chat");

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| EndpointError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(EndpointError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| EndpointError::Decode(e.to_string()))?;

        Ok(body.message.into_turn())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::messages::{Role, ToolCallRequest};
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Answer one HTTP request with a canned reply; yields the request body
    async fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 4096];
            let header_end = loop {
                let n = socket.read(&mut chunk).await.unwrap();
                assert!(n > 0, "connection closed before request was complete");
                buf.extend_from_slice(&chunk[..n]);

                let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
                    continue;
                };
                let headers = String::from_utf8_lossy(&buf[..pos]).to_lowercase();
                let length = headers
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .and_then(|value| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= pos + 4 + length {
                    break pos + 4;
                }
            };

            let reply = format!(
                "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(reply.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();

            String::from_utf8_lossy(&buf[header_end..]).into_owned()
        });

        (base_url, handle)
    }

    fn client_for(base_url: &str) -> OllamaClient {
        OllamaClient::with_config(base_url, "qwen3:latest", Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_chat_decodes_tool_calls() {
        let (base_url, server) = serve_once(
            "HTTP/1.1 200 OK",
            r#"{"model":"qwen3:latest","message":{"role":"assistant","content":"","tool_calls":[{"function":{"name":"desktop_click","arguments":{"x":10,"y":20}}}]},"done":true}"#,
        )
        .await;
        let tools = vec![json!({"type": "function", "function": {"name": "desktop_click"}})];

        let turn = client_for(&base_url)
            .chat(&[Turn::user("click at 10,20")], &tools)
            .await
            .unwrap();

        assert_eq!(turn.role, Role::Assistant);
        assert_eq!(
            turn.tool_calls,
            vec![ToolCallRequest::new("desktop_click", json!({"x": 10, "y": 20}))]
        );

        let request: Value = serde_json::from_str(&server.await.unwrap()).unwrap();
        assert_eq!(request["model"], "qwen3:latest");
        assert_eq!(request["stream"], false);
        assert_eq!(request["messages"][0]["role"], "user");
        assert_eq!(request["tools"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_chat_plain_answer() {
        let (base_url, server) = serve_once(
            "HTTP/1.1 200 OK",
            r#"{"message":{"role":"assistant","content":"Done."},"done":true}"#,
        )
        .await;

        let turn = client_for(&base_url).chat(&[Turn::user("hi")], &[]).await.unwrap();

        assert_eq!(turn.content, "Done.");
        assert!(!turn.requests_tools());
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_chat_error_status() {
        let (base_url, server) = serve_once(
            "HTTP/1.1 500 Internal Server Error",
            r#"{"error":"model crashed"}"#,
        )
        .await;

        let result = client_for(&base_url).chat(&[Turn::user("hi")], &[]).await;

        match result {
            Err(EndpointError::Status { status, body }) => {
                assert_eq!(status, 500);
                assert!(body.contains("model crashed"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_chat_undecodable_body() {
        let (base_url, server) = serve_once("HTTP/1.1 200 OK", "not a chat response").await;

        let result = client_for(&base_url).chat(&[Turn::user("hi")], &[]).await;

        assert!(matches!(result, Err(EndpointError::Decode(_))));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_list_models() {
        let (base_url, server) = serve_once(
            "HTTP/1.1 200 OK",
            r#"{"models":[{"name":"qwen3:latest"},{"name":"llama3.1:8b"}]}"#,
        )
        .await;

        let models = client_for(&base_url).list_models().await.unwrap();

        assert_eq!(models, vec!["qwen3:latest", "llama3.1:8b"]);
        server.await.unwrap();
    }

    #[test]
    fn test_client_creation() {
        let client = OllamaClient::new().unwrap();

        assert_eq!(client.model(), DEFAULT_MODEL);
        assert_eq!(client.base_url(), DEFAULT_OLLAMA_URL);
    }

    #[test]
    fn test_client_with_config() {
        let client = OllamaClient::with_config(
            "http://localhost:11434/",
            "llama3.1:8b",
            Duration::from_secs(10),
        )
        .unwrap();

        assert_eq!(client.model(), "llama3.1:8b");
        assert_eq!(client.base_url(), "http://localhost:11434");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        // Port 9 (discard) is not an Ollama server
        let client =
            OllamaClient::with_config("http://127.0.0.1:9", DEFAULT_MODEL, Duration::from_secs(2))
                .unwrap();

        let result = client.chat(&[Turn::user("hi")], &[]).await;

        assert!(matches!(result, Err(EndpointError::Request(_))));
        assert!(!client.health_check().await);
    }
}
