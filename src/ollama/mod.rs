//! Inference endpoint access
//!
//! `ChatEndpoint` is the seam the conversation loop talks through;
//! `OllamaClient` is the HTTP implementation.

pub mod client;
pub mod wire;

pub use client::{OllamaClient, DEFAULT_MODEL, DEFAULT_OLLAMA_URL, DEFAULT_REQUEST_TIMEOUT};

use crate::types::messages::Turn;
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Transport failure talking to the inference endpoint
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EndpointError {
    /// Connection refused, timeout or other request failure
    #[error("Request failed: {0}")]
    Request(String),

    /// Non-2xx response
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body was not a chat response
    #[error("Failed to decode response: {0}")]
    Decode(String),
}

/// One chat round trip
#[async_trait]
pub trait ChatEndpoint: Send + Sync {
    /// Send all turns plus the tool catalog, get back the assistant turn
    async fn chat(&self, turns: &[Turn], tools: &[Value]) -> Result<Turn, EndpointError>;
}
