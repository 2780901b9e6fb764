//! skillbridge - desktop-automation skills as Ollama tools
//!
//! Offers a catalog of tools to a local Ollama model, runs the tool calls it
//! requests as external skill processes, and feeds the results back until
//! the model answers.
//!
//! # Architecture
//!
//! - **tools**: registry of typed tool definitions, argument validation, executor
//! - **skills**: skill catalog, process invoker, dry-run runner
//! - **ollama**: `/api/chat` client behind the `ChatEndpoint` seam
//! - **agent**: conversation loop and its state machine

pub mod errors;
pub mod types;

pub mod skills;
pub mod tools;

pub mod agent;
pub mod ollama;

pub mod bootstrap;
pub mod cli;
pub mod telemetry;

// Re-export commonly used types
pub use agent::{ConversationLoop, ConversationOutcome, ConversationRun, LoopConfig};
pub use errors::{BridgeError, Result};
pub use tools::{ToolExecutor, ToolRegistry};
pub use types::{ExecutionResult, ToolCallRequest, ToolFailure, Turn};
