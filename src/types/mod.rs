//! Type definitions module
//!
//! Conversation turns and tool execution outcomes.

pub mod execution;
pub mod messages;

// Re-export commonly used types
pub use execution::{ExecutionResult, ToolFailure};
pub use messages::{Role, ToolCallRequest, Turn};
