//! Conversation loop module
//!
//! State machine, append-only conversation state and the loop driver.

pub mod conversation;
pub mod orchestrator;
pub mod state;

// Re-export commonly used types
pub use conversation::Conversation;
pub use orchestrator::{
    ConversationLoop, ConversationOutcome, ConversationRun, LoopConfig, DEFAULT_MAX_ITERATIONS,
};
pub use state::{LoopEvent, LoopState};
