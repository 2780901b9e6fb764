//! Conversation loop state machine
//!
//! Valid transitions:
//! 1. Initial          → AwaitingResponse (on: Start)
//! 2. AwaitingResponse → ExecutingTools   (on: ToolCallsReceived)
//! 3. AwaitingResponse → Answered         (on: AnswerReceived)
//! 4. AwaitingResponse → Failed           (on: TransportError)
//! 5. ExecutingTools   → AwaitingResponse (on: ToolsCompleted)
//! 6. ExecutingTools   → Exhausted        (on: IterationCapReached)
//! 7. Terminal states absorb every event

use crate::errors::{BridgeError, Result};
use serde::{Deserialize, Serialize};

/// Conversation loop states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoopState {
    /// Turns seeded, nothing sent yet
    Initial,

    /// Waiting for the endpoint's reply
    AwaitingResponse,

    /// Running the requested tool batch
    ExecutingTools,

    /// Model replied without tool calls (terminal)
    Answered,

    /// Iteration cap reached (terminal)
    Exhausted,

    /// Endpoint failed (terminal)
    Failed,
}

/// Events that drive the loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopEvent {
    Start,
    ToolCallsReceived,
    AnswerReceived,
    TransportError,
    ToolsCompleted,
    IterationCapReached,
}

impl LoopState {
    /// Check if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            LoopState::Answered | LoopState::Exhausted | LoopState::Failed
        )
    }

    /// Attempt state transition
    pub fn transition(&self, event: LoopEvent) -> Result<LoopState> {
        use LoopEvent::*;
        use LoopState::*;

        let next = match (self, event) {
            (Initial, Start) => AwaitingResponse,

            (AwaitingResponse, ToolCallsReceived) => ExecutingTools,
            (AwaitingResponse, AnswerReceived) => Answered,
            (AwaitingResponse, TransportError) => Failed,

            (ExecutingTools, ToolsCompleted) => AwaitingResponse,
            (ExecutingTools, IterationCapReached) => Exhausted,

            (state, _) if state.is_terminal() => *state,

            (from, event) => {
                return Err(BridgeError::InvalidTransition {
                    from: format!("{:?}", from),
                    event: format!("{:?}", event),
                });
            }
        };

        Ok(next)
    }

    /// Human-readable state name
    pub fn display_name(&self) -> &'static str {
        match self {
            LoopState::Initial => "Initializing",
            LoopState::AwaitingResponse => "Waiting for model",
            LoopState::ExecutingTools => "Executing tools",
            LoopState::Answered => "Answered",
            LoopState::Exhausted => "Iteration limit reached",
            LoopState::Failed => "Failed",
        }
    }
}
