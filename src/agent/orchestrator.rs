//! Conversation loop
//!
//! Drives one request through the endpoint until the model answers without
//! tool calls, the iteration cap is reached, or the endpoint fails:
//! - Every round trip sends all turns plus the tool catalog
//! - A tool-call batch is executed in full before the next round trip
//! - One tool turn per result, in request order
//! - No retry; an endpoint error ends the run

use crate::agent::conversation::Conversation;
use crate::agent::state::{LoopEvent, LoopState};
use crate::errors::Result;
use crate::ollama::{ChatEndpoint, EndpointError};
use crate::telemetry::{TelemetryCollector, TelemetryEvent};
use crate::tools::ToolExecutor;
use crate::types::messages::Turn;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Default iteration cap
pub const DEFAULT_MAX_ITERATIONS: usize = 5;

/// Conversation loop configuration
#[derive(Debug, Clone)]
pub struct LoopConfig {
    /// Maximum round trips, inclusive
    pub max_iterations: usize,

    /// Optional system turn placed before the request
    pub system_prompt: Option<String>,

    /// Offer only this tool category to the model
    pub category: Option<String>,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            system_prompt: None,
            category: None,
        }
    }
}

/// How a run ended
#[derive(Debug, Clone, PartialEq)]
pub enum ConversationOutcome {
    /// The model replied without tool calls
    Answered { content: String },

    /// The cap was reached while the model still requested tools
    Exhausted { max_iterations: usize },

    /// The endpoint failed during the given round trip
    TransportFailure {
        iteration: usize,
        error: EndpointError,
    },
}

impl ConversationOutcome {
    pub fn is_answered(&self) -> bool {
        matches!(self, ConversationOutcome::Answered { .. })
    }
}

/// Report of one run
#[derive(Debug, Clone)]
pub struct ConversationRun {
    pub outcome: ConversationOutcome,
    pub conversation: Conversation,

    /// Round trips performed (the failing one included)
    pub iterations: usize,
}

/// Multi-turn tool-calling loop
pub struct ConversationLoop {
    endpoint: Arc<dyn ChatEndpoint>,
    executor: ToolExecutor,
    config: LoopConfig,
    telemetry: Option<TelemetryCollector>,
}

impl ConversationLoop {
    /// Create new loop
    pub fn new(endpoint: Arc<dyn ChatEndpoint>, executor: ToolExecutor, config: LoopConfig) -> Self {
        Self {
            endpoint,
            executor,
            config,
            telemetry: None,
        }
    }

    /// Attach a telemetry collector
    pub fn with_telemetry(mut self, telemetry: TelemetryCollector) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    /// Get configuration
    pub fn config(&self) -> &LoopConfig {
        &self.config
    }

    /// Tool descriptors offered on every round trip
    pub fn offered_tools(&self) -> Vec<Value> {
        let registry = self.executor.registry();
        match &self.config.category {
            Some(category) => registry.descriptors_for(category),
            None => registry.descriptors(),
        }
    }

    /// Run one request to completion
    ///
    /// Transport failures and exhaustion are outcomes, not errors. An `Err`
    /// here means the loop state machine was driven out of order.
    pub async fn run(&self, request: &str) -> Result<ConversationRun> {
        let tools = self.offered_tools();
        let max_iterations = self.config.max_iterations.max(1);
        let mut conversation = Conversation::new(self.config.system_prompt.as_deref(), request);
        let mut state = LoopState::Initial;
        let mut iteration = 1;

        if tools.is_empty() {
            warn!(category = ?self.config.category, "no tools offered to the model");
        }
        info!(tools = tools.len(), max_iterations, "starting conversation");
        self.advance(&mut state, LoopEvent::Start)?;

        loop {
            let started = Instant::now();
            let reply = match self.endpoint.chat(conversation.turns(), &tools).await {
                Ok(reply) => reply,
                Err(error) => {
                    warn!(iteration, "endpoint failed: {}", error);
                    self.advance(&mut state, LoopEvent::TransportError)?;
                    return Ok(ConversationRun {
                        outcome: ConversationOutcome::TransportFailure { iteration, error },
                        conversation,
                        iterations: iteration,
                    });
                }
            };

            let calls = reply.tool_calls.clone();
            self.record(TelemetryEvent::RoundTrip {
                iteration,
                duration_ms: started.elapsed().as_millis() as u64,
                tool_calls: calls.len(),
                timestamp: Instant::now(),
            });

            let content = reply.content.clone();
            conversation.push(reply);

            if calls.is_empty() {
                self.advance(&mut state, LoopEvent::AnswerReceived)?;
                info!(iteration, "model answered");
                return Ok(ConversationRun {
                    outcome: ConversationOutcome::Answered { content },
                    conversation,
                    iterations: iteration,
                });
            }

            self.advance(&mut state, LoopEvent::ToolCallsReceived)?;
            debug!(iteration, calls = calls.len(), "dispatching tool batch");

            self.record(TelemetryEvent::BatchDispatched {
                tool_count: calls.len(),
                timestamp: Instant::now(),
            });
            for call in &calls {
                self.record(TelemetryEvent::ToolStarted {
                    tool: call.name.clone(),
                    timestamp: Instant::now(),
                });
            }

            for result in self.executor.execute_batch(&calls).await {
                self.record(TelemetryEvent::ToolCompleted {
                    tool: result.tool_name.clone(),
                    duration_ms: result.duration_ms,
                    success: result.success,
                    timestamp: Instant::now(),
                });
                conversation.push(Turn::tool(&result.tool_name, result.to_tool_content()));
            }

            if iteration >= max_iterations {
                self.advance(&mut state, LoopEvent::IterationCapReached)?;
                warn!(max_iterations, "iteration cap reached without an answer");
                return Ok(ConversationRun {
                    outcome: ConversationOutcome::Exhausted { max_iterations },
                    conversation,
                    iterations: iteration,
                });
            }

            self.advance(&mut state, LoopEvent::ToolsCompleted)?;
            iteration += 1;
        }
    }

    fn advance(&self, state: &mut LoopState, event: LoopEvent) -> Result<()> {
        let next = state.transition(event)?;
        self.record(TelemetryEvent::StateTransition {
            from: state.display_name().to_string(),
            to: next.display_name().to_string(),
            timestamp: Instant::now(),
        });
        *state = next;
        Ok(())
    }

    fn record(&self, event: TelemetryEvent) {
        if let Some(telemetry) = &self.telemetry {
            telemetry.record(event);
        }
    }
}
