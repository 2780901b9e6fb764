//! Tool executor
//!
//! Resolves tool-call requests against the registry and dispatches them to a
//! `SkillRunner`:
//! - Unknown tool: failure result, no process spawned
//! - Invalid arguments: failure result, no process spawned
//! - N requests in, N results out, in request order
//! - Optional bounded concurrency within a batch

use crate::skills::SkillRunner;
use crate::tools::registry::ToolRegistry;
use crate::tools::validation::validate_arguments;
use crate::types::execution::{ExecutionResult, ToolFailure};
use crate::types::messages::ToolCallRequest;
use futures_util::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Default number of skill processes run at once within a batch
pub const DEFAULT_MAX_PARALLEL: usize = 1;

/// Dispatches tool calls to skills
#[derive(Clone)]
pub struct ToolExecutor {
    /// Shared read-only catalog
    registry: Arc<ToolRegistry>,

    /// Skill process runner
    runner: Arc<dyn SkillRunner>,

    /// Concurrency bound for batches
    max_parallel: usize,
}

impl ToolExecutor {
    /// Create new sequential executor
    pub fn new(registry: Arc<ToolRegistry>, runner: Arc<dyn SkillRunner>) -> Self {
        Self {
            registry,
            runner,
            max_parallel: DEFAULT_MAX_PARALLEL,
        }
    }

    /// Set batch concurrency (values below 1 are treated as 1)
    pub fn with_max_parallel(mut self, max_parallel: usize) -> Self {
        self.max_parallel = max_parallel.max(1);
        self
    }

    /// Get registry reference
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Get batch concurrency
    pub fn max_parallel(&self) -> usize {
        self.max_parallel
    }

    /// Execute one tool call
    pub async fn execute(&self, call: &ToolCallRequest) -> ExecutionResult {
        let start = Instant::now();

        let tool = match self.registry.get(&call.name) {
            Some(tool) => tool,
            None => {
                warn!(tool = %call.name, "model requested unknown tool");
                return ExecutionResult::failure(
                    &call.name,
                    ToolFailure::NotFound {
                        name: call.name.clone(),
                    },
                    start.elapsed(),
                );
            }
        };

        if let Err(failure) = validate_arguments(tool, &call.arguments) {
            warn!(tool = %call.name, "{}", failure);
            return ExecutionResult::failure(&call.name, failure, start.elapsed());
        }

        debug!(tool = %call.name, arguments = %call.arguments, "executing tool");
        let result = self
            .runner
            .run(&tool.name, &tool.binding, &call.arguments)
            .await;
        info!(
            tool = %call.name,
            success = result.success,
            duration_ms = result.duration_ms,
            "tool finished"
        );
        result
    }

    /// Execute a batch of tool calls, one result per request, in request order
    pub async fn execute_batch(&self, calls: &[ToolCallRequest]) -> Vec<ExecutionResult> {
        if self.max_parallel == 1 {
            let mut results = Vec::with_capacity(calls.len());
            for call in calls {
                results.push(self.execute(call).await);
            }
            return results;
        }

        // `buffered` yields in input order regardless of completion order
        stream::iter(calls)
            .map(|call| self.execute(call))
            .buffered(self.max_parallel)
            .collect::<Vec<_>>()
            .await
    }
}
