//! Runner that echoes calls back without spawning anything

use crate::skills::SkillRunner;
use crate::tools::types::SkillBinding;
use crate::types::execution::ExecutionResult;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

/// Dry-run runner
#[derive(Debug, Clone, Copy, Default)]
pub struct MockSkillRunner;

#[async_trait]
impl SkillRunner for MockSkillRunner {
    async fn run(&self, tool_name: &str, binding: &SkillBinding, params: &Value) -> ExecutionResult {
        debug!(tool = tool_name, action = %binding.action, "mock skill call");
        ExecutionResult::success(
            tool_name,
            json!({
                "status": "success",
                "action": binding.action,
                "params": params,
                "mock": true,
            }),
            Duration::ZERO,
        )
    }
}
