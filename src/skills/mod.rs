//! External skill processes
//!
//! A skill is an out-of-process executable invoked as
//! `<executable> <action> <params>` that prints one JSON object on stdout.

pub mod catalog;
pub mod invoker;
pub mod launcher;
pub mod mock;

pub use catalog::Skill;
pub use invoker::{truncate_diagnostic, InvokerConfig, SkillInvoker, SpawnOptions};
pub use launcher::{Interpreters, Launcher};
pub use mock::MockSkillRunner;

use crate::tools::types::SkillBinding;
use crate::types::execution::ExecutionResult;
use async_trait::async_trait;
use serde_json::Value;

/// Runs one bound skill action
///
/// Implementations never fail: every problem is reported through the
/// returned `ExecutionResult`.
#[async_trait]
pub trait SkillRunner: Send + Sync {
    async fn run(&self, tool_name: &str, binding: &SkillBinding, params: &Value) -> ExecutionResult;
}
