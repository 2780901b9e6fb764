//! Tool execution result types
//!
//! `ExecutionResult` is the normalized outcome of dispatching one tool call.
//! Every failure mode is represented here as data, classified by `ToolFailure`.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

/// Classified reason a tool call did not succeed
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ToolFailure {
    /// Requested tool is not in the registry
    #[error("Tool not found: {name}")]
    NotFound { name: String },

    /// Arguments do not satisfy the declared parameters
    #[error("Invalid arguments: {reason}")]
    InvalidArguments { reason: String },

    /// Skill process could not be started
    #[error("Failed to launch skill: {message}")]
    Spawn { message: String },

    /// Skill process exited with a non-zero status
    #[error("Skill exited with {}: {stderr}", exit_label(.code))]
    NonZeroExit { code: Option<i32>, stderr: String },

    /// Skill process exceeded its time budget and was killed
    #[error("Skill timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// Skill exited cleanly but stdout was not a JSON object
    #[error("Malformed skill output: {message}")]
    MalformedOutput { message: String },

    /// Skill ran and reported a non-success status
    #[error("Skill reported failure: {message}")]
    SkillError { message: String },
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("code {}", code),
        None => "signal".to_string(),
    }
}

/// Normalized outcome of one tool call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Whether the skill reported success
    pub success: bool,

    /// Tool name that was requested
    pub tool_name: String,

    /// Payload returned by the skill, or a synthesized error envelope
    pub result: Value,

    /// Human-readable error, if failed
    pub error: Option<String>,

    /// Classified failure, if failed
    pub failure: Option<ToolFailure>,

    /// Elapsed time in milliseconds
    pub duration_ms: u64,
}

impl ExecutionResult {
    /// Create successful result carrying the skill payload
    pub fn success(tool_name: impl Into<String>, result: Value, duration: Duration) -> Self {
        Self {
            success: true,
            tool_name: tool_name.into(),
            result,
            error: None,
            failure: None,
            duration_ms: duration.as_millis() as u64,
        }
    }

    /// Create failed result with a synthesized `{"status":"error"}` payload
    pub fn failure(tool_name: impl Into<String>, failure: ToolFailure, duration: Duration) -> Self {
        let message = failure.to_string();
        Self {
            success: false,
            tool_name: tool_name.into(),
            result: json!({ "status": "error", "message": message }),
            error: Some(message),
            failure: Some(failure),
            duration_ms: duration.as_millis() as u64,
        }
    }

    /// Create failed result where the skill's own payload is kept
    pub fn reported_failure(
        tool_name: impl Into<String>,
        result: Value,
        message: String,
        duration: Duration,
    ) -> Self {
        Self {
            success: false,
            tool_name: tool_name.into(),
            result,
            error: Some(message.clone()),
            failure: Some(ToolFailure::SkillError { message }),
            duration_ms: duration.as_millis() as u64,
        }
    }

    /// Elapsed time
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    /// JSON text of the payload, as appended to a tool turn
    pub fn to_tool_content(&self) -> String {
        serde_json::to_string(&self.result).unwrap_or_else(|_| "{}".to_string())
    }

    /// One-line summary for terminal output
    pub fn summary(&self) -> String {
        let status = if self.success { "ok" } else { "failed" };
        match &self.error {
            Some(error) => format!("{} {} in {}ms: {}", self.tool_name, status, self.duration_ms, error),
            None => format!("{} {} in {}ms", self.tool_name, status, self.duration_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_creation() {
        let result = ExecutionResult::success(
            "desktop_click",
            json!({"status": "success", "x": 1}),
            Duration::from_millis(100),
        );

        assert!(result.success);
        assert_eq!(result.tool_name, "desktop_click");
        assert_eq!(result.duration_ms, 100);
        assert!(result.error.is_none());
        assert!(result.failure.is_none());
    }

    #[test]
    fn test_failure_creation() {
        let result = ExecutionResult::failure(
            "nope",
            ToolFailure::NotFound {
                name: "nope".to_string(),
            },
            Duration::ZERO,
        );

        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("Tool not found: nope"));
        assert_eq!(result.result["status"], "error");
        assert_eq!(result.result["message"], "Tool not found: nope");
    }

    #[test]
    fn test_reported_failure_keeps_payload() {
        let payload = json!({"status": "error", "action": "get", "message": "no clipboard"});
        let result = ExecutionResult::reported_failure(
            "clipboard_get",
            payload.clone(),
            "no clipboard".to_string(),
            Duration::from_millis(5),
        );

        assert!(!result.success);
        assert_eq!(result.result, payload);
        assert!(matches!(result.failure, Some(ToolFailure::SkillError { .. })));
    }

    #[test]
    fn test_failure_display() {
        let timeout = ToolFailure::Timeout { timeout_ms: 1500 };
        assert!(timeout.to_string().contains("timed out"));

        let exit = ToolFailure::NonZeroExit {
            code: Some(2),
            stderr: "boom".to_string(),
        };
        assert_eq!(exit.to_string(), "Skill exited with code 2: boom");

        let killed = ToolFailure::NonZeroExit {
            code: None,
            stderr: String::new(),
        };
        assert!(killed.to_string().contains("signal"));
    }

    #[test]
    fn test_failure_serialization_is_tagged() {
        let failure = ToolFailure::Timeout { timeout_ms: 10 };
        let value = serde_json::to_value(&failure).unwrap();

        assert_eq!(value["kind"], "timeout");
        assert_eq!(value["timeout_ms"], 10);
    }

    #[test]
    fn test_tool_content() {
        let result = ExecutionResult::success("t", json!({"status": "success"}), Duration::ZERO);
        assert_eq!(result.to_tool_content(), r#"{"status":"success"}"#);
    }

    #[test]
    fn test_summary() {
        let result = ExecutionResult::failure(
            "window_find",
            ToolFailure::Timeout { timeout_ms: 60000 },
            Duration::from_millis(60001),
        );
        let summary = result.summary();
        assert!(summary.contains("window_find failed"));
        assert!(summary.contains("timed out"));
    }
}
