//! Integration tests for skillbridge
//!
//! Runs the registry, executor, invoker and conversation loop together
//! against stub skill scripts and a scripted endpoint. No Ollama required.

#![cfg(unix)]

use async_trait::async_trait;
use serde_json::{json, Value};
use skillbridge::{
    agent::{ConversationLoop, ConversationOutcome, LoopConfig},
    ollama::{ChatEndpoint, EndpointError},
    skills::{InvokerConfig, Skill, SkillInvoker},
    tools::{SkillBinding, ToolDefinition, ToolExecutor, ToolRegistry},
    types::{Role, ToolCallRequest, ToolFailure, Turn},
};
use std::collections::VecDeque;
use std::os::unix::fs::PermissionsExt;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

const ECHO_SKILL: &str = r#"#!/bin/sh
printf '{"status":"success","action":"%s","params":%s}' "$1" "$2"
"#;

fn write_echo_skill(dir: &TempDir) {
    let path = dir.path().join("echo.sh");
    std::fs::write(&path, ECHO_SKILL).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
}

/// Built-in catalog with every tool rebound to the echo skill
fn echo_registry() -> Arc<ToolRegistry> {
    let tools: Vec<ToolDefinition> = ToolRegistry::builtin()
        .unwrap()
        .list_all()
        .iter()
        .cloned()
        .map(|mut tool| {
            let action = tool.binding.action.clone();
            tool.binding = SkillBinding::new(Skill::Custom("echo.sh".to_string()), action);
            tool
        })
        .collect();
    Arc::new(ToolRegistry::from_definitions(tools).unwrap())
}

fn echo_executor(dir: &TempDir) -> ToolExecutor {
    write_echo_skill(dir);
    let invoker = SkillInvoker::new(
        InvokerConfig::new(dir.path()).with_timeout(Duration::from_secs(10)),
    );
    ToolExecutor::new(echo_registry(), Arc::new(invoker))
}

struct ScriptedEndpoint {
    replies: Mutex<VecDeque<Turn>>,
    requests: Mutex<Vec<Vec<Turn>>>,
}

impl ScriptedEndpoint {
    fn new(replies: Vec<Turn>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ChatEndpoint for ScriptedEndpoint {
    async fn chat(&self, turns: &[Turn], _tools: &[Value]) -> Result<Turn, EndpointError> {
        self.requests.lock().unwrap().push(turns.to_vec());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| EndpointError::Request("script exhausted".to_string()))
    }
}

#[tokio::test]
async fn test_click_passes_arguments_unchanged() {
    let dir = TempDir::new().unwrap();
    let executor = echo_executor(&dir);

    let result = executor
        .execute(&ToolCallRequest::new("desktop_click", json!({"x": 10, "y": 20})))
        .await;

    assert!(result.success, "{:?}", result.error);
    assert_eq!(result.result["action"], "click");
    // Defaults (button, clicks, duration) are left to the skill
    assert_eq!(result.result["params"], json!({"x": 10, "y": 20}));
}

#[tokio::test]
async fn test_missing_coordinate_rejected_before_spawn() {
    let dir = TempDir::new().unwrap();
    let executor = echo_executor(&dir);

    let result = executor
        .execute(&ToolCallRequest::new("desktop_click", json!({"x": 10})))
        .await;

    assert!(!result.success);
    assert!(matches!(result.failure, Some(ToolFailure::InvalidArguments { .. })));
}

#[tokio::test]
async fn test_batch_mixes_known_and_unknown_tools() {
    let dir = TempDir::new().unwrap();
    let executor = echo_executor(&dir).with_max_parallel(3);

    let calls = vec![
        ToolCallRequest::new("window_find", json!({"title": "Terminal"})),
        ToolCallRequest::new("no_such_tool", json!({})),
        ToolCallRequest::new("clipboard_copy", json!({"text": "hi"})),
    ];
    let results = executor.execute_batch(&calls).await;

    assert_eq!(results.len(), 3);
    assert!(results[0].success);
    assert_eq!(results[0].result["params"]["title"], "Terminal");
    assert!(matches!(results[1].failure, Some(ToolFailure::NotFound { .. })));
    assert_eq!(results[2].result["action"], "copy");
}

#[tokio::test]
async fn test_conversation_runs_real_skill() {
    let dir = TempDir::new().unwrap();
    let executor = echo_executor(&dir);
    let endpoint = Arc::new(ScriptedEndpoint::new(vec![
        Turn::assistant(
            "",
            vec![ToolCallRequest::new("desktop_click", json!({"x": 10, "y": 20}))],
        ),
        Turn::assistant("Clicked at (10, 20).", Vec::new()),
    ]));
    let config = LoopConfig {
        system_prompt: Some("You control the desktop.".to_string()),
        ..Default::default()
    };

    let run = ConversationLoop::new(endpoint.clone(), executor, config)
        .run("click at 10,20")
        .await
        .unwrap();

    assert_eq!(
        run.outcome,
        ConversationOutcome::Answered {
            content: "Clicked at (10, 20).".to_string()
        }
    );
    assert_eq!(run.iterations, 2);

    let roles: Vec<Role> = run.conversation.turns().iter().map(|t| t.role).collect();
    assert_eq!(
        roles,
        vec![Role::System, Role::User, Role::Assistant, Role::Tool, Role::Assistant]
    );

    let tool_turn = &run.conversation.turns()[3];
    assert_eq!(tool_turn.tool_name.as_deref(), Some("desktop_click"));
    let payload: Value = serde_json::from_str(&tool_turn.content).unwrap();
    assert_eq!(payload["params"], json!({"x": 10, "y": 20}));

    // The second request carried the tool result
    let requests = endpoint.requests.lock().unwrap();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].len(), 4);
}

#[tokio::test]
async fn test_conversation_transport_failure_after_tools() {
    let dir = TempDir::new().unwrap();
    let executor = echo_executor(&dir);
    let endpoint = Arc::new(ScriptedEndpoint::new(vec![Turn::assistant(
        "",
        vec![ToolCallRequest::new("clipboard_get", json!({}))],
    )]));

    let run = ConversationLoop::new(endpoint, executor, LoopConfig::default())
        .run("what is on the clipboard?")
        .await
        .unwrap();

    match run.outcome {
        ConversationOutcome::TransportFailure { iteration, .. } => assert_eq!(iteration, 2),
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert_eq!(run.conversation.count(Role::Tool), 1);
}
