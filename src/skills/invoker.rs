//! Skill process invoker
//!
//! Runs one external skill action and normalizes the outcome:
//! - One process per call, no retry, no reuse
//! - Timeout enforcement (process killed on expiry)
//! - Bounded diagnostics from runaway output
//! - Every failure returned as an `ExecutionResult`, never an error

use crate::skills::launcher::{Interpreters, Launcher};
use crate::skills::{Skill, SkillRunner};
use crate::tools::types::SkillBinding;
use crate::types::execution::{ExecutionResult, ToolFailure};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{debug, warn};

/// Default time budget for one skill process
pub const DEFAULT_SKILL_TIMEOUT: Duration = Duration::from_secs(60);

/// Default cap on diagnostic text carried in a failure
pub const DEFAULT_MAX_DIAGNOSTIC_BYTES: usize = 4096;

/// Payloads above this size are passed through a temporary file
pub const DEFAULT_INLINE_PARAM_LIMIT: usize = 8192;

/// Per-call process options
///
/// Passed explicitly to every spawn; the bridge never mutates its own
/// environment on behalf of a skill.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpawnOptions {
    /// Extra environment variables (e.g. `DISPLAY`)
    pub env: BTreeMap<String, String>,

    /// Working directory for the skill process
    pub working_dir: Option<PathBuf>,
}

/// Skill invoker settings
#[derive(Debug, Clone)]
pub struct InvokerConfig {
    /// Base directory for relative skill script paths
    pub base_dir: PathBuf,

    /// Maximum execution time per process
    pub timeout: Duration,

    /// Maximum diagnostic size (bytes)
    pub max_diagnostic_bytes: usize,

    /// Largest payload passed inline on the command line (bytes)
    pub inline_param_limit: usize,

    /// Interpreters for script skills
    pub interpreters: Interpreters,

    /// Environment and working directory for spawned skills
    pub spawn: SpawnOptions,
}

impl Default for InvokerConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            timeout: DEFAULT_SKILL_TIMEOUT,
            max_diagnostic_bytes: DEFAULT_MAX_DIAGNOSTIC_BYTES,
            inline_param_limit: DEFAULT_INLINE_PARAM_LIMIT,
            interpreters: Interpreters::default(),
            spawn: SpawnOptions::default(),
        }
    }
}

impl InvokerConfig {
    /// Create config rooted at a skills base directory
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            ..Default::default()
        }
    }

    /// Set timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set max diagnostic size
    pub fn with_max_diagnostic_bytes(mut self, size: usize) -> Self {
        self.max_diagnostic_bytes = size;
        self
    }

    /// Set inline payload limit
    pub fn with_inline_param_limit(mut self, size: usize) -> Self {
        self.inline_param_limit = size;
        self
    }

    /// Set interpreters
    pub fn with_interpreters(mut self, interpreters: Interpreters) -> Self {
        self.interpreters = interpreters;
        self
    }

    /// Set spawn options
    pub fn with_spawn_options(mut self, spawn: SpawnOptions) -> Self {
        self.spawn = spawn;
        self
    }
}

/// Truncate diagnostic text to at most `max_bytes`, on a char boundary
pub fn truncate_diagnostic(text: &str, max_bytes: usize) -> String {
    let text = text.trim();
    if text.len() <= max_bytes {
        return text.to_string();
    }

    let mut end = max_bytes;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... [truncated {} bytes]", &text[..end], text.len() - end)
}

/// Runs skill processes
#[derive(Debug, Clone, Default)]
pub struct SkillInvoker {
    config: InvokerConfig,
}

impl SkillInvoker {
    /// Create new invoker
    pub fn new(config: InvokerConfig) -> Self {
        Self { config }
    }

    /// Get invoker configuration
    pub fn config(&self) -> &InvokerConfig {
        &self.config
    }

    /// Resolve a skill's script against the base directory
    ///
    /// The result is absolute whenever the current directory is known, so a
    /// skill started in another `working_dir` still finds its script.
    pub fn resolve_script(&self, skill: &Skill) -> PathBuf {
        let script = Path::new(skill.script_path());
        let resolved = if script.is_absolute() {
            script.to_path_buf()
        } else {
            self.config.base_dir.join(script)
        };

        if resolved.is_absolute() {
            return resolved;
        }
        match std::env::current_dir() {
            Ok(cwd) => cwd.join(resolved),
            Err(e) => {
                warn!("cannot read current directory, keeping relative script path: {}", e);
                resolved
            }
        }
    }

    /// Execute one skill action
    pub async fn invoke(&self, tool_name: &str, binding: &SkillBinding, params: &Value) -> ExecutionResult {
        let start = Instant::now();
        let script = self.resolve_script(&binding.skill);

        let payload = match serde_json::to_string(params) {
            Ok(payload) => payload,
            Err(e) => {
                return ExecutionResult::failure(
                    tool_name,
                    ToolFailure::InvalidArguments {
                        reason: format!("Arguments are not serializable: {}", e),
                    },
                    start.elapsed(),
                );
            }
        };

        // The temp file (if any) must outlive the child process
        let (params_source, _params_file) = match self.params_source(payload) {
            Ok(source) => source,
            Err(e) => {
                return ExecutionResult::failure(
                    tool_name,
                    ToolFailure::Spawn {
                        message: format!("Failed to write parameter file: {}", e),
                    },
                    start.elapsed(),
                );
            }
        };

        let launcher = Launcher::for_script(&script);
        let mut cmd = launcher.command(
            &script,
            &self.config.interpreters,
            &binding.action,
            &params_source,
        );
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .envs(&self.config.spawn.env)
            .kill_on_drop(true);
        if let Some(dir) = &self.config.spawn.working_dir {
            cmd.current_dir(dir);
        }

        debug!(
            tool = tool_name,
            skill = %binding.skill,
            action = %binding.action,
            script = %script.display(),
            "spawning skill"
        );

        let child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                warn!(tool = tool_name, "failed to spawn skill: {}", e);
                return ExecutionResult::failure(
                    tool_name,
                    ToolFailure::Spawn {
                        message: format!("{}: {}", script.display(), e),
                    },
                    start.elapsed(),
                );
            }
        };

        // Dropping the pending future drops the child, which kills it
        match timeout(self.config.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => self.interpret(tool_name, output, start),
            Ok(Err(e)) => ExecutionResult::failure(
                tool_name,
                ToolFailure::Spawn {
                    message: format!("Failed to collect skill output: {}", e),
                },
                start.elapsed(),
            ),
            Err(_) => {
                warn!(tool = tool_name, timeout_ms = self.config.timeout.as_millis() as u64, "skill timed out");
                ExecutionResult::failure(
                    tool_name,
                    ToolFailure::Timeout {
                        timeout_ms: self.config.timeout.as_millis() as u64,
                    },
                    start.elapsed(),
                )
            }
        }
    }

    /// Inline JSON, or a temp file path for oversized payloads
    fn params_source(
        &self,
        payload: String,
    ) -> std::io::Result<(OsString, Option<tempfile::NamedTempFile>)> {
        if payload.len() <= self.config.inline_param_limit {
            return Ok((payload.into(), None));
        }

        let mut file = tempfile::Builder::new()
            .prefix("skillbridge-params-")
            .suffix(".json")
            .tempfile()?;
        file.write_all(payload.as_bytes())?;
        file.flush()?;
        debug!(bytes = payload.len(), path = %file.path().display(), "passing parameters by file");
        Ok((file.path().as_os_str().to_os_string(), Some(file)))
    }

    /// Classify a finished process
    fn interpret(&self, tool_name: &str, output: Output, start: Instant) -> ExecutionResult {
        let limit = self.config.max_diagnostic_bytes;
        let stdout = String::from_utf8_lossy(&output.stdout);

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let diagnostic = if stderr.trim().is_empty() {
                &*stdout
            } else {
                &*stderr
            };
            let failure = ToolFailure::NonZeroExit {
                code: output.status.code(),
                stderr: truncate_diagnostic(diagnostic, limit),
            };
            warn!(tool = tool_name, "{}", failure);
            return ExecutionResult::failure(tool_name, failure, start.elapsed());
        }

        let payload: Value = match serde_json::from_str(stdout.trim()) {
            Ok(value) => value,
            Err(e) => {
                let failure = ToolFailure::MalformedOutput {
                    message: format!("{} (stdout: {})", e, truncate_diagnostic(&stdout, limit)),
                };
                warn!(tool = tool_name, "{}", failure);
                return ExecutionResult::failure(tool_name, failure, start.elapsed());
            }
        };

        if !payload.is_object() {
            return ExecutionResult::failure(
                tool_name,
                ToolFailure::MalformedOutput {
                    message: "expected a JSON object".to_string(),
                },
                start.elapsed(),
            );
        }

        match payload.get("status").and_then(Value::as_str) {
            Some("success") => ExecutionResult::success(tool_name, payload, start.elapsed()),
            status => {
                let message = payload
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| match status {
                        Some(status) => format!("Skill returned status '{}'", status),
                        None => "Skill output has no status field".to_string(),
                    });
                let message = truncate_diagnostic(&message, limit);
                debug!(tool = tool_name, "skill reported failure: {}", message);
                ExecutionResult::reported_failure(tool_name, payload, message, start.elapsed())
            }
        }
    }
}

#[async_trait]
impl SkillRunner for SkillInvoker {
    async fn run(&self, tool_name: &str, binding: &SkillBinding, params: &Value) -> ExecutionResult {
        self.invoke(tool_name, binding, params).await
    }
}
