//! Configuration management for skillbridge
//!
//! Provides TOML-based configuration with defaults and validation.
//! Location: ~/.skillbridge/config.toml

use crate::agent::{LoopConfig, DEFAULT_MAX_ITERATIONS};
use crate::cli::args::Verbosity;
use crate::errors::{BridgeError, Result};
use crate::ollama::{DEFAULT_MODEL, DEFAULT_REQUEST_TIMEOUT};
use crate::skills::invoker::{
    DEFAULT_INLINE_PARAM_LIMIT, DEFAULT_MAX_DIAGNOSTIC_BYTES, DEFAULT_SKILL_TIMEOUT,
};
use crate::skills::{Interpreters, InvokerConfig, SpawnOptions};
use crate::tools::DEFAULT_MAX_PARALLEL;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Complete configuration for skillbridge
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub ollama: OllamaConfig,
    pub agent: AgentConfig,
    pub skills: SkillsConfig,
    pub telemetry: TelemetryConfig,
}

/// Ollama connection configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaConfig {
    pub host: String,
    pub port: u16,
    pub default_model: String,
    pub request_timeout_secs: u64,
}

/// Conversation loop configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub max_iterations: usize,
    pub system_prompt: Option<String>,
}

/// Skill process configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillsConfig {
    /// Directory relative skill script paths resolve against
    pub base_dir: String,
    pub timeout_secs: u64,
    pub max_diagnostic_bytes: usize,
    pub inline_param_limit: usize,
    pub max_parallel: usize,
    pub python: String,
    pub node: String,
    pub working_dir: Option<String>,
    /// Extra environment for skill processes (e.g. DISPLAY)
    pub env: BTreeMap<String, String>,
}

/// Telemetry display configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub default_verbosity: String,
    pub color_output: bool,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 11434,
            default_model: DEFAULT_MODEL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT.as_secs(),
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            system_prompt: None,
        }
    }
}

impl Default for SkillsConfig {
    fn default() -> Self {
        let interpreters = Interpreters::default();
        Self {
            base_dir: ".".to_string(),
            timeout_secs: DEFAULT_SKILL_TIMEOUT.as_secs(),
            max_diagnostic_bytes: DEFAULT_MAX_DIAGNOSTIC_BYTES,
            inline_param_limit: DEFAULT_INLINE_PARAM_LIMIT,
            max_parallel: DEFAULT_MAX_PARALLEL,
            python: interpreters.python,
            node: interpreters.node,
            working_dir: None,
            env: BTreeMap::new(),
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            default_verbosity: "normal".to_string(),
            color_output: true,
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        if let Some(config_path) = path {
            Self::load_from_file(&config_path)
        } else {
            Self::load_default()
        }
    }

    /// Load configuration from specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| BridgeError::ConfigError(format!("Failed to read config: {}", e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| BridgeError::ConfigError(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load default configuration from standard location or use built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Some(config_path) = Self::default_path() {
            if config_path.exists() {
                return Self::load_from_file(&config_path);
            }
        }

        Ok(Config::default())
    }

    /// Standard config file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".skillbridge").join("config.toml"))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.ollama.request_timeout_secs == 0 {
            return Err(BridgeError::ConfigError(
                "request_timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.agent.max_iterations == 0 {
            return Err(BridgeError::ConfigError(
                "max_iterations must be greater than 0".to_string(),
            ));
        }

        if self.skills.timeout_secs == 0 {
            return Err(BridgeError::ConfigError(
                "skills timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.skills.max_parallel == 0 {
            return Err(BridgeError::ConfigError(
                "max_parallel must be greater than 0".to_string(),
            ));
        }

        if Verbosity::from_name(&self.telemetry.default_verbosity).is_none() {
            return Err(BridgeError::ConfigError(format!(
                "Invalid verbosity level: {}",
                self.telemetry.default_verbosity
            )));
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| BridgeError::ConfigError(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                BridgeError::ConfigError(format!("Failed to create config dir: {}", e))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| BridgeError::ConfigError(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// Render as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| BridgeError::ConfigError(format!("Failed to serialize config: {}", e)))
    }

    /// Get Ollama base URL
    pub fn ollama_url(&self) -> String {
        format!("http://{}:{}", self.ollama.host, self.ollama.port)
    }

    /// Ollama request timeout
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.ollama.request_timeout_secs)
    }

    /// Skill invoker settings
    pub fn invoker_config(&self) -> InvokerConfig {
        let skills = &self.skills;
        InvokerConfig::new(Self::expand_path(&skills.base_dir))
            .with_timeout(Duration::from_secs(skills.timeout_secs))
            .with_max_diagnostic_bytes(skills.max_diagnostic_bytes)
            .with_inline_param_limit(skills.inline_param_limit)
            .with_interpreters(Interpreters {
                python: skills.python.clone(),
                node: skills.node.clone(),
                ..Interpreters::default()
            })
            .with_spawn_options(SpawnOptions {
                env: skills.env.clone(),
                working_dir: skills.working_dir.as_deref().map(Self::expand_path),
            })
    }

    /// Conversation loop settings
    pub fn loop_config(&self) -> LoopConfig {
        LoopConfig {
            max_iterations: self.agent.max_iterations,
            system_prompt: self.agent.system_prompt.clone(),
            category: None,
        }
    }

    /// Expand tilde in paths
    pub fn expand_path(path: &str) -> PathBuf {
        if let Some(rest) = path.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
        PathBuf::from(path)
    }
}
