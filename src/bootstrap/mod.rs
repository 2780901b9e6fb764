//! Startup checks
//!
//! Verifies that Ollama is reachable and the configured model is installed
//! before a conversation starts.

use crate::errors::Result;
use crate::ollama::OllamaClient;

/// Exit code for setup needed
pub const EXIT_CODE_SETUP_NEEDED: i32 = 2;

/// Bootstrap check result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapStatus {
    Ready,
    OllamaNotRunning,
    ModelNotAvailable(String),
}

/// Ollama availability checker
pub struct Bootstrap {
    client: OllamaClient,
}

impl Bootstrap {
    /// Create a new checker around a configured client
    pub fn new(client: OllamaClient) -> Self {
        Self { client }
    }

    /// Check if Ollama API is reachable
    pub async fn check_ollama_running(&self) -> bool {
        self.client.health_check().await
    }

    /// Check if specific model is available
    pub async fn check_model_available(&self, model_tag: &str) -> Result<bool> {
        let models = self.client.list_models().await?;
        Ok(model_installed(&models, model_tag))
    }

    /// Run complete bootstrap check for the client's model
    pub async fn check(&self) -> Result<BootstrapStatus> {
        if !self.check_ollama_running().await {
            return Ok(BootstrapStatus::OllamaNotRunning);
        }

        let model = self.client.model();
        if !self.check_model_available(model).await? {
            return Ok(BootstrapStatus::ModelNotAvailable(model.to_string()));
        }

        Ok(BootstrapStatus::Ready)
    }

    /// Display installation instructions for Ollama
    pub fn show_ollama_install_instructions(base_url: &str) {
        eprintln!("\nOllama is not reachable at {}", base_url);
        eprintln!("\nInstallation:");
        eprintln!("   Linux:   curl -fsSL https://ollama.com/install.sh | sh");
        eprintln!("   macOS:   brew install ollama");
        eprintln!("\nStart Ollama:");
        eprintln!("   ollama serve");
        eprintln!();
    }

    /// Display instructions for pulling a model
    pub fn show_model_pull_instructions(model_tag: &str) {
        eprintln!("\nModel '{}' not found!", model_tag);
        eprintln!("\nTo download this model, run:");
        eprintln!("   ollama pull {}", model_tag);
        eprintln!("\nOr choose a different model with:");
        eprintln!("   skillbridge chat --model <model> <task>");
        eprintln!();
    }
}

/// Whether `model_tag` is among the installed models
///
/// A tag without a version matches its `:latest` install.
pub fn model_installed(models: &[String], model_tag: &str) -> bool {
    models.iter().any(|name| {
        name == model_tag
            || (!model_tag.contains(':') && name.strip_suffix(":latest") == Some(model_tag))
    })
}
