//! Command-line argument parsing for skillbridge
//!
//! Provides clap-based CLI with subcommands and verbosity control.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// skillbridge - Expose desktop-automation skills to a local Ollama model
#[derive(Parser, Debug)]
#[command(name = "skillbridge")]
#[command(version)]
#[command(about = "Drive desktop-automation skills from a local Ollama model through tool calling", long_about = None)]
pub struct Args {
    /// Ollama host (overrides config)
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Ollama port (overrides config)
    #[arg(long, global = true)]
    pub port: Option<u16>,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbosity level: -q (quiet), default (normal), -v (verbose), -vv (very verbose)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress all output except final result)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Run a request through the tool-calling loop
    Chat {
        /// What the model should do
        #[arg(value_name = "TASK")]
        task: String,

        /// Ollama model to use (overrides config)
        #[arg(short, long)]
        model: Option<String>,

        /// Maximum round trips (overrides config)
        #[arg(long)]
        max_iterations: Option<usize>,

        /// Offer only tools of this category
        #[arg(long)]
        category: Option<String>,

        /// System prompt (overrides config)
        #[arg(long)]
        system: Option<String>,

        /// Echo tool calls back instead of running skills
        #[arg(long)]
        dry_run: bool,
    },

    /// Invoke a single tool directly
    Invoke {
        /// Tool name
        #[arg(value_name = "TOOL")]
        tool: String,

        /// Arguments as a JSON object
        #[arg(value_name = "ARGS_JSON", default_value = "{}")]
        args: String,
    },

    /// List the tool catalog
    Tools {
        /// Only this category
        #[arg(long)]
        category: Option<String>,

        /// Print descriptors as JSON
        #[arg(long)]
        json: bool,
    },

    /// List available Ollama models
    Models,

    /// Check that Ollama is running and the model is installed
    Check,

    /// Display current configuration
    Config {
        /// Write the effective configuration to the config path
        #[arg(long)]
        init: bool,
    },
}

/// Verbosity level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    VeryVerbose,
}

impl Args {
    /// Get verbosity level based on flags
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::VeryVerbose,
            }
        }
    }

    /// Check flag combinations clap cannot express
    pub fn validate(&self) -> Result<(), String> {
        if self.quiet && self.verbose > 0 {
            return Err("Cannot combine --quiet with --verbose.".to_string());
        }

        if let Commands::Chat {
            task,
            max_iterations,
            ..
        } = &self.command
        {
            if task.trim().is_empty() {
                return Err("Task description must not be empty.".to_string());
            }
            if *max_iterations == Some(0) {
                return Err("--max-iterations must be at least 1.".to_string());
            }
        }

        Ok(())
    }
}

impl Verbosity {
    /// Parse a config file verbosity name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "quiet" => Some(Verbosity::Quiet),
            "normal" => Some(Verbosity::Normal),
            "verbose" => Some(Verbosity::Verbose),
            "very_verbose" => Some(Verbosity::VeryVerbose),
            _ => None,
        }
    }

    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "quiet",
            Verbosity::Normal => "normal",
            Verbosity::Verbose => "verbose",
            Verbosity::VeryVerbose => "very_verbose",
        }
    }

    /// Default tracing filter for this level
    pub fn log_filter(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "error",
            Verbosity::Normal => "warn",
            Verbosity::Verbose => "info",
            Verbosity::VeryVerbose => "debug",
        }
    }

    /// Check if should show progress spinners
    pub fn show_progress(&self) -> bool {
        !matches!(self, Verbosity::Quiet)
    }

    /// Check if should show per-tool events
    pub fn show_events(&self) -> bool {
        matches!(self, Verbosity::Verbose | Verbosity::VeryVerbose)
    }

    /// Check if should show full tool payloads
    pub fn show_payloads(&self) -> bool {
        matches!(self, Verbosity::VeryVerbose)
    }
}
