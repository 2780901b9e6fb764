//! skillbridge - CLI entry point

use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use skillbridge::{
    agent::{ConversationLoop, ConversationOutcome, ConversationRun},
    bootstrap::{Bootstrap, BootstrapStatus, EXIT_CODE_SETUP_NEEDED},
    cli::{Args, Commands, Config, Verbosity},
    ollama::OllamaClient,
    skills::{MockSkillRunner, SkillInvoker, SkillRunner},
    telemetry::{TelemetryCollector, TelemetryDisplay},
    tools::{ToolExecutor, ToolRegistry},
    types::{Role, ToolCallRequest},
};
use std::sync::Arc;
use std::time::Duration;

/// Exit code when a run fails (transport error or failed tool)
const EXIT_CODE_FAILURE: i32 = 1;

/// Exit code when the iteration cap was reached
const EXIT_CODE_EXHAUSTED: i32 = 3;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    if let Err(message) = args.validate() {
        bail!(message);
    }

    let mut config = Config::load(args.config.clone()).context("Failed to load configuration")?;
    if let Some(host) = &args.host {
        config.ollama.host = host.clone();
    }
    if let Some(port) = args.port {
        config.ollama.port = port;
    }

    let verbosity = if args.quiet || args.verbose > 0 {
        args.verbosity()
    } else {
        Verbosity::from_name(&config.telemetry.default_verbosity).unwrap_or(Verbosity::Normal)
    };

    // Initialize logging
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(verbosity.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if !config.telemetry.color_output {
        colored::control::set_override(false);
    }

    let code = match &args.command {
        Commands::Chat {
            task,
            model,
            max_iterations,
            category,
            system,
            dry_run,
        } => {
            let mut loop_config = config.loop_config();
            if let Some(max) = max_iterations {
                loop_config.max_iterations = *max;
            }
            if let Some(prompt) = system {
                loop_config.system_prompt = Some(prompt.clone());
            }
            loop_config.category = category.clone();
            let model = model.clone().unwrap_or_else(|| config.ollama.default_model.clone());
            run_chat(&config, &model, loop_config, task, *dry_run, verbosity).await?
        }
        Commands::Invoke { tool, args } => invoke_tool(&config, tool, args, verbosity).await?,
        Commands::Tools { category, json } => list_tools(category.as_deref(), *json)?,
        Commands::Models => list_models(&config).await?,
        Commands::Check => check(&config).await?,
        Commands::Config { init } => {
            if *init {
                init_config(&config, &args)?
            } else {
                show_config(&config, &args)?
            }
        }
    };

    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}

fn build_executor(config: &Config, dry_run: bool) -> Result<ToolExecutor> {
    let registry = Arc::new(ToolRegistry::builtin().context("Built-in tool catalog is invalid")?);
    let runner: Arc<dyn SkillRunner> = if dry_run {
        Arc::new(MockSkillRunner)
    } else {
        Arc::new(SkillInvoker::new(config.invoker_config()))
    };
    Ok(ToolExecutor::new(registry, runner).with_max_parallel(config.skills.max_parallel))
}

fn spinner(message: &str) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}

async fn run_chat(
    config: &Config,
    model: &str,
    loop_config: skillbridge::agent::LoopConfig,
    task: &str,
    dry_run: bool,
    verbosity: Verbosity,
) -> Result<i32> {
    let executor = build_executor(config, dry_run)?;
    if let Some(category) = &loop_config.category {
        executor.registry().ensure_category(category)?;
    }

    let client = OllamaClient::with_config(&config.ollama_url(), model, config.request_timeout())?;

    // 1. Bootstrap check
    match Bootstrap::new(client.clone()).check().await? {
        BootstrapStatus::Ready => {}
        BootstrapStatus::OllamaNotRunning => {
            Bootstrap::show_ollama_install_instructions(client.base_url());
            return Ok(EXIT_CODE_SETUP_NEEDED);
        }
        BootstrapStatus::ModelNotAvailable(model) => {
            Bootstrap::show_model_pull_instructions(&model);
            return Ok(EXIT_CODE_SETUP_NEEDED);
        }
    }

    // 2. Build the loop
    let telemetry = TelemetryCollector::new();
    let conversation_loop = ConversationLoop::new(Arc::new(client), executor, loop_config)
        .with_telemetry(telemetry.clone());

    if verbosity.show_progress() {
        println!("{} {}", "Model:".bold(), model);
        if dry_run {
            println!("{}", "Dry run: skills are not executed".yellow());
        }
    }

    // 3. Run
    let pb = if verbosity.show_progress() {
        Some(spinner("Working...")?)
    } else {
        None
    };
    let run = conversation_loop.run(task).await?;
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    let display = TelemetryDisplay::new(telemetry, verbosity);
    if display.should_show_details() {
        print_tool_turns(&run, verbosity);
    }

    let code = match &run.outcome {
        ConversationOutcome::Answered { content } => {
            println!("\n{}", content);
            0
        }
        ConversationOutcome::Exhausted { max_iterations } => {
            eprintln!(
                "{} no answer after {} iterations",
                "Exhausted:".yellow().bold(),
                max_iterations
            );
            EXIT_CODE_EXHAUSTED
        }
        ConversationOutcome::TransportFailure { iteration, error } => {
            eprintln!(
                "{} iteration {}: {}",
                "Request failed:".red().bold(),
                iteration,
                error
            );
            EXIT_CODE_FAILURE
        }
    };

    display.display_summary();
    Ok(code)
}

fn print_tool_turns(run: &ConversationRun, verbosity: Verbosity) {
    for turn in run.conversation.turns() {
        if turn.role != Role::Tool {
            continue;
        }
        let name = turn.tool_name.as_deref().unwrap_or("?");
        let ok = serde_json::from_str::<Value>(&turn.content)
            .map(|v| v["status"] == "success")
            .unwrap_or(false);
        let marker = if ok { "ok".green() } else { "failed".red() };
        println!("  {} {}", marker, name.cyan());
        if verbosity.show_payloads() {
            println!("     {}", turn.content.dimmed());
        }
    }
}

async fn invoke_tool(config: &Config, tool: &str, raw_args: &str, verbosity: Verbosity) -> Result<i32> {
    let arguments: Value =
        serde_json::from_str(raw_args).context("ARGS_JSON must be a JSON object")?;
    let executor = build_executor(config, false)?;

    let pb = if verbosity.show_progress() {
        Some(spinner(&format!("Executing: {}", tool))?)
    } else {
        None
    };
    let result = executor.execute(&ToolCallRequest::new(tool, arguments)).await;
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    println!("{}", serde_json::to_string_pretty(&result.result)?);
    if verbosity.show_progress() {
        let summary = result.summary();
        if result.success {
            eprintln!("{}", summary.green());
        } else {
            eprintln!("{}", summary.red());
        }
    }

    Ok(if result.success { 0 } else { EXIT_CODE_FAILURE })
}

fn list_tools(category: Option<&str>, json: bool) -> Result<i32> {
    let registry = ToolRegistry::builtin()?;

    if json {
        let descriptors = match category {
            Some(category) => registry.descriptors_for(category),
            None => registry.descriptors(),
        };
        println!("{}", serde_json::to_string_pretty(&descriptors)?);
        return Ok(0);
    }

    let categories: Vec<&str> = match category {
        Some(category) => {
            registry.ensure_category(category)?;
            vec![category]
        }
        None => registry.categories(),
    };

    for category in categories {
        let tools = registry.by_category(category);
        println!("\n{} ({} tools)", category.bold(), tools.len());
        for tool in tools {
            let params: Vec<String> = tool
                .parameters
                .iter()
                .map(|p| {
                    if p.required {
                        p.name.clone()
                    } else {
                        format!("[{}]", p.name)
                    }
                })
                .collect();
            println!("  {} {}", tool.name.cyan(), params.join(" ").dimmed());
            println!("      {}", tool.description);
        }
    }
    println!("\nTotal: {} tools", registry.len());
    Ok(0)
}

async fn list_models(config: &Config) -> Result<i32> {
    let client = OllamaClient::with_config(
        &config.ollama_url(),
        &config.ollama.default_model,
        config.request_timeout(),
    )?;

    let models = client
        .list_models()
        .await
        .context("Failed to list models (is Ollama running?)")?;

    println!("{}", "Available models:".bold());
    for model in models {
        if model == config.ollama.default_model {
            println!("  {} {}", model.green(), "(default)".dimmed());
        } else {
            println!("  {}", model);
        }
    }
    Ok(0)
}

async fn check(config: &Config) -> Result<i32> {
    let client = OllamaClient::with_config(
        &config.ollama_url(),
        &config.ollama.default_model,
        config.request_timeout(),
    )?;
    let base_url = client.base_url().to_string();

    match Bootstrap::new(client).check().await? {
        BootstrapStatus::Ready => {
            println!("{} Ollama at {}", "ok".green(), base_url);
            println!("{} model {}", "ok".green(), config.ollama.default_model);
            Ok(0)
        }
        BootstrapStatus::OllamaNotRunning => {
            Bootstrap::show_ollama_install_instructions(&base_url);
            Ok(EXIT_CODE_SETUP_NEEDED)
        }
        BootstrapStatus::ModelNotAvailable(model) => {
            println!("{} Ollama at {}", "ok".green(), base_url);
            Bootstrap::show_model_pull_instructions(&model);
            Ok(EXIT_CODE_SETUP_NEEDED)
        }
    }
}

fn init_config(config: &Config, args: &Args) -> Result<i32> {
    let path = match args.config.clone().or_else(Config::default_path) {
        Some(path) => path,
        None => bail!("Cannot determine home directory; pass --config <PATH>"),
    };
    if path.exists() {
        bail!("{} already exists", path.display());
    }

    config.save(&path)?;
    println!("{} {}", "Wrote".green(), path.display());
    Ok(0)
}

fn show_config(config: &Config, args: &Args) -> Result<i32> {
    let source = match &args.config {
        Some(path) => path.display().to_string(),
        None => Config::default_path()
            .filter(|p| p.exists())
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "built-in defaults".to_string()),
    };

    println!("{} {}\n", "Configuration from".bold(), source);
    println!("{}", config.to_toml()?);
    Ok(0)
}
