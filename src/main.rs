//! CodeForge - natural-language feature requests to multi-file code changes
//!
//! CLI entry point for the planner/architect/coder pipeline.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;
use eyre::{Context, Result};
use tracing::{debug, info};
use uuid::Uuid;

use codeforge::agents;
use codeforge::cli::{Cli, Command};
use codeforge::config::Config;
use codeforge::graph::{AgentState, GraphNode};
use codeforge::llm::create_client;
use codeforge::tools::ToolContext;

fn setup_logging(cli_log_level: Option<&str>) -> Result<()> {
    // Note: Can't log params here since logging isn't initialized yet
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("codeforge")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let level = match cli_log_level.map(|s| s.to_uppercase()).as_deref() {
        Some("TRACE") => tracing::Level::TRACE,
        Some("DEBUG") => tracing::Level::DEBUG,
        Some("INFO") | None => tracing::Level::INFO,
        Some("WARN") | Some("WARNING") => tracing::Level::WARN,
        Some("ERROR") => tracing::Level::ERROR,
        Some(other) => {
            eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", other);
            tracing::Level::INFO
        }
    };

    let log_file = fs::File::create(log_dir.join("codeforge.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    config.validate()?;

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Command::Run { prompt, project_root } => cmd_run(&config, &prompt, project_root).await,
        Command::Plan { prompt } => cmd_plan(&config, &prompt).await,
    }
}

/// Run the full pipeline and print a summary
async fn cmd_run(config: &Config, prompt: &str, project_root: Option<PathBuf>) -> Result<()> {
    debug!(%prompt, ?project_root, "cmd_run: called");

    // Resolve the project root once; tools never consult the cwd
    let root = match project_root {
        Some(root) => {
            fs::create_dir_all(&root).context(format!("Failed to create project root {}", root.display()))?;
            root.canonicalize()
                .context(format!("Failed to resolve project root {}", root.display()))?
        }
        None => config.project.resolve_root()?,
    };

    let llm = create_client(&config.llm).context("Failed to create LLM client")?;
    let run_id = Uuid::now_v7().to_string();
    let ctx = ToolContext::new(root.clone(), run_id.clone());

    println!("{} {}", "Request:".bold(), prompt);
    println!("{} {}", "Project root:".bold(), root.display());
    println!();

    let state = agents::run(
        prompt,
        llm,
        ctx,
        config.llm.max_tokens,
        config.llm.max_turns_per_step,
    )
    .await?;

    if let Some(plan) = &state.plan {
        println!("{} {}", "Plan:".bold(), plan.name.cyan());
        println!("  {}", plan.description);
    }

    if let Some(task_plan) = &state.task_plan {
        println!();
        println!("{}", "Steps:".bold());
        for step in &task_plan.implementation_steps {
            println!("  {} {}", "✓".green(), step.filepath);
        }
    }

    println!();
    println!(
        "{} {} step(s) processed, status {}",
        "Done.".green().bold(),
        state.coder_state.as_ref().map(|cs| cs.current_step_idx).unwrap_or(0),
        state.status
    );

    Ok(())
}

/// Dry run: planner and architect only, nothing written to disk
async fn cmd_plan(config: &Config, prompt: &str) -> Result<()> {
    debug!(%prompt, "cmd_plan: called");

    let llm = create_client(&config.llm).context("Failed to create LLM client")?;
    let planner = agents::Planner::new(llm.clone(), config.llm.max_tokens);
    let architect = agents::Architect::new(llm, config.llm.max_tokens);

    let mut state = AgentState::new(prompt);
    let update = planner.run(&state).await?;
    state.apply(update);
    let plan = state
        .plan
        .clone()
        .ok_or_else(|| eyre::eyre!("planner produced no plan"))?;

    println!("{} {}", "Plan:".bold(), plan.name.cyan());
    println!("  {}", plan.description);
    if !plan.tech_stack.is_empty() {
        println!("  {} {}", "Stack:".bold(), plan.tech_stack);
    }

    if !plan.features.is_empty() {
        println!();
        println!("{}", "Features:".bold());
        for feature in &plan.features {
            println!("  - {}", feature);
        }
    }

    println!();
    println!("{}", "Files:".bold());
    for file in &plan.files {
        println!("  {} - {}", file.path.cyan(), file.purpose);
    }

    let update = architect.run(&state).await?;
    let task_plan = update
        .task_plan
        .ok_or_else(|| eyre::eyre!("architect produced no task plan"))?;

    println!();
    println!("{}", "Steps:".bold());
    for (idx, step) in task_plan.implementation_steps.iter().enumerate() {
        println!("  {}. {}", idx + 1, step.filepath.cyan());
        println!("     {}", step.task_description);
    }

    Ok(())
}
