//! KAI Search - Main Entry Point
//!
//! Opens the command search overlay once in the current terminal. An accepted
//! command is run through the configured shell, or printed to stdout when the
//! user chose insert-only (Alt+Enter) or `--print` was given, so a shell
//! widget can place it on the command line.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use kai_search::llm::{OpenRouterProvider, API_KEY_ENV};
use kai_search::logging;
use kai_search::overlay::{CrosstermTerminal, OverlayConfig, PromptOverlay, SessionFactory};
use kai_search::tools::{exit_code, run_shell_command};
use tracing::info;

/// Exit code when the user cancels, matching an interrupted shell command
const CANCELLED_EXIT_CODE: i32 = 130;

#[derive(Debug, Parser)]
#[command(name = "kai-search", version, about = "Ask for a shell command in plain language")]
struct Args {
    /// Print the accepted command instead of running it
    #[arg(long)]
    print: bool,

    /// Configuration file (defaults to the user config directory)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Initial prompt placed in the input field
    prompt: Vec<String>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    match run(args).await {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("ERROR: {:#}", e);
            process::exit(1);
        }
    }
}

async fn run(args: Args) -> Result<i32> {
    let config = OverlayConfig::load(args.config.as_deref()).context("failed to load configuration")?;
    let _log_guard = logging::init(&config)?;

    let provider = OpenRouterProvider::from_env(&config).with_context(|| {
        format!(
            "AI command search requires an OpenRouter API key; get one from https://openrouter.ai and export {}",
            API_KEY_ENV
        )
    })?;

    let mut terminal = CrosstermTerminal::new(&config);
    let overlay =
        PromptOverlay::new(Arc::new(SessionFactory::new())).with_initial_prompt(args.prompt.join(" "));

    let result = overlay
        .show(&mut terminal, &provider)
        .await
        .context("command search overlay failed")?;

    let Some(result) = result else {
        info!("command search cancelled");
        return Ok(CANCELLED_EXIT_CODE);
    };

    if result.execute && !args.print {
        let status = run_shell_command(&config.shell, &result.command)?;
        return Ok(exit_code(status));
    }

    let mut stdout = io::stdout();
    writeln!(stdout, "{}", result.command)?;
    stdout.flush()?;
    Ok(0)
}
