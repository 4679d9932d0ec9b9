//! Budgie CLI - Chat-style expense tracker
//!
//! Usage:
//!   budgie serve --port 3001            Start web server
//!   budgie parse "lunch $12"            Parse a message into expenses
//!   budgie evaluate --spent 95 --budget 100
//!   budgie suggest --spent 1000 --count 12
//!   budgie ai-test                      Check the configured AI backend

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Serve {
            port,
            host,
            static_dir,
        } => commands::cmd_serve(&host, port, static_dir.as_deref()).await,
        Commands::Parse {
            text,
            offline,
            json,
        } => commands::cmd_parse(&text.join(" "), offline, json).await,
        Commands::Evaluate {
            spent,
            budget,
            json,
        } => commands::cmd_evaluate(spent, budget, json),
        Commands::Suggest { spent, count, json } => commands::cmd_suggest(spent, count, json),
        Commands::AiTest { text } => commands::cmd_ai_test(text.as_deref()).await,
        Commands::Prompts { action } => match action {
            None | Some(PromptsAction::List) => commands::cmd_prompts_list(),
            Some(PromptsAction::Show { prompt_id }) => commands::cmd_prompts_show(&prompt_id),
            Some(PromptsAction::Path) => commands::cmd_prompts_path(),
        },
    }
}
