//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Budgie - Track expenses by chatting
#[derive(Parser)]
#[command(name = "budgie")]
#[command(about = "Chat-style personal expense tracker", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3001")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Directory with the built frontend to serve
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },

    /// Parse a free-text message into expenses
    Parse {
        /// Message text, e.g. "lunch $12"
        #[arg(required = true)]
        text: Vec<String>,

        /// Use the regex heuristic only, even if AI is configured
        #[arg(long)]
        offline: bool,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Evaluate spending against a monthly budget
    Evaluate {
        /// Total spent so far
        #[arg(long)]
        spent: f64,

        /// Monthly budget (omit for "no budget set")
        #[arg(long)]
        budget: Option<f64>,

        /// Print JSON
        #[arg(long)]
        json: bool,
    },

    /// Suggest a starting monthly budget from current spending (no AI)
    Suggest {
        /// Total spent so far
        #[arg(long)]
        spent: f64,

        /// Number of expenses tracked
        #[arg(long, default_value = "1")]
        count: usize,

        /// Print JSON
        #[arg(long)]
        json: bool,
    },

    /// Test the configured AI backend
    AiTest {
        /// Message to parse as a smoke test
        #[arg(long)]
        text: Option<String>,
    },

    /// Manage AI prompts (view, customize)
    Prompts {
        #[command(subcommand)]
        action: Option<PromptsAction>,
    },
}

#[derive(Subcommand)]
pub enum PromptsAction {
    /// List all available prompts and their override status
    List,

    /// Show the content of a specific prompt
    Show {
        /// Prompt ID (parse_expenses, budget_advice, budget_suggestion)
        prompt_id: String,
    },

    /// Show the path where prompt overrides should be placed
    Path,
}
