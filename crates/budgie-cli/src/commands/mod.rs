//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `ai` - AI backend smoke test
//! - `budget` - Budget evaluation and suggestion
//! - `parse` - Free-text expense parsing
//! - `prompts` - Prompt library management commands
//! - `serve` - Web server command

pub mod ai;
pub mod budget;
pub mod parse;
pub mod prompts;
pub mod serve;

// Re-export command functions for main.rs
pub use ai::*;
pub use budget::*;
pub use parse::*;
pub use prompts::*;
pub use serve::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
