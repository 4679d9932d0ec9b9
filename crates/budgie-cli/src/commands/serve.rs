//! Server command implementation

use std::path::Path;

use anyhow::{Context, Result};

pub async fn cmd_serve(host: &str, port: u16, static_dir: Option<&Path>) -> Result<()> {
    println!("🚀 Starting Budgie web server...");
    println!("   Listening: http://{}:{}", host, port);
    if let Some(dir) = static_dir {
        println!("   Static files: {}", dir.display());
    }

    let config = budgie_server::ServerConfig::from_env();
    if config.allowed_origins.is_empty() {
        println!("   🌐 CORS: any origin");
    } else {
        println!(
            "   🌐 CORS: {} (BUDGIE_ALLOWED_ORIGINS)",
            config.allowed_origins.join(", ")
        );
    }
    println!("   ⏱️  AI timeout: {}s", config.ai_timeout.as_secs());
    println!();
    println!("   Press Ctrl+C to stop");

    let static_dir_str = static_dir
        .map(|p| p.to_str().context("static_dir path must be valid UTF-8"))
        .transpose()?;
    budgie_server::serve_with_config(host, port, static_dir_str, config).await?;

    Ok(())
}
