//! AI backend smoke test

use anyhow::Result;
use budgie_core::{AIBackend, AIClient, SpendingSnapshot};

const SAMPLE_MESSAGES: &[&str] = &[
    "lunch $12",
    "groceries 85 and coffee 4.50",
    "uber to the airport 32; netflix 15.99",
];

/// Test the configured AI backend with sample requests
pub async fn cmd_ai_test(text: Option<&str>) -> Result<()> {
    println!("🔍 Testing AI backend...\n");

    let backend = std::env::var("AI_BACKEND").unwrap_or_else(|_| "openai".to_string());
    println!("  AI_BACKEND: {}", backend);
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if !key.trim().is_empty() => println!("  OPENAI_API_KEY: set"),
        _ => println!("  ⚠️  OPENAI_API_KEY not set"),
    }
    if let Ok(base) = std::env::var("OPENAI_BASE_URL") {
        println!("  OPENAI_BASE_URL: {}", base);
    }

    let Some(client) = AIClient::from_env() else {
        println!("\n⚠️  No AI backend configured.");
        println!("\nTo enable AI features:");
        println!("  1. Create an API key with your provider");
        println!("  2. Set environment variable: export OPENAI_API_KEY=...");
        println!("  3. Optionally set OPENAI_BASE_URL and OPENAI_MODEL");
        println!("\nParsing keeps working with the local regex heuristic.");
        return Ok(());
    };

    println!(
        "  Backend: {} at {} (model: {})\n",
        client.backend_name(),
        client.host(),
        client.model()
    );

    print!("Checking availability... ");
    if client.health_check().await {
        println!("✅ Connected");
    } else {
        println!("❌ Failed");
        println!("\n⚠️  Could not reach {}", client.host());
        return Ok(());
    }

    let messages: Vec<&str> = match text {
        Some(t) => vec![t],
        None => SAMPLE_MESSAGES.to_vec(),
    };

    println!("\n📋 Testing expense parsing...\n");

    let mut parsed = Vec::new();
    for message in messages {
        print!("  \"{}\" → ", message);
        match client.parse_expenses(message).await {
            Ok(items) if items.is_empty() => println!("(no expenses)"),
            Ok(items) => {
                let rendered: Vec<String> = items
                    .iter()
                    .map(|e| format!("{} ${:.2} ({})", e.description, e.amount, e.category))
                    .collect();
                println!("{}", rendered.join(", "));
                parsed.extend(items);
            }
            Err(e) => println!("❌ Error: {}", e),
        }
    }

    if parsed.is_empty() {
        return Ok(());
    }

    let snapshot = SpendingSnapshot {
        expenses: parsed,
        category_totals: None,
    };

    println!("\n💡 Testing budget suggestion...\n");
    match client.suggest_budget(&snapshot).await {
        Ok(s) => println!("  ${:.2}: {}", s.suggestion, s.reasoning),
        Err(e) => println!("  ❌ Error: {}", e),
    }

    println!("\n💬 Testing budget advice...\n");
    match client.budget_advice(&snapshot).await {
        Ok(advice) => println!("  {}", advice),
        Err(e) => println!("  ❌ Error: {}", e),
    }

    println!("\n✅ AI test complete");
    Ok(())
}
