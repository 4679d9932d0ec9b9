//! Prompt Library for the AI provider
//!
//! Prompts are loaded with a two-layer resolution:
//! 1. Check for override in the override dir (`BUDGIE_PROMPTS_DIR`, or
//!    ~/.local/share/budgie/prompts/overrides/)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Each prompt file starts with YAML frontmatter followed by a `# System`
//! and a `# User` section. `{{var}}` placeholders are substituted on render.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde::Deserialize;

use crate::error::{Error, Result};

/// Embedded default prompts (compiled into binary)
mod defaults {
    pub const PARSE_EXPENSES: &str = include_str!("../../../prompts/parse_expenses.md");
    pub const BUDGET_ADVICE: &str = include_str!("../../../prompts/budget_advice.md");
    pub const BUDGET_SUGGESTION: &str = include_str!("../../../prompts/budget_suggestion.md");
}

/// Known prompt IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptId {
    ParseExpenses,
    BudgetAdvice,
    BudgetSuggestion,
}

impl PromptId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ParseExpenses => "parse_expenses",
            Self::BudgetAdvice => "budget_advice",
            Self::BudgetSuggestion => "budget_suggestion",
        }
    }

    pub fn all() -> &'static [PromptId] {
        &[Self::ParseExpenses, Self::BudgetAdvice, Self::BudgetSuggestion]
    }

    fn default_content(&self) -> &'static str {
        match self {
            Self::ParseExpenses => defaults::PARSE_EXPENSES,
            Self::BudgetAdvice => defaults::BUDGET_ADVICE,
            Self::BudgetSuggestion => defaults::BUDGET_SUGGESTION,
        }
    }
}

/// Prompt frontmatter metadata
#[derive(Debug, Clone, Deserialize)]
pub struct PromptMetadata {
    pub id: String,
    pub version: u32,
    /// Sampling temperature sent with the completion request
    pub temperature: f32,
    pub max_tokens: u32,
}

/// A loaded prompt with metadata and content
#[derive(Debug, Clone)]
pub struct Prompt {
    pub metadata: PromptMetadata,
    pub content: String,
    pub is_override: bool,
    pub override_path: Option<PathBuf>,
}

impl Prompt {
    pub fn system_section(&self) -> Option<&str> {
        extract_section(&self.content, "# System")
    }

    pub fn user_section(&self) -> Option<&str> {
        extract_section(&self.content, "# User")
    }

    /// Render the system section with variables
    pub fn render_system(&self, vars: &HashMap<&str, &str>) -> String {
        render_template(self.system_section().unwrap_or_default(), vars)
    }

    /// Render the user section with variables, or the whole prompt if it has none
    pub fn render_user(&self, vars: &HashMap<&str, &str>) -> String {
        render_template(self.user_section().unwrap_or(&self.content), vars)
    }
}

/// Prompt library for loading and caching prompts
pub struct PromptLibrary {
    override_dir: Option<PathBuf>,
    cache: HashMap<PromptId, Prompt>,
}

impl PromptLibrary {
    /// Create a prompt library with the default override directory
    pub fn new() -> Self {
        Self {
            override_dir: default_prompts_dir(),
            cache: HashMap::new(),
        }
    }

    pub fn with_override_dir(path: PathBuf) -> Self {
        Self {
            override_dir: Some(path),
            cache: HashMap::new(),
        }
    }

    /// Embedded prompts only, overrides are ignored
    pub fn embedded_only() -> Self {
        Self {
            override_dir: None,
            cache: HashMap::new(),
        }
    }

    /// Get a prompt by ID, loading from override or default
    pub fn get(&mut self, id: PromptId) -> Result<&Prompt> {
        match self.cache.entry(id) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let prompt = load(self.override_dir.as_deref(), id)?;
                Ok(entry.insert(prompt))
            }
        }
    }

    pub fn has_override(&self, id: PromptId) -> bool {
        self.override_dir
            .as_ref()
            .is_some_and(|dir| override_file(dir, id).exists())
    }
}

impl Default for PromptLibrary {
    fn default() -> Self {
        Self::new()
    }
}

/// Default prompts override directory
pub fn default_prompts_dir() -> Option<PathBuf> {
    if let Some(dir) = std::env::var_os("BUDGIE_PROMPTS_DIR").filter(|d| !d.is_empty()) {
        return Some(PathBuf::from(dir));
    }
    dirs::data_local_dir().map(|d| d.join("budgie").join("prompts").join("overrides"))
}

fn override_file(dir: &Path, id: PromptId) -> PathBuf {
    dir.join(format!("{}.md", id.as_str()))
}

/// Load a prompt (checking override first, then default)
fn load(override_dir: Option<&Path>, id: PromptId) -> Result<Prompt> {
    if let Some(dir) = override_dir {
        let path = override_file(dir, id);
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let (metadata, body) = parse_prompt(&content)?;
            tracing::debug!(prompt = id.as_str(), path = %path.display(), "Using prompt override");
            return Ok(Prompt {
                metadata,
                content: body,
                is_override: true,
                override_path: Some(path),
            });
        }
    }

    let (metadata, body) = parse_prompt(id.default_content())?;
    Ok(Prompt {
        metadata,
        content: body,
        is_override: false,
        override_path: None,
    })
}

/// Parse a prompt file into metadata and body
fn parse_prompt(content: &str) -> Result<(PromptMetadata, String)> {
    let content = content.trim();

    let rest = content.strip_prefix("---").ok_or_else(|| {
        Error::InvalidData("Prompt must start with YAML frontmatter (---)".into())
    })?;

    let end = rest.find("---").ok_or_else(|| {
        Error::InvalidData("Prompt frontmatter not closed (missing second ---)".into())
    })?;

    let frontmatter = rest[..end].trim();
    let body = rest[end + 3..].trim();

    let metadata: PromptMetadata = serde_yaml::from_str(frontmatter)
        .map_err(|e| Error::InvalidData(format!("Invalid prompt frontmatter: {}", e)))?;

    Ok((metadata, body.to_string()))
}

/// Extract a section from the prompt content
fn extract_section<'a>(content: &'a str, header: &str) -> Option<&'a str> {
    let start = content.find(header)?;
    let after_header = &content[start + header.len()..];
    let end = after_header.find("\n# ").unwrap_or(after_header.len());

    Some(after_header[..end].trim())
}

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Regex::new(r"\{\{(\w+)\}\}").expect("valid regex"))
}

/// Mustache-style `{{var}}` replacement in a single pass
///
/// Substituted values are never scanned again. Unknown names are left as is.
fn render_template(template: &str, vars: &HashMap<&str, &str>) -> String {
    placeholder_regex()
        .replace_all(template, |caps: &Captures| match vars.get(&caps[1]) {
            Some(value) => (*value).to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_prompt() {
        let content = r#"---
id: test_prompt
version: 2
temperature: 0.5
max_tokens: 100
---

# System
Test system prompt.

# User
Test user prompt with {{variable}}.
"#;

        let (metadata, body) = parse_prompt(content).unwrap();
        assert_eq!(metadata.id, "test_prompt");
        assert_eq!(metadata.version, 2);
        assert_eq!(metadata.max_tokens, 100);
        assert!(body.contains("# System"));
        assert!(body.contains("# User"));
    }

    #[test]
    fn test_parse_prompt_requires_frontmatter() {
        assert!(parse_prompt("# System\nhello").is_err());
        assert!(parse_prompt("---\nid: x\n# System").is_err());
    }

    #[test]
    fn test_extract_section() {
        let content = "# System\nSystem content here.\n\n# User\nUser content here.";

        assert_eq!(
            extract_section(content, "# System"),
            Some("System content here.")
        );
        assert_eq!(extract_section(content, "# User"), Some("User content here."));
        assert_eq!(extract_section(content, "# Missing"), None);
    }

    #[test]
    fn test_default_prompts_parse() {
        for id in PromptId::all() {
            let (metadata, body) = parse_prompt(id.default_content()).unwrap();
            assert_eq!(metadata.id, id.as_str(), "Prompt ID mismatch");
            assert!(body.contains("# System"));
            assert!(body.contains("# User"));
        }
    }

    #[test]
    fn test_parse_prompt_renders_text() {
        let mut lib = PromptLibrary::embedded_only();
        let prompt = lib.get(PromptId::ParseExpenses).unwrap();

        let mut vars = HashMap::new();
        vars.insert("text", "lunch $12");
        vars.insert("categories", "food, other");

        assert_eq!(prompt.render_user(&vars), "lunch $12");
        let system = prompt.render_system(&vars);
        assert!(system.contains("One of these categories: food, other"));
        assert!(!system.contains("{{"));
    }

    #[test]
    fn test_render_does_not_expand_placeholders_inside_values() {
        let mut lib = PromptLibrary::embedded_only();
        let prompt = lib.get(PromptId::ParseExpenses).unwrap();

        let mut vars = HashMap::new();
        vars.insert("text", "note {{categories}} 12");
        vars.insert("categories", "food, other");

        for _ in 0..50 {
            assert_eq!(prompt.render_user(&vars), "note {{categories}} 12");
        }
    }

    #[test]
    fn test_render_template_leaves_unknown_names() {
        let mut vars = HashMap::new();
        vars.insert("a", "1");

        assert_eq!(render_template("{{a}} and {{b}}", &vars), "1 and {{b}}");
        assert_eq!(render_template("{{a}}{{a}}", &vars), "11");
    }

    #[test]
    fn test_override_takes_precedence() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("budget_advice.md"),
            "---\nid: budget_advice\nversion: 9\ntemperature: 0.2\nmax_tokens: 50\n---\n# System\nBe brief.\n\n# User\nSpent {{total_spent}}",
        )
        .unwrap();

        let mut lib = PromptLibrary::with_override_dir(dir.path().to_path_buf());
        assert!(lib.has_override(PromptId::BudgetAdvice));
        assert!(!lib.has_override(PromptId::ParseExpenses));

        let prompt = lib.get(PromptId::BudgetAdvice).unwrap();
        assert!(prompt.is_override);
        assert_eq!(prompt.metadata.version, 9);
        assert_eq!(prompt.system_section(), Some("Be brief."));

        let default = lib.get(PromptId::ParseExpenses).unwrap();
        assert!(!default.is_override);
    }
}
