use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AdweaveError, Result};

/// Top-level Adweave configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_workspace")]
    pub workspace: String,
    #[serde(default = "default_locale")]
    pub locale: String,
    /// Database file path. Default: <workspace>/adweave.db
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default)]
    pub executor: ExecutorConfig,
    #[serde(default)]
    pub providers: Vec<ProviderConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace: default_workspace(),
            locale: default_locale(),
            database: None,
            executor: ExecutorConfig::default(),
            providers: vec![],
        }
    }
}

/// Executor tuning: attempt budget and human-review behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutorConfig {
    /// Attempts per node before escalation (default: 3).
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Seconds to wait for a human review decision before failing escalation.
    #[serde(default = "default_review_timeout")]
    pub review_timeout_secs: u64,
    /// Resolve escalations automatically with the last known partial output.
    #[serde(default)]
    pub auto_approve: bool,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            review_timeout_secs: default_review_timeout(),
            auto_approve: false,
        }
    }
}

fn default_max_attempts() -> u32 { 3 }
fn default_review_timeout() -> u64 { 300 }
fn default_workspace() -> String { "~/.adweave".to_string() }
fn default_locale() -> String { "en-US".to_string() }

/// One configured content-generation backend.
///
/// Loaded once at startup, read-only thereafter. Lower priority is tried
/// first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub id: String,
    pub name: String,
    #[serde(default = "default_priority")]
    pub priority: i32,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    /// Default model id for this provider.
    #[serde(default)]
    pub model: Option<String>,
    /// Flagged providers always answer synthetically, even in live mode.
    #[serde(default)]
    pub mock: bool,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Requests allowed per 60-second window (default: 10).
    #[serde(default = "default_rate_limit")]
    pub rate_limit: u32,
}

impl ProviderConfig {
    /// A usable credential is present and non-empty.
    pub fn has_credential(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }
}

fn default_priority() -> i32 { 100 }
fn default_enabled() -> bool { true }
fn default_rate_limit() -> u32 { 10 }

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|_| AdweaveError::ConfigNotFound(path.display().to_string()))?;

        // Expand ${ENV_VAR} references
        let expanded = expand_env_vars(&content);

        let config: Self =
            toml::from_str(&expanded).map_err(|e| AdweaveError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject malformed provider definitions before anything starts.
    pub fn validate(&self) -> Result<()> {
        let mut seen = std::collections::HashSet::new();
        for p in &self.providers {
            if p.id.is_empty() {
                return Err(AdweaveError::Config("Provider with empty id".into()));
            }
            if !seen.insert(p.id.as_str()) {
                return Err(AdweaveError::Config(format!(
                    "Duplicate provider id: '{}'",
                    p.id
                )));
            }
            if p.rate_limit == 0 {
                return Err(AdweaveError::Config(format!(
                    "Provider '{}' has a zero rate limit",
                    p.id
                )));
            }
        }
        if self.executor.max_attempts == 0 {
            return Err(AdweaveError::Config("executor.max_attempts must be >= 1".into()));
        }
        Ok(())
    }

    /// Resolve the workspace directory (expand ~).
    pub fn workspace_dir(&self) -> PathBuf {
        let ws = &self.workspace;
        if let Some(rest) = ws.strip_prefix("~/") {
            if let Some(home) = dirs_home() {
                return home.join(rest);
            }
        }
        PathBuf::from(ws)
    }

    /// Resolve the database path.
    pub fn database_path(&self) -> PathBuf {
        match &self.database {
            Some(p) => PathBuf::from(p),
            None => self.workspace_dir().join("adweave.db"),
        }
    }
}

/// Expand `${ENV_VAR}` patterns in a string.
fn expand_env_vars(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '$' && chars.peek() == Some(&'{') {
            chars.next(); // consume '{'
            let mut var_name = String::new();
            for c in chars.by_ref() {
                if c == '}' {
                    break;
                }
                var_name.push(c);
            }
            match std::env::var(&var_name) {
                Ok(val) => result.push_str(&val),
                Err(_) => {
                    // Keep original if env var not set
                    result.push_str(&format!("${{{}}}", var_name));
                }
            }
        } else {
            result.push(c);
        }
    }
    result
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(PathBuf::from)
}
