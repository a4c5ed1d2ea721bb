use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub rules: RulesConfig,
    pub engine: EngineConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `INSIGHT_PROFILE`. When set (e.g. `CLIENT_A`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("INSIGHT_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            rules: RulesConfig::from_env_profiled(p),
            engine: EngineConfig::from_env_profiled(p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!(
            "  rules:   path={}, official_accounts={}",
            self.rules.rules_path.display(),
            self.rules
                .official_accounts_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(none)".to_string())
        );
        tracing::info!(
            "  project: {}",
            self.rules.project.as_deref().unwrap_or("(default scope only)")
        );
        tracing::info!(
            "  engine:  default_scope={}, channel_column={}",
            self.engine.default_scope,
            self.engine.channel_column
        );
    }
}

// ── Rule sources ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulesConfig {
    /// YAML file or directory of rule documents, or a JSON rule sheet.
    pub rules_path: PathBuf,
    pub official_accounts_path: Option<PathBuf>,
    /// Project whose scoped rules are applied on top of the default scope.
    pub project: Option<String>,
}

impl RulesConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            rules_path: PathBuf::from(profiled_env_or(p, "RULES_PATH", "data/rules")),
            official_accounts_path: profiled_env_opt(p, "OFFICIAL_ACCOUNTS_PATH").map(PathBuf::from),
            project: profiled_env_opt(p, "PROJECT_NAME"),
        }
    }
}

// ── Engine ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Scope tag of rules that apply to every project.
    pub default_scope: String,
    /// Column used by the per-rule channel filter.
    pub channel_column: String,
    /// Separator between entries of a chain-overwrite cell.
    pub chain_separator: String,
}

impl EngineConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            default_scope: profiled_env_or(p, "DEFAULT_SCOPE", "Default"),
            channel_column: profiled_env_or(p, "CHANNEL_COLUMN", "Channel"),
            chain_separator: profiled_env_or(p, "CHAIN_SEPARATOR", " ➔ "),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::from_env_profiled("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_label_defaults() {
        let mut config = Config::for_profile("");
        assert_eq!(config.profile_label(), "default");
        config.profile = "ACME".to_string();
        assert_eq!(config.profile_label(), "ACME");
    }

    #[test]
    fn profiled_key_wins_over_plain_key() {
        // Unique key names keep this independent of the process environment.
        env::set_var("INSIGHT_TEST_KEY_X", "plain");
        env::set_var("ZZPROFILE_INSIGHT_TEST_KEY_X", "profiled");
        assert_eq!(
            profiled_env_opt("ZZPROFILE", "INSIGHT_TEST_KEY_X").as_deref(),
            Some("profiled")
        );
        assert_eq!(
            profiled_env_opt("", "INSIGHT_TEST_KEY_X").as_deref(),
            Some("plain")
        );
        assert_eq!(profiled_env_opt("", "INSIGHT_TEST_KEY_MISSING"), None);
    }
}
