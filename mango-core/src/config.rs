use std::fs;
use std::path::Path;

use anyhow::Context as _;
use serde::Deserialize;

use mango_database::impls::progression::ProgressionRules;

/// Startup settings read from `config.json`. Immutable once loaded.
#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    pub xp_per_message: f64,
    pub min_message_length: usize,
    pub base_xp_per_level: f64,
    pub xp_growth_percent: f64,
    pub admin_role_name: String,
    /// Fallback when `DISCORD_TOKEN` is not set.
    #[serde(default)]
    pub token: Option<String>,
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config `{}`", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("invalid config `{}`", path.display()))
    }

    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.progression_rules()?;

        if config.admin_role_name.trim().is_empty() {
            anyhow::bail!("admin_role_name must not be empty");
        }

        Ok(config)
    }

    pub fn progression_rules(&self) -> anyhow::Result<ProgressionRules> {
        Ok(ProgressionRules::new(
            self.xp_per_message,
            self.min_message_length,
            self.base_xp_per_level,
            self.xp_growth_percent,
        )?)
    }

    /// Pick the bot token: environment first, then the config file.
    ///
    /// Placeholder values such as `PASTE_TOKEN_HERE` count as missing.
    pub fn resolve_token(&self, env_token: Option<String>) -> anyhow::Result<String> {
        env_token
            .into_iter()
            .chain(self.token.clone())
            .map(|token| token.trim().to_owned())
            .find(|token| !token.is_empty() && !token.starts_with("PASTE_"))
            .context("missing bot token: set DISCORD_TOKEN or `token` in config.json")
    }
}
