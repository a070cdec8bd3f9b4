//! CLI configuration management.
//!
//! Persists the API base URL to `~/.farmgate/config.json`. The session
//! itself lives in its own file, managed by `farmgate_core::SessionStore`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default backend when neither config nor flags say otherwise.
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Persistent CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CliConfig {
    /// Marketplace API base URL (e.g. "<https://market.example.com>").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
}

impl CliConfig {
    /// Path to the config directory: `~/.farmgate/`.
    pub fn config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".farmgate"))
    }

    /// Path to the config file: `~/.farmgate/config.json`.
    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("config.json"))
    }

    /// Load config from disk. Returns default if file doesn't exist or is invalid.
    pub fn load() -> Self {
        Self::config_path()
            .and_then(|p| std::fs::read_to_string(p).ok())
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default()
    }

    /// Save config to disk.
    pub fn save(&self) -> anyhow::Result<()> {
        let dir =
            Self::config_dir().ok_or_else(|| anyhow::anyhow!("Cannot determine home directory"))?;
        std::fs::create_dir_all(&dir)?;
        let path = dir.join("config.json");
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Effective base URL: CLI flag, then config file, then default.
    pub fn resolve_api_url(&self, flag: Option<&str>) -> String {
        flag.map(str::to_string)
            .or_else(|| self.api_url.clone())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_config_falls_back_to_localhost() {
        let cfg = CliConfig::default();
        assert_eq!(cfg.resolve_api_url(None), DEFAULT_API_URL);
    }

    #[test]
    fn flag_overrides_config_file() {
        let cfg = CliConfig {
            api_url: Some("https://market.example.com".into()),
        };
        assert_eq!(
            cfg.resolve_api_url(Some("http://staging:5000")),
            "http://staging:5000"
        );
        assert_eq!(cfg.resolve_api_url(None), "https://market.example.com");
    }

    #[test]
    fn config_roundtrip_json() {
        let cfg = CliConfig {
            api_url: Some("https://market.example.com".into()),
        };
        let json = serde_json::to_string(&cfg).unwrap();
        let loaded: CliConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.api_url.unwrap(), "https://market.example.com");
    }

    #[test]
    fn unset_api_url_is_omitted_from_json() {
        let json = serde_json::to_string(&CliConfig::default()).unwrap();
        assert!(!json.contains("api_url"));
    }
}
