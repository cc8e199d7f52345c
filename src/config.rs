//! Environment-driven configuration for the CLI shell.

use std::path::PathBuf;

use crate::engine::{EngineOptions, FlavorMode};
use crate::store::DEFAULT_STORE_PATH;

pub const DEFAULT_MODEL: &str = "openai/gpt-4o-mini";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} is not a valid {expected}: {value:?}")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub model: String,
    pub store_path: PathBuf,
    pub export_url: Option<String>,
    pub rng_seed: Option<u64>,
    pub flavor: FlavorMode,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            export_url: None,
            rng_seed: None,
            flavor: FlavorMode::Stable,
        }
    }
}

impl AppConfig {
    /// Read `IDEAFORGE_*` variables. Gateway variables are read by the gateway itself.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`] with an explicit variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(model) = get("IDEAFORGE_MODEL") {
            config.model = model.trim().to_string();
        }
        if let Some(path) = get("IDEAFORGE_STORE") {
            config.store_path = PathBuf::from(path);
        }
        config.export_url = get("IDEAFORGE_EXPORT_URL").map(|u| u.trim().to_string());

        if let Some(raw) = get("IDEAFORGE_RNG_SEED") {
            let seed = raw.trim().parse::<u64>().map_err(|_| ConfigError::Invalid {
                var: "IDEAFORGE_RNG_SEED",
                expected: "u64",
                value: raw.clone(),
            })?;
            config.rng_seed = Some(seed);
        }
        if let Some(raw) = get("IDEAFORGE_FLAVOR") {
            config.flavor = raw.parse().map_err(|_| ConfigError::Invalid {
                var: "IDEAFORGE_FLAVOR",
                expected: "flavor mode (stable|churn)",
                value: raw.clone(),
            })?;
        }

        Ok(config)
    }

    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            rng_seed: self.rng_seed,
            flavor: self.flavor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(AppConfig::from_lookup(lookup(&[])).unwrap(), AppConfig::default());
    }

    #[test]
    fn reads_all_variables() {
        let config = AppConfig::from_lookup(lookup(&[
            ("IDEAFORGE_MODEL", "anthropic/claude-3.5-haiku"),
            ("IDEAFORGE_STORE", "/tmp/ideas.sqlite"),
            ("IDEAFORGE_EXPORT_URL", "https://sheets.example.com/hook"),
            ("IDEAFORGE_RNG_SEED", "42"),
            ("IDEAFORGE_FLAVOR", "churn"),
        ]))
        .unwrap();
        assert_eq!(config.model, "anthropic/claude-3.5-haiku");
        assert_eq!(config.store_path, PathBuf::from("/tmp/ideas.sqlite"));
        assert_eq!(config.export_url.as_deref(), Some("https://sheets.example.com/hook"));
        assert_eq!(config.engine_options().rng_seed, Some(42));
        assert_eq!(config.flavor, FlavorMode::Churn);
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = AppConfig::from_lookup(lookup(&[("IDEAFORGE_EXPORT_URL", "  ")])).unwrap();
        assert_eq!(config.export_url, None);
    }

    #[test]
    fn invalid_values_are_errors() {
        let err = AppConfig::from_lookup(lookup(&[("IDEAFORGE_RNG_SEED", "-1")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "IDEAFORGE_RNG_SEED", .. }));
        let err = AppConfig::from_lookup(lookup(&[("IDEAFORGE_FLAVOR", "wild")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "IDEAFORGE_FLAVOR", .. }));
    }
}
