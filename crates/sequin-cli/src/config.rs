//! Defaults for the command line, read from `config.toml`

use std::path::{Path, PathBuf};

use anyhow::Context;
use sequin_core::RunMode;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize, Default)]
pub struct CliConfig {
    #[serde(default)]
    pub steps: StepsConfig,
    #[serde(default)]
    pub curve: CurveConfig,
    #[serde(default)]
    pub generator: GeneratorConfig,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StepsConfig {
    pub mode: RunMode,
    pub first: usize,
    pub last: usize,
    pub ticks: u32,
    pub seed: u32,
}

impl Default for StepsConfig {
    fn default() -> Self {
        Self {
            mode: RunMode::Forward,
            first: 0,
            last: 15,
            ticks: 32,
            seed: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CurveConfig {
    /// Samples printed per curve
    pub points: usize,
    /// Width of the bar drawn for a level of 1.0
    pub width: usize,
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self { points: 16, width: 32 }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Steps in the generated layer
    pub length: usize,
    /// Seeds parameter randomization (random generator seed on init)
    pub entropy: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self { length: 16, entropy: 0 }
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sequin")
        .join("config.toml")
}

/// Load an explicitly requested config file; errors are reported
pub fn load_from(path: &Path) -> anyhow::Result<CliConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
}

/// Load the default config file, falling back to defaults when missing or invalid
pub fn load_default() -> CliConfig {
    let path = config_path();
    let Ok(text) = std::fs::read_to_string(&path) else {
        return CliConfig::default();
    };
    match toml::from_str(&text) {
        Ok(config) => {
            tracing::debug!("Loaded config from {}", path.display());
            config
        }
        Err(e) => {
            tracing::warn!("Ignoring invalid config {}: {}", path.display(), e);
            CliConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: CliConfig = toml::from_str(
            r#"
            [steps]
            mode = "PingPong"
            last = 7

            [generator]
            entropy = 99
            "#,
        )
        .unwrap();
        assert_eq!(config.steps.mode, RunMode::PingPong);
        assert_eq!(config.steps.last, 7);
        assert_eq!(config.steps.ticks, 32);
        assert_eq!(config.curve, CurveConfig::default());
        assert_eq!(config.generator.entropy, 99);
        assert_eq!(config.generator.length, 16);
    }

    #[test]
    fn test_empty_config_is_default() {
        let config: CliConfig = toml::from_str("").unwrap();
        assert_eq!(config, CliConfig::default());
    }

    #[test]
    fn test_config_roundtrip() {
        let config = CliConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        assert_eq!(toml::from_str::<CliConfig>(&text).unwrap(), config);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(load_from(Path::new("/nonexistent/sequin.toml")).is_err());
    }
}
