use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkConfig {
    pub ctr: f64,
    pub conversion_rate: f64,
    pub cost_per_conversion: f64,
    pub cpm: f64,
    pub cpc: f64,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            ctr: 2.0,
            conversion_rate: 3.0,
            cost_per_conversion: 50.0,
            cpm: 10.0,
            cpc: 1.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleThresholds {
    pub low_ctr: f64,
    pub high_ctr: f64,
    pub max_cost_per_conversion: f64,
    pub max_frequency: f64,
}

impl Default for RuleThresholds {
    fn default() -> Self {
        Self {
            low_ctr: 0.8,
            high_ctr: 2.5,
            max_cost_per_conversion: 50.0,
            max_frequency: 3.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaApiSettings {
    pub api_base: String,
    pub timeout_ms: u64,
}

impl Default for MetaApiSettings {
    fn default() -> Self {
        Self {
            api_base: "https://graph.facebook.com/v19.0".to_string(),
            timeout_ms: 30_000,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    pub benchmarks: BenchmarkConfig,
    pub rules: RuleThresholds,
    pub meta: MetaApiSettings,
}

impl AnalyzerConfig {
    pub fn load(path: Option<PathBuf>) -> Result<(Self, Option<PathBuf>), String> {
        let config_path = path.or_else(default_config_path);
        let mut config = if let Some(path) = config_path.as_ref() {
            if path.exists() {
                let contents = std::fs::read_to_string(path)
                    .map_err(|err| format!("failed to read config: {}", err))?;
                toml::from_str(&contents)
                    .map_err(|err| format!("failed to parse config: {}", err))?
            } else {
                AnalyzerConfig::default()
            }
        } else {
            AnalyzerConfig::default()
        };

        config.apply_env_overrides();
        Ok((config, config_path))
    }

    pub fn write(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|err| format!("failed to create config dir: {}", err))?;
        }
        let payload = toml::to_string_pretty(self)
            .map_err(|err| format!("failed to serialize config: {}", err))?;
        std::fs::write(path, payload)
            .map_err(|err| format!("failed to write config: {}", err))?;
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(api_base) = env::var("META_API_BASE") {
            if !api_base.trim().is_empty() {
                self.meta.api_base = api_base;
            }
        }
        if let Ok(timeout) = env::var("META_TIMEOUT_MS") {
            if let Ok(value) = timeout.parse::<u64>() {
                self.meta.timeout_ms = value;
            }
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    env::var("ADS_ANALYZER_CONFIG")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .or_else(|| Some(PathBuf::from("config/analyzer.toml")))
}
