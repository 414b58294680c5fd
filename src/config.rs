use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::llm::CompletionOptions;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub api_base: String,
    pub model: String,
    pub api_key_env: String,
    pub timeout_ms: u64,
    pub temperature: f32,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_ms: 60_000,
            temperature: 0.2,
        }
    }
}

impl BackendConfig {
    pub fn completion_options(&self) -> CompletionOptions {
        CompletionOptions {
            temperature: self.temperature,
            timeout: Duration::from_millis(self.timeout_ms),
            cancel: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub use_segmenter: bool,
    pub use_language_detector: bool,
    pub use_embeddings: bool,
    pub use_readability: bool,
    pub cluster_k: usize,
    pub cluster_sample_cap: usize,
    pub example_pool_cap: usize,
    pub max_examples: usize,
    pub fallback_examples: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            use_segmenter: true,
            use_language_detector: true,
            use_embeddings: true,
            use_readability: true,
            cluster_k: 3,
            cluster_sample_cap: 200,
            example_pool_cap: 500,
            max_examples: 8,
            fallback_examples: 4,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToneConfig {
    pub backend: BackendConfig,
    pub analysis: AnalysisConfig,
}

impl ToneConfig {
    pub fn load(path: Option<PathBuf>) -> Result<(Self, Option<PathBuf>), String> {
        let config_path = path.or_else(default_config_path);
        let mut config = if let Some(path) = config_path.as_ref() {
            if path.exists() {
                let contents = std::fs::read_to_string(path)
                    .map_err(|err| format!("failed to read config: {}", err))?;
                toml::from_str(&contents)
                    .map_err(|err| format!("failed to parse config: {}", err))?
            } else {
                ToneConfig::default()
            }
        } else {
            ToneConfig::default()
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
        std::fs::write(path, payload).map_err(|err| format!("failed to write config: {}", err))?;
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(api_base) = env::var("TOV_API_BASE") {
            if !api_base.trim().is_empty() {
                self.backend.api_base = api_base;
            }
        }
        if let Ok(model) = env::var("TOV_MODEL") {
            if !model.trim().is_empty() {
                self.backend.model = model;
            }
        }
        if let Ok(timeout) = env::var("TOV_TIMEOUT_MS") {
            if let Ok(value) = timeout.parse::<u64>() {
                self.backend.timeout_ms = value;
            }
        }
        apply_switch("TOV_USE_SEGMENTER", &mut self.analysis.use_segmenter);
        apply_switch("TOV_USE_LANGDETECT", &mut self.analysis.use_language_detector);
        apply_switch("TOV_USE_EMBEDDINGS", &mut self.analysis.use_embeddings);
        apply_switch("TOV_USE_READABILITY", &mut self.analysis.use_readability);
    }
}

fn apply_switch(key: &str, flag: &mut bool) {
    if let Ok(value) = env::var(key) {
        match value.trim() {
            "0" | "false" | "off" => *flag = false,
            "1" | "true" | "on" => *flag = true,
            _ => {}
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    env::var("TOV_CONFIG_PATH")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .or_else(|| Some(PathBuf::from("config/tov.toml")))
}
