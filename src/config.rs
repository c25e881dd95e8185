//! Process configuration loaded from the environment.
//!
//! `main` loads `.env` with `dotenv` first, so every key below may also come
//! from that file.

use std::net::SocketAddr;

use thiserror::Error;

use crate::agents::types::{ExecutionMode, Role};

pub const DEFAULT_LLM_BASE_URL: &str = "http://localhost:11434/v1";
pub const DEFAULT_LAST_RESULT_CAPACITY: usize = 10_000;
pub const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:3000";

/// Startup configuration errors; all of them are fatal
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{key} has invalid value {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Model identifier per board role
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelConfig {
    pub strategist: String,
    pub financier: String,
    pub auditor: String,
    pub analyst: String,
    pub moderator: String,
}

impl ModelConfig {
    pub fn model_for(&self, role: Role) -> &str {
        match role {
            Role::Strategist => &self.strategist,
            Role::Financier => &self.financier,
            Role::Auditor => &self.auditor,
            Role::Analyst => &self.analyst,
            Role::Moderator => &self.moderator,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            strategist: "llama3:8b".to_string(),
            financier: "gemma2:9b".to_string(),
            auditor: "mistral:7b".to_string(),
            analyst: "qwen2.5:7b".to_string(),
            moderator: "llama3.1:8b".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub telegram_bot_token: String,
    pub database_url: String,
    pub llm_base_url: String,
    pub llm_api_token: Option<String>,
    pub models: ModelConfig,
    pub execution_mode: ExecutionMode,
    pub last_result_capacity: usize,
    pub http_addr: SocketAddr,
}

impl Config {
    /// Read configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, which returns the raw value of a
    /// key or `None` when it is unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let telegram_bot_token = required("TELEGRAM_BOT_TOKEN")?;
        let database_url = required("DB_URL")
            .or_else(|_| required("DATABASE_URL"))
            .map_err(|_| ConfigError::Missing("DB_URL"))?;

        let defaults = ModelConfig::default();
        let model = |key: &str, default: String| lookup(key).unwrap_or(default);
        let models = ModelConfig {
            strategist: model("MODEL_STRATEGIST", defaults.strategist),
            financier: model("MODEL_FINANCIER", defaults.financier),
            auditor: model("MODEL_AUDITOR", defaults.auditor),
            analyst: model("MODEL_ANALYST", defaults.analyst),
            moderator: model("MODEL_MODERATOR", defaults.moderator),
        };

        let execution_mode = match lookup("ORCHESTRATOR_PARALLEL") {
            None => ExecutionMode::Sequential,
            Some(raw) => match raw.to_ascii_lowercase().as_str() {
                "" | "0" | "false" | "no" => ExecutionMode::Sequential,
                "1" | "true" | "yes" => ExecutionMode::Parallel,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "ORCHESTRATOR_PARALLEL",
                        value: raw,
                    })
                }
            },
        };

        let last_result_capacity = match lookup("LAST_RESULT_CAPACITY") {
            None => DEFAULT_LAST_RESULT_CAPACITY,
            Some(raw) => raw
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ConfigError::Invalid {
                    key: "LAST_RESULT_CAPACITY",
                    value: raw,
                })?,
        };

        let http_raw = lookup("HTTP_ADDR").unwrap_or_else(|| DEFAULT_HTTP_ADDR.to_string());
        let http_addr = http_raw.parse().map_err(|_| ConfigError::Invalid {
            key: "HTTP_ADDR",
            value: http_raw.clone(),
        })?;

        Ok(Self {
            telegram_bot_token,
            database_url,
            llm_base_url: lookup("OLLAMA_BASE_URL")
                .unwrap_or_else(|| DEFAULT_LLM_BASE_URL.to_string()),
            llm_api_token: lookup("OLLAMA_API_TOKEN").filter(|t| !t.is_empty()),
            models,
            execution_mode,
            last_result_capacity,
            http_addr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    const REQUIRED: [(&str, &str); 2] = [
        ("TELEGRAM_BOT_TOKEN", "123:abc"),
        ("DB_URL", "postgres://localhost/board"),
    ];

    #[test]
    fn defaults_apply_when_only_required_values_are_set() {
        let config = load(&REQUIRED).unwrap();

        assert_eq!(config.telegram_bot_token, "123:abc");
        assert_eq!(config.database_url, "postgres://localhost/board");
        assert_eq!(config.llm_base_url, DEFAULT_LLM_BASE_URL);
        assert_eq!(config.llm_api_token, None);
        assert_eq!(config.models, ModelConfig::default());
        assert_eq!(config.execution_mode, ExecutionMode::Sequential);
        assert_eq!(config.last_result_capacity, DEFAULT_LAST_RESULT_CAPACITY);
        assert_eq!(config.http_addr.port(), 3000);
    }

    #[test]
    fn missing_bot_token_is_fatal() {
        let err = load(&[("DB_URL", "postgres://x")]).unwrap_err();
        assert_eq!(err, ConfigError::Missing("TELEGRAM_BOT_TOKEN"));
    }

    #[test]
    fn missing_database_url_is_fatal() {
        let err = load(&[("TELEGRAM_BOT_TOKEN", "t"), ("DB_URL", "")]).unwrap_err();
        assert_eq!(err, ConfigError::Missing("DB_URL"));
    }

    #[test]
    fn database_url_falls_back_to_standard_key() {
        let config = load(&[
            ("TELEGRAM_BOT_TOKEN", "t"),
            ("DATABASE_URL", "postgres://fallback"),
        ])
        .unwrap();
        assert_eq!(config.database_url, "postgres://fallback");
    }

    #[test]
    fn optional_values_override_defaults() {
        let mut pairs = REQUIRED.to_vec();
        pairs.extend([
            ("OLLAMA_BASE_URL", "http://llm:8080/v1"),
            ("OLLAMA_API_TOKEN", "secret"),
            ("MODEL_MODERATOR", "llama3.1:70b"),
            ("ORCHESTRATOR_PARALLEL", "true"),
            ("LAST_RESULT_CAPACITY", "50"),
            ("HTTP_ADDR", "127.0.0.1:8081"),
        ]);

        let config = load(&pairs).unwrap();

        assert_eq!(config.llm_base_url, "http://llm:8080/v1");
        assert_eq!(config.llm_api_token.as_deref(), Some("secret"));
        assert_eq!(config.models.model_for(Role::Moderator), "llama3.1:70b");
        assert_eq!(config.models.model_for(Role::Strategist), "llama3:8b");
        assert_eq!(config.execution_mode, ExecutionMode::Parallel);
        assert_eq!(config.last_result_capacity, 50);
        assert_eq!(config.http_addr.to_string(), "127.0.0.1:8081");
    }

    #[test]
    fn invalid_optional_values_are_rejected() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("LAST_RESULT_CAPACITY", "0"));
        assert!(matches!(
            load(&pairs),
            Err(ConfigError::Invalid { key: "LAST_RESULT_CAPACITY", .. })
        ));

        let mut pairs = REQUIRED.to_vec();
        pairs.push(("ORCHESTRATOR_PARALLEL", "sometimes"));
        assert!(matches!(
            load(&pairs),
            Err(ConfigError::Invalid { key: "ORCHESTRATOR_PARALLEL", .. })
        ));
    }
}
