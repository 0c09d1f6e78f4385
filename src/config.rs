use std::env;
use std::path::PathBuf;

use thiserror::Error;

const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
const DEFAULT_SESSION_CAPACITY: usize = 1000;
const DEFAULT_SESSION_TTL_SECONDS: u64 = 60 * 60;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("OPENAI_API_KEY is not set. Add it to the environment or a .env file before starting.")]
    MissingCredential,
    #[error("{name} must not be empty")]
    EmptyValue { name: &'static str },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub completion_model: String,
    pub image_model: String,
    pub openai_timeout_seconds: u64,
    pub log_level: String,
    pub bind_address: String,
    pub egen_example_path: PathBuf,
    pub teto_example_path: PathBuf,
    pub max_upload_bytes: usize,
    pub session_capacity: usize,
    pub session_ttl_seconds: u64,
}

struct EnvSource<F> {
    lookup: F,
}

impl<F> EnvSource<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn string(&self, name: &str, default: &str) -> String {
        (self.lookup)(name).unwrap_or_else(|| default.to_string())
    }

    fn non_empty(&self, name: &'static str, default: &str) -> Result<String, ConfigError> {
        let value = self.string(name, default).trim().to_string();
        if value.is_empty() {
            return Err(ConfigError::EmptyValue { name });
        }
        Ok(value)
    }

    fn u64(&self, name: &str, default: u64) -> u64 {
        (self.lookup)(name)
            .and_then(|value| value.trim().parse::<u64>().ok())
            .unwrap_or(default)
    }

    fn usize(&self, name: &str, default: usize) -> usize {
        (self.lookup)(name)
            .and_then(|value| value.trim().parse::<usize>().ok())
            .unwrap_or(default)
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let source = EnvSource { lookup };

        let openai_api_key = source.string("OPENAI_API_KEY", "").trim().to_string();
        if openai_api_key.is_empty() {
            return Err(ConfigError::MissingCredential);
        }

        Ok(Config {
            openai_api_key,
            openai_base_url: source.non_empty("OPENAI_BASE_URL", "https://api.openai.com/v1")?,
            completion_model: source.non_empty("OPENAI_COMPLETION_MODEL", "gpt-4o")?,
            image_model: source.non_empty("OPENAI_IMAGE_MODEL", "dall-e-3")?,
            openai_timeout_seconds: source.u64("OPENAI_TIMEOUT_SECONDS", 120).max(1),
            log_level: source.string("LOG_LEVEL", "info").to_lowercase(),
            bind_address: source.non_empty("BIND_ADDRESS", "127.0.0.1:8501")?,
            egen_example_path: PathBuf::from(source.string("EGEN_EXAMPLE_PATH", "egen_example.png")),
            teto_example_path: PathBuf::from(source.string("TETO_EXAMPLE_PATH", "teto_example.png")),
            max_upload_bytes: source
                .usize("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)
                .max(1),
            session_capacity: source
                .usize("SESSION_CAPACITY", DEFAULT_SESSION_CAPACITY)
                .max(1),
            session_ttl_seconds: source
                .u64("SESSION_TTL_SECONDS", DEFAULT_SESSION_TTL_SECONDS)
                .max(1),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let values: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| values.get(name).cloned())
    }

    #[test]
    fn missing_or_blank_key_is_fatal() {
        assert_eq!(config_from(&[]).unwrap_err(), ConfigError::MissingCredential);
        assert_eq!(
            config_from(&[("OPENAI_API_KEY", "   ")]).unwrap_err(),
            ConfigError::MissingCredential
        );
    }

    #[test]
    fn applies_defaults() {
        let config = config_from(&[("OPENAI_API_KEY", " sk-test ")]).unwrap();
        assert_eq!(config.openai_api_key, "sk-test");
        assert_eq!(config.completion_model, "gpt-4o");
        assert_eq!(config.image_model, "dall-e-3");
        assert_eq!(config.egen_example_path, PathBuf::from("egen_example.png"));
        assert_eq!(config.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.session_capacity, DEFAULT_SESSION_CAPACITY);
        assert_eq!(config.session_ttl_seconds, DEFAULT_SESSION_TTL_SECONDS);
    }

    #[test]
    fn reads_overrides_and_ignores_bad_numbers() {
        let config = config_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_COMPLETION_MODEL", "gpt-4o-mini"),
            ("OPENAI_TIMEOUT_SECONDS", "soon"),
            ("LOG_LEVEL", "DEBUG"),
            ("MAX_UPLOAD_BYTES", "2048"),
            ("SESSION_CAPACITY", "50"),
            ("SESSION_TTL_SECONDS", "0"),
        ])
        .unwrap();
        assert_eq!(config.completion_model, "gpt-4o-mini");
        assert_eq!(config.openai_timeout_seconds, 120);
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.max_upload_bytes, 2048);
        assert_eq!(config.session_capacity, 50);
        assert_eq!(config.session_ttl_seconds, 1);
    }

    #[test]
    fn rejects_blank_model_override() {
        let err = config_from(&[("OPENAI_API_KEY", "sk"), ("OPENAI_IMAGE_MODEL", " ")]).unwrap_err();
        assert_eq!(err, ConfigError::EmptyValue { name: "OPENAI_IMAGE_MODEL" });
    }
}
