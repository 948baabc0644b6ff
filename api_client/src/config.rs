//! Client configuration.
//!
//! Resolution order: environment variables, then `config.json` in the
//! platform config directory, then built-in defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use reqwest::Url;
use serde::Deserialize;

use crate::error::ConfigError;

pub const ENV_API_URL: &str = "ADMIN_API_URL";
pub const ENV_ENVIRONMENT: &str = "ADMIN_CONSOLE_ENV";
pub const ENV_TIMEOUT: &str = "ADMIN_API_TIMEOUT_SECS";

const DEFAULT_API_URL: &str = "http://localhost:8000/";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// On-disk form; every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    pub api_url: Option<String>,
    pub production: Option<bool>,
    pub timeout_secs: Option<u64>,
    pub session_file: Option<PathBuf>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub base_url: Url,
    /// Production builds mark session cookies `Secure`.
    pub production: bool,
    pub timeout: Duration,
    /// Where the session jar is kept; `None` keeps it in memory.
    pub session_file: Option<PathBuf>,
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "Admin", "AdminConsole")
}

pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|p| p.config_dir().join("config.json"))
}

fn default_session_path() -> Option<PathBuf> {
    project_dirs().map(|p| p.config_dir().join("session.json"))
}

fn parse_url(raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|source| ConfigError::InvalidUrl {
        url: raw.to_string(),
        source,
    })
}

fn parse_production(raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "production" | "prod" => Ok(true),
        "development" | "dev" | "test" | "staging" | "" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            name: ENV_ENVIRONMENT,
            value: raw.to_string(),
        }),
    }
}

impl ClientConfig {
    /// Loads the default config file and applies the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let file = match default_config_path() {
            Some(path) => ConfigFile::load(&path)?,
            None => ConfigFile::default(),
        };
        Self::resolve(file, |name| std::env::var(name).ok())
    }

    /// Merges a config file with environment lookups, environment first.
    pub fn resolve(
        file: ConfigFile,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let url = env(ENV_API_URL)
            .or(file.api_url)
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let production = match env(ENV_ENVIRONMENT) {
            Some(raw) => parse_production(&raw)?,
            None => file.production.unwrap_or(false),
        };
        let timeout_secs: u64 = match env(ENV_TIMEOUT) {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                name: ENV_TIMEOUT,
                value: raw.clone(),
            })?,
            None => file.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
        };
        Ok(Self {
            base_url: parse_url(&url)?,
            production,
            timeout: Duration::from_secs(timeout_secs),
            session_file: file.session_file.or_else(default_session_path),
        })
    }

    pub fn with_base_url(mut self, raw: &str) -> Result<Self, ConfigError> {
        self.base_url = parse_url(raw)?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let cfg = ClientConfig::resolve(ConfigFile::default(), env_of(&[])).unwrap();
        assert_eq!(cfg.base_url.as_str(), DEFAULT_API_URL);
        assert!(!cfg.production);
        assert_eq!(cfg.timeout, Duration::from_secs(30));
    }

    #[test]
    fn environment_beats_the_file() {
        let file = ConfigFile {
            api_url: Some("https://file.example.com/".into()),
            production: Some(false),
            timeout_secs: Some(5),
            session_file: Some(PathBuf::from("/tmp/s.json")),
        };
        let cfg = ClientConfig::resolve(
            file,
            env_of(&[(ENV_API_URL, "https://env.example.com/api/"), (ENV_ENVIRONMENT, "production")]),
        )
        .unwrap();
        assert_eq!(cfg.base_url.as_str(), "https://env.example.com/api/");
        assert!(cfg.production);
        assert_eq!(cfg.timeout, Duration::from_secs(5));
        assert_eq!(cfg.session_file, Some(PathBuf::from("/tmp/s.json")));
    }

    #[rstest]
    #[case(ENV_API_URL, "not a url")]
    #[case(ENV_ENVIRONMENT, "sometimes")]
    #[case(ENV_TIMEOUT, "ten")]
    fn bad_values_are_reported(#[case] name: &str, #[case] value: &str) {
        assert!(ClientConfig::resolve(ConfigFile::default(), env_of(&[(name, value)])).is_err());
    }

    #[test]
    fn config_file_is_read_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        assert!(ConfigFile::load(&path).unwrap().api_url.is_none());
        fs::write(&path, r#"{"api_url": "https://admin.example.com/"}"#).unwrap();
        let loaded = ConfigFile::load(&path).unwrap();
        assert_eq!(loaded.api_url.as_deref(), Some("https://admin.example.com/"));
        assert!(loaded.production.is_none());
    }
}
