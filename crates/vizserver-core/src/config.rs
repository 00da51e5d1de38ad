use anyhow::Context;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::request_options::DEFAULT_PAGE_SIZE;

pub const DEFAULT_API_VERSION: &str = "3.19";
pub const SECRET_ENV: &str = "VIZSERVER_SECRET";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("server_url is not set")]
    MissingServerUrl,
    #[error("server_url must start with http:// or https://: {0}")]
    InvalidServerUrl(String),
    #[error("page_size must be greater than zero")]
    ZeroPageSize,
    #[error("http.max_attempts must be greater than zero")]
    ZeroMaxAttempts,
    #[error("http.timeout_secs must be greater than zero")]
    ZeroTimeout,
    #[error("auth identity is not configured")]
    MissingAuth,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AuthConfig {
    PersonalAccessToken { name: String },
    Password { username: String },
}

impl AuthConfig {
    pub fn identity(&self) -> &str {
        match self {
            AuthConfig::PersonalAccessToken { name } => name,
            AuthConfig::Password { username } => username,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpSettings {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub server_url: String,
    #[serde(default)]
    pub site: String,
    #[serde(default)]
    pub api_version: Option<String>,
    #[serde(default)]
    pub auth: Option<AuthConfig>,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default)]
    pub http: HttpSettings,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: String::new(),
            site: String::new(),
            api_version: None,
            auth: None,
            page_size: default_page_size(),
            http: HttpSettings::default(),
        }
    }
}

impl ClientConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(path).context("read config")?;
        let config = serde_json::from_str(&data).context("parse config")?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("create config directory")?;
        }
        let data = serde_json::to_string_pretty(self).context("serialize config")?;
        fs::write(path, data).context("write config")?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.server_url.trim();
        if url.is_empty() {
            return Err(ConfigError::MissingServerUrl);
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ConfigError::InvalidServerUrl(url.to_string()));
        }
        if self.page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        if self.http.max_attempts == 0 {
            return Err(ConfigError::ZeroMaxAttempts);
        }
        if self.http.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    pub fn server_url(&self) -> &str {
        self.server_url.trim().trim_end_matches('/')
    }

    pub fn api_version(&self) -> &str {
        self.api_version.as_deref().unwrap_or(DEFAULT_API_VERSION)
    }

    /// Keyring account that holds the secret for the configured identity.
    pub fn secret_account(&self) -> Result<String, ConfigError> {
        let auth = self.auth.as_ref().ok_or(ConfigError::MissingAuth)?;
        Ok(format!(
            "{}:{}:{}",
            self.server_url(),
            self.site,
            auth.identity()
        ))
    }
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    let project = ProjectDirs::from("com", "vizserver-client", "vizserver-client")
        .context("resolve project dirs")?;
    Ok(project.config_dir().join("config.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ClientConfig {
        ClientConfig {
            server_url: "https://bi.example.com/".to_string(),
            site: "marketing".to_string(),
            api_version: None,
            auth: Some(AuthConfig::PersonalAccessToken {
                name: "ci-token".to_string(),
            }),
            ..ClientConfig::default()
        }
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig::load(&dir.path().join("missing.json")).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.page_size, 100);
        assert_eq!(config.http.max_attempts, 3);
    }

    #[test]
    fn save_then_load_preserves_auth() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = sample();
        config.save(&path).unwrap();
        let loaded = ClientConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"kind\": \"personal_access_token\""));
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"server_url":"https://bi.example.com","http":{}}"#).unwrap();
        let loaded = ClientConfig::load(&path).unwrap();
        assert_eq!(loaded.page_size, 100);
        assert_eq!(loaded.http.timeout_secs, 60);
        assert_eq!(loaded.api_version(), DEFAULT_API_VERSION);
    }

    #[test]
    fn validate_rejects_bad_values() {
        assert_eq!(
            ClientConfig::default().validate(),
            Err(ConfigError::MissingServerUrl)
        );
        let mut config = sample();
        config.server_url = "bi.example.com".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidServerUrl(_))
        ));
        let mut config = sample();
        config.page_size = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroPageSize));
        let mut config = sample();
        config.http.max_attempts = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroMaxAttempts));
        let mut config = sample();
        config.http.timeout_secs = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroTimeout));
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn secret_account_uses_trimmed_url() {
        let account = sample().secret_account().unwrap();
        assert_eq!(account, "https://bi.example.com:marketing:ci-token");
        let mut config = sample();
        config.auth = None;
        assert_eq!(config.secret_account(), Err(ConfigError::MissingAuth));
    }
}
