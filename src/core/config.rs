use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AwsSettings {
    /// Region for the Cost Explorer endpoint; empty means ambient resolution
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub access_key_id: String,
    #[serde(default)]
    pub secret_access_key: String,
}

impl AwsSettings {
    /// The static credential pair, when both halves are present. A lone half
    /// is a config issue caught by `validate`.
    pub fn static_credentials(&self) -> Option<(&str, &str)> {
        if self.access_key_id.is_empty() || self.secret_access_key.is_empty() {
            None
        } else {
            Some((&self.access_key_id, &self.secret_access_key))
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlackSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub webhook_url: String,
    /// Delivery timeout as a duration string; unparsable values fall back
    /// to 10s at send time
    #[serde(default = "default_timeout")]
    pub timeout: String,
}

fn default_true() -> bool {
    true
}
fn default_timeout() -> String {
    "10s".to_string()
}

impl Default for SlackSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            webhook_url: String::new(),
            timeout: default_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub debug: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub aws: AwsSettings,
    #[serde(default)]
    pub slack: SlackSettings,
    #[serde(default)]
    pub settings: Settings,
}

impl AppConfig {
    /// Get the config file path, respecting XDG_CONFIG_HOME
    pub fn config_path() -> PathBuf {
        let config_dir = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("~"))
                    .join(".config")
            });
        config_dir.join("costwatch").join("config.toml")
    }

    /// Load config, then apply environment overrides. Without an explicit
    /// path, a missing file falls back to defaults; an explicit `--config`
    /// path must exist.
    pub fn load(path_override: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path_override {
            Some(path) => {
                let content = std::fs::read_to_string(path)?;
                toml::from_str::<AppConfig>(&content)?
            }
            None => {
                let path = Self::config_path();
                if path.exists() {
                    let content = std::fs::read_to_string(&path)?;
                    toml::from_str::<AppConfig>(&content)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Serialize and write this config to the config file path.
    pub fn save(&self) -> Result<PathBuf, std::io::Error> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).expect("Failed to serialize config");
        std::fs::write(&path, content)?;
        Ok(path)
    }

    /// Environment overrides win over file values, for cron environments
    /// where secrets are injected rather than written to disk.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("COSTWATCH_AWS_REGION") {
            self.aws.region = v;
        }
        if let Ok(v) = std::env::var("COSTWATCH_AWS_ACCESS_KEY_ID") {
            self.aws.access_key_id = v;
        }
        if let Ok(v) = std::env::var("COSTWATCH_AWS_SECRET_ACCESS_KEY") {
            self.aws.secret_access_key = v;
        }
        if let Ok(v) = std::env::var("COSTWATCH_SLACK_WEBHOOK_URL") {
            self.slack.webhook_url = v;
        }
        if let Ok(v) = std::env::var("COSTWATCH_DEBUG") {
            self.settings.debug = matches!(v.as_str(), "1" | "true" | "yes");
        }
    }

    /// Validate the config
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if self.slack.enabled {
            if let Err(e) = crate::core::notify::validate_webhook_url(&self.slack.webhook_url) {
                issues.push(format!("slack.webhook_url: {e}"));
            }
        }
        if !self.slack.timeout.is_empty()
            && humantime::parse_duration(self.slack.timeout.trim()).is_err()
        {
            issues.push(format!(
                "slack.timeout: '{}' is not a duration (delivery will fall back to 10s)",
                self.slack.timeout
            ));
        }
        let has_key_id = !self.aws.access_key_id.is_empty();
        let has_secret = !self.aws.secret_access_key.is_empty();
        if has_key_id != has_secret {
            issues.push(
                "aws: access_key_id and secret_access_key must be set together".to_string(),
            );
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_one_validation_issue() {
        // Notifications default to enabled with no webhook configured yet
        let config = AppConfig::default();
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("webhook_url"));
    }

    #[test]
    fn default_config_is_valid_once_webhook_is_set() {
        let mut config = AppConfig::default();
        config.slack.webhook_url = "https://hooks.slack.com/services/T/B/X".to_string();
        assert!(config.validate().is_empty());
    }

    #[test]
    fn disabled_slack_needs_no_webhook() {
        let mut config = AppConfig::default();
        config.slack.enabled = false;
        assert!(config.validate().is_empty());
    }

    #[test]
    fn validate_catches_http_webhook() {
        let mut config = AppConfig::default();
        config.slack.webhook_url = "http://hooks.slack.com/services/T/B/X".to_string();
        let issues = config.validate();
        assert!(issues.iter().any(|i| i.contains("HTTPS")));
    }

    #[test]
    fn validate_catches_bad_timeout() {
        let mut config = AppConfig::default();
        config.slack.enabled = false;
        config.slack.timeout = "soon".to_string();
        let issues = config.validate();
        assert!(issues.iter().any(|i| i.contains("timeout")));
    }

    #[test]
    fn validate_catches_half_credential_pair() {
        let mut config = AppConfig::default();
        config.slack.enabled = false;
        config.aws.access_key_id = "AKIAEXAMPLE".to_string();
        let issues = config.validate();
        assert!(issues.iter().any(|i| i.contains("set together")));
    }

    #[test]
    fn static_credentials_require_both_halves() {
        let mut aws = AwsSettings::default();
        assert!(aws.static_credentials().is_none());
        aws.access_key_id = "AKIAEXAMPLE".to_string();
        assert!(aws.static_credentials().is_none());
        aws.secret_access_key = "secret".to_string();
        assert_eq!(aws.static_credentials(), Some(("AKIAEXAMPLE", "secret")));
    }

    #[test]
    fn parse_minimal_toml() {
        let toml = r#"
[slack]
enabled = true
webhook_url = "https://hooks.slack.com/services/T/B/X"
timeout = "5s"
"#;
        let config: AppConfig = toml::from_str(toml).unwrap();
        assert!(config.slack.enabled);
        assert_eq!(config.slack.timeout, "5s");
        assert!(config.aws.region.is_empty());
        assert!(!config.settings.debug);
    }

    #[test]
    fn parse_empty_toml_gives_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert!(config.slack.enabled);
        assert_eq!(config.slack.timeout, "10s");
        assert!(config.slack.webhook_url.is_empty());
    }

    #[test]
    fn parse_aws_section() {
        let toml = r#"
[aws]
region = "ap-northeast-1"
access_key_id = "AKIAEXAMPLE"
secret_access_key = "secret"
"#;
        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.aws.region, "ap-northeast-1");
        assert!(config.aws.static_credentials().is_some());
    }

    #[test]
    fn env_overrides_replace_file_values() {
        std::env::set_var("COSTWATCH_AWS_REGION", "eu-west-1");
        std::env::set_var("COSTWATCH_DEBUG", "true");
        let mut config = AppConfig::default();
        config.aws.region = "us-east-1".to_string();
        config.apply_env_overrides();
        std::env::remove_var("COSTWATCH_AWS_REGION");
        std::env::remove_var("COSTWATCH_DEBUG");
        assert_eq!(config.aws.region, "eu-west-1");
        assert!(config.settings.debug);
    }

    #[test]
    fn config_path_uses_xdg_when_set() {
        std::env::set_var("XDG_CONFIG_HOME", "/tmp/test_xdg_config");
        let path = AppConfig::config_path();
        std::env::remove_var("XDG_CONFIG_HOME");
        assert_eq!(
            path,
            PathBuf::from("/tmp/test_xdg_config/costwatch/config.toml")
        );
    }
}
