use super::Config;
use crate::error::ConfigError;
use anyhow::{Context, Result};
use directories::UserDirs;
use std::fs;
use std::path::Path;

const CONFIG_DIR: &str = ".arthur-console";
const CONFIG_FILE: &str = "config.toml";
const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

impl Config {
    pub fn load_or_init() -> Result<Self> {
        let home = UserDirs::new()
            .map(|u| u.home_dir().to_path_buf())
            .context("Could not find home directory")?;
        let console_dir = home.join(CONFIG_DIR);

        if !console_dir.exists() {
            fs::create_dir_all(&console_dir)
                .context("Failed to create .arthur-console directory")?;
        }

        Self::load_or_init_at(&console_dir.join(CONFIG_FILE))
    }

    /// Load `path`, or write a default config there if it does not exist.
    /// `ARTHUR_*` environment values are layered on top of the file and are
    /// never written back by this call.
    pub fn load_or_init_at(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let contents = fs::read_to_string(path).context("Failed to read config file")?;
            let mut config: Config =
                toml::from_str(&contents).context("Failed to parse config file")?;
            config.config_path = path.to_path_buf();
            config
        } else {
            let config = Self {
                config_path: path.to_path_buf(),
                ..Self::default()
            };
            config.save()?;
            config
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let toml_str = toml::to_string_pretty(self).context("Failed to serialize config")?;
        if let Some(parent) = self.config_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        fs::write(&self.config_path, toml_str).context("Failed to write config file")?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(base_url) = self.base_url.as_deref() {
            validate_base_url(base_url)?;
        }
        if !LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(ConfigError::Validation(format!(
                "log_level must be one of {}, got {}",
                LOG_LEVELS.join(", "),
                self.log_level
            )));
        }
        if self.http.request_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "http.request_timeout_secs must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// The configured base URL, or a [`ConfigError`] before any request is made.
    pub fn require_base_url(&self) -> Result<&str, ConfigError> {
        match self.base_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => {
                validate_base_url(url)?;
                Ok(url)
            }
            _ => Err(ConfigError::MissingBaseUrl),
        }
    }
}

fn validate_base_url(raw: &str) -> Result<(), ConfigError> {
    let parsed = url::Url::parse(raw).map_err(|e| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme {}", parsed.scheme()),
        });
    }
    Ok(())
}
