use super::Config;

impl Config {
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("ARTHUR_BASE_URL")
            && !url.trim().is_empty()
        {
            self.base_url = Some(url.trim().to_string());
        }

        if let Ok(key) = std::env::var("ARTHUR_API_KEY")
            && !key.trim().is_empty()
        {
            self.api_key = Some(key.trim().to_string());
        }

        if let Ok(level) = std::env::var("ARTHUR_CONSOLE_LOG")
            && !level.is_empty()
        {
            self.log_level = level.to_ascii_lowercase();
        }

        if let Ok(secs) = std::env::var("ARTHUR_CONSOLE_STALE_SECS")
            && let Ok(secs) = secs.parse::<u64>()
        {
            self.cache.stale_after_secs = secs;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_env::ArthurEnv;
    use super::*;

    #[test]
    fn env_values_override_file_values() {
        let env = ArthurEnv::clean();
        env.set("ARTHUR_BASE_URL", "https://env.example.com")
            .set("ARTHUR_API_KEY", "  env-key  ")
            .set("ARTHUR_CONSOLE_LOG", "DEBUG")
            .set("ARTHUR_CONSOLE_STALE_SECS", "15");

        let mut config = Config {
            base_url: Some("https://file.example.com".into()),
            api_key: Some("file-key".into()),
            ..Config::default()
        };
        config.apply_env_overrides();

        assert_eq!(config.base_url.as_deref(), Some("https://env.example.com"));
        assert_eq!(config.api_key.as_deref(), Some("env-key"));
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.cache.stale_after_secs, 15);
    }

    #[test]
    fn empty_env_values_are_ignored() {
        let env = ArthurEnv::clean();
        env.set("ARTHUR_BASE_URL", "")
            .set("ARTHUR_CONSOLE_STALE_SECS", "soon");

        let mut config = Config {
            base_url: Some("https://file.example.com".into()),
            api_key: Some("file-key".into()),
            ..Config::default()
        };
        config.apply_env_overrides();

        assert_eq!(config.base_url.as_deref(), Some("https://file.example.com"));
        assert_eq!(config.api_key.as_deref(), Some("file-key"));
        assert_eq!(config.cache.stale_after_secs, 0);
    }
}
