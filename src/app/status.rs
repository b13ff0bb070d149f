use arthur_console::Config;
use arthur_console::actions::Credential;
use arthur_console::ui::style;

pub fn render_status(config: &Config, credential: Option<&Credential>) -> String {
    let not_set = t!("status.not_set");
    let lines = [
        style::header(format!("◆ {}", t!("status.title"))),
        String::new(),
        format!("{}  {}", t!("status.version"), env!("CARGO_PKG_VERSION")),
        format!("{}   {}", t!("status.config"), config.config_path.display()),
        String::new(),
        format!("{}", t!("status.engine")),
        format!(
            "  {}  {}",
            t!("status.base_url"),
            config
                .base_url
                .as_deref()
                .map_or_else(|| not_set.to_string(), style::url)
        ),
        format!(
            "  {}   {}",
            t!("status.api_key"),
            if credential.is_some() {
                t!("status.configured")
            } else {
                not_set.clone()
            }
        ),
        String::new(),
        format!("{}", t!("status.runtime")),
        format!("  {} {}", t!("status.log_level"), config.log_level),
        format!(
            "  {}  {}s connect, {}s request",
            t!("status.timeouts"),
            config.http.connect_timeout_secs,
            config.http.request_timeout_secs
        ),
        format!("  {} {}s", t!("status.cache"), config.cache.stale_after_secs),
        format!("  {} {}", t!("status.page_size"), config.ui.default_page_size),
    ];
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_never_prints_the_key() {
        let config = Config {
            base_url: Some("https://engine.example.com".into()),
            api_key: Some("sk-secret".into()),
            ..Config::default()
        };
        let credential = Credential::new("sk-secret");
        let rendered = render_status(&config, credential.as_ref());
        assert!(rendered.contains("https://engine.example.com"));
        assert!(!rendered.contains("sk-secret"));
    }
}
