#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::unnecessary_literal_bound,
    clippy::module_name_repetitions,
    clippy::struct_field_names
)]

#[macro_use]
extern crate rust_i18n;

i18n!("locales", fallback = "en");

use anyhow::{Context, Result};
use arthur_console::Config;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

mod app;
mod cli;

use cli::commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    // reqwest is built with rustls and needs a process-level crypto provider.
    if let Err(e) = rustls::crypto::ring::default_provider().install_default() {
        eprintln!("Warning: Failed to install default crypto provider: {e:?}");
    }

    let cli = Cli::parse();
    let config = Config::load_or_init()?;

    // Logs go to stderr so table and JSON output stay clean on stdout. The
    // full-screen browser owns the terminal, so it runs without a log sink.
    let writer = if cli.command.is_full_screen() {
        BoxMakeWriter::new(std::io::sink)
    } else {
        BoxMakeWriter::new(std::io::stderr)
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level(cli.verbose, &config.log_level))
        .with_writer(writer)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;

    app::dispatch::dispatch(cli, config).await
}

/// `-v`/`-vv` win over the configured level.
fn log_level(verbose: u8, configured: &str) -> Level {
    match verbose {
        0 => configured.parse().unwrap_or(Level::INFO),
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_overrides_config() {
        assert_eq!(log_level(0, "warn"), Level::WARN);
        assert_eq!(log_level(0, "nonsense"), Level::INFO);
        assert_eq!(log_level(1, "warn"), Level::DEBUG);
        assert_eq!(log_level(3, "warn"), Level::TRACE);
    }
}
