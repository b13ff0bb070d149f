#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::unnecessary_literal_bound,
    clippy::module_name_repetitions,
    clippy::struct_field_names,
    clippy::must_use_candidate,
    clippy::new_without_default,
    clippy::return_self_not_must_use
)]

#[macro_use]
extern crate rust_i18n;

i18n!("locales", fallback = "en");

pub mod actions;
pub mod api;
pub mod config;
pub mod error;
pub mod fetch;
pub mod filters;
#[cfg(feature = "tui")]
pub mod tui;
pub mod ui;
pub mod view;

pub use actions::{Credential, Session};
pub use api::ArthurClient;
pub use config::Config;
pub use error::{ApiError, ConfigError, ConsoleError, FormError};
