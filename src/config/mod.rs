mod env_overrides;
mod loader;
pub mod schema;
#[cfg(test)]
mod test_env;

pub use schema::{CacheConfig, Config, HttpConfig, UiConfig};
