use std::sync::{LazyLock, Mutex, MutexGuard, PoisonError};

/// Every variable [`super::Config::apply_env_overrides`] reads.
const ARTHUR_VARS: [&str; 4] = [
    "ARTHUR_BASE_URL",
    "ARTHUR_API_KEY",
    "ARTHUR_CONSOLE_LOG",
    "ARTHUR_CONSOLE_STALE_SECS",
];

static ENV_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

/// Exclusive hold on the `ARTHUR_*` variables for one test. Starts with all
/// of them unset and puts the previous values back on drop.
pub(super) struct ArthurEnv {
    previous: Vec<(&'static str, Option<String>)>,
    _lock: MutexGuard<'static, ()>,
}

impl ArthurEnv {
    pub(super) fn clean() -> Self {
        let lock = ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        let previous = ARTHUR_VARS
            .iter()
            .map(|&key| (key, std::env::var(key).ok()))
            .collect();
        for key in ARTHUR_VARS {
            // SAFETY: ENV_LOCK is held, so no other test touches the environment.
            unsafe {
                std::env::remove_var(key);
            }
        }
        Self {
            previous,
            _lock: lock,
        }
    }

    pub(super) fn set(&self, key: &'static str, value: &str) -> &Self {
        assert!(ARTHUR_VARS.contains(&key), "{key} is not an ARTHUR_* override");
        // SAFETY: ENV_LOCK is held for the lifetime of `self`.
        unsafe {
            std::env::set_var(key, value);
        }
        self
    }
}

impl Drop for ArthurEnv {
    fn drop(&mut self) {
        for (key, value) in &self.previous {
            // SAFETY: the lock field is dropped after this body runs.
            unsafe {
                match value {
                    Some(value) => std::env::set_var(key, value),
                    None => std::env::remove_var(key),
                }
            }
        }
    }
}
