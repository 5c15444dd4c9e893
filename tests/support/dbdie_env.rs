use std::{
    path::PathBuf,
    sync::{Mutex, OnceLock},
};

use dbdie_labeler::app_dirs::CONFIG_HOME_ENV;
use dbdie_labeler::config::API_HOST_ENV;

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

/// Points the app root and API host at test values, restoring both on drop.
pub struct DbdieEnvGuard {
    previous: Vec<(&'static str, Option<String>)>,
    _lock: std::sync::MutexGuard<'static, ()>,
}

impl DbdieEnvGuard {
    pub fn set_config_home(path: PathBuf) -> Self {
        Self::set(&[(CONFIG_HOME_ENV, Some(path.to_string_lossy().into_owned()))])
    }

    pub fn set(vars: &[(&'static str, Option<String>)]) -> Self {
        let lock = ENV_LOCK
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(|err| err.into_inner());
        let mut previous = Vec::new();
        for (key, value) in vars {
            previous.push((*key, std::env::var(key).ok()));
            // SAFETY: tests run under a global lock to prevent concurrent env mutations.
            unsafe {
                match value {
                    Some(value) => std::env::set_var(key, value),
                    None => std::env::remove_var(key),
                }
            }
        }
        Self {
            previous,
            _lock: lock,
        }
    }

    pub fn with_api_host(self, host: Option<&str>) -> Self {
        let previous = std::env::var(API_HOST_ENV).ok();
        // SAFETY: the guard still holds the global env lock.
        unsafe {
            match host {
                Some(host) => std::env::set_var(API_HOST_ENV, host),
                None => std::env::remove_var(API_HOST_ENV),
            }
        }
        let mut guard = self;
        guard.previous.push((API_HOST_ENV, previous));
        guard
    }
}

impl Drop for DbdieEnvGuard {
    fn drop(&mut self) {
        for (key, value) in self.previous.drain(..).rev() {
            // SAFETY: tests run under a global lock to prevent concurrent env mutations.
            unsafe {
                match value {
                    Some(value) => std::env::set_var(key, value),
                    None => std::env::remove_var(key),
                }
            }
        }
    }
}
