//! Application directory helpers anchored to a single `.cultivar` folder.
//!
//! Log files live here. The base defaults to the OS config directory and can
//! be redirected with `CULTIVAR_CONFIG_HOME` for tests or portable setups.

use std::path::PathBuf;

use directories::BaseDirs;
use thiserror::Error;

/// Name of the application directory that lives under the OS config root.
pub const APP_DIR_NAME: &str = ".cultivar";

/// Environment variable overriding the base config directory.
pub const CONFIG_HOME_ENV: &str = "CULTIVAR_CONFIG_HOME";

#[derive(Debug, Error)]
pub enum AppDirError {
    #[error("No suitable base config directory available for application files")]
    NoBaseDir,
    #[error("Failed to create application directory at {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Return the root `.cultivar` directory, creating it if needed.
pub fn app_root_dir() -> Result<PathBuf, AppDirError> {
    let base = config_base_dir().ok_or(AppDirError::NoBaseDir)?;
    ensure_dir(base.join(APP_DIR_NAME))
}

/// Return the logs directory inside the `.cultivar` root, creating it if needed.
pub fn logs_dir() -> Result<PathBuf, AppDirError> {
    ensure_dir(app_root_dir()?.join("logs"))
}

fn ensure_dir(path: PathBuf) -> Result<PathBuf, AppDirError> {
    std::fs::create_dir_all(&path).map_err(|source| AppDirError::CreateDir {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

fn config_base_dir() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_HOME_ENV)
        && !path.trim().is_empty()
    {
        return Some(PathBuf::from(path));
    }
    BaseDirs::new().map(|dirs| dirs.config_dir().to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn uses_env_override_for_log_dir() {
        let base = tempdir().unwrap();
        let previous = std::env::var(CONFIG_HOME_ENV).ok();
        // SAFETY: no other unit test in this crate reads or writes this variable.
        unsafe { std::env::set_var(CONFIG_HOME_ENV, base.path()) };
        let logs = logs_dir();
        match previous {
            // SAFETY: see above.
            Some(value) => unsafe { std::env::set_var(CONFIG_HOME_ENV, value) },
            None => unsafe { std::env::remove_var(CONFIG_HOME_ENV) },
        }
        let logs = logs.unwrap();
        assert_eq!(logs, base.path().join(APP_DIR_NAME).join("logs"));
        assert!(logs.is_dir());
    }
}
