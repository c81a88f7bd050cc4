use crate::error::{Error, Result};
use std::env;
use std::path::PathBuf;

/// Environment variable that points at an explicit config file.
pub const CONFIG_ENV: &str = "RELEASER_CONFIG";

/// Base releaser config directory (~/.config/releaser/ on all platforms)
pub fn releaser() -> Result<PathBuf> {
    #[cfg(windows)]
    {
        let appdata = env::var("APPDATA").map_err(|_| {
            Error::internal_unexpected(
                "APPDATA environment variable not set on Windows".to_string(),
            )
        })?;
        Ok(PathBuf::from(appdata).join("releaser"))
    }

    #[cfg(not(windows))]
    {
        let home = env::var("HOME").map_err(|_| {
            Error::internal_unexpected(
                "HOME environment variable not set on Unix-like system".to_string(),
            )
        })?;
        Ok(PathBuf::from(home).join(".config").join("releaser"))
    }
}

/// Config file path: $RELEASER_CONFIG when set, else releaser.json in the config dir
pub fn releaser_json() -> Result<PathBuf> {
    match env::var(CONFIG_ENV) {
        Ok(path) if !path.trim().is_empty() => Ok(PathBuf::from(path)),
        _ => Ok(releaser()?.join("releaser.json")),
    }
}
