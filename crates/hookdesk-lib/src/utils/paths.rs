// Application paths
// Resolves where Hookdesk keeps its database

use std::path::PathBuf;

/// App identifier used for the data directory name
pub const APP_IDENTIFIER: &str = "com.hookdesk.Hookdesk";

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "HOOKDESK_DATA_DIR";

/// Get the application data directory
///
/// `HOOKDESK_DATA_DIR` wins when set and non-empty, otherwise the platform
/// data directory joined with [`APP_IDENTIFIER`].
pub fn get_app_data_dir() -> Result<PathBuf, String> {
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }

    dirs::data_dir()
        .map(|p| p.join(APP_IDENTIFIER))
        .ok_or_else(|| "Could not determine application data directory".to_string())
}
