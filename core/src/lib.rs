pub mod actions;
pub mod config;
pub mod errors;
pub mod form;
pub mod local;
pub mod logger;
pub mod state;
#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;

use std::path::PathBuf;

use errors::DirectoryError;

const QUALIFIER: &str = "";
const ORGANIZATION: &str = "";
const APPLICATION: &str = "riffshare";

/// Get the config directory for riffshare.
///
/// | Platform | Value                                                  |
/// | -------- | ------------------------------------------------------ |
/// | Linux    | `$XDG_CONFIG_HOME/riffshare` or `$HOME/.config/riffshare` |
/// | macOS    | `$HOME/Library/Application Support/riffshare`          |
/// | Windows  | `{FOLDERID_RoamingAppData}\riffshare\config`           |
///
/// # Errors
///
/// This function will return an error if the home directory could not be determined.
pub fn get_config_dir() -> Result<PathBuf, DirectoryError> {
    directories::ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or(DirectoryError::Config)
}

/// Get the data directory for riffshare, where the local store lives.
///
/// | Platform | Value                                                      |
/// | -------- | ---------------------------------------------------------- |
/// | Linux    | `$XDG_DATA_HOME/riffshare` or `$HOME/.local/share/riffshare` |
/// | macOS    | `$HOME/Library/Application Support/riffshare`              |
/// | Windows  | `{FOLDERID_RoamingAppData}\riffshare\data`                 |
///
/// # Errors
///
/// This function will return an error if the home directory could not be determined.
pub fn get_data_dir() -> Result<PathBuf, DirectoryError> {
    directories::ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or(DirectoryError::Data)
}

/// Format a duration as `seconds.millis`, right aligned for log output.
#[must_use]
pub fn format_duration(duration: &std::time::Duration) -> String {
    format!("{:>4}.{:03}", duration.as_secs(), duration.subsec_millis())
}
