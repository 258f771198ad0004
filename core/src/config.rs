//! Handles the configuration of riffshare.
//!
//! this module is responsible for parsing the Riffshare.toml file and layering environment
//! variables and cli arguments on top of it.

use config::{Config, ConfigError, Environment, File};
use riffshare_api::{ApiError, HttpClient, MutationMethod};
use riffshare_types::SongSort;
use serde::Deserialize;

use std::{path::PathBuf, str::FromStr, time::Duration};

use crate::errors::DirectoryError;

pub static DEFAULT_CONFIG: &str = include_str!("../Riffshare.toml");

/// Name of the local store file inside the data directory.
pub const LOCAL_STORE_FILE: &str = "local.json";

#[derive(Clone, Debug, Deserialize, Default, PartialEq, Eq)]
pub struct Settings {
    /// How to reach the songs service, and client-side behavior
    #[serde(default)]
    pub client: ClientSettings,
    /// Settings for the song submission form
    #[serde(default)]
    pub submission: SubmissionSettings,
    /// Settings for how song lists are shown
    #[serde(default)]
    pub display: DisplaySettings,
}

impl Settings {
    /// Load settings from the config file, environment variables, and CLI arguments.
    ///
    /// The config file is located at the path specified by the `--config` flag.
    ///
    /// The environment variables are prefixed with `RIFFSHARE_`, nested keys are separated by `__`
    /// (e.g. `RIFFSHARE_CLIENT__API_URL`).
    ///
    /// # Errors
    ///
    /// This function will return an error if the config file is not found or if the config file is
    /// invalid.
    #[inline]
    pub fn init(
        config: PathBuf,
        api_url: Option<String>,
        log_level: Option<log::LevelFilter>,
    ) -> Result<Self, ConfigError> {
        Self::init_with_env(config, environment(), api_url, log_level)
    }

    fn init_with_env(
        config: PathBuf,
        env: Environment,
        api_url: Option<String>,
        log_level: Option<log::LevelFilter>,
    ) -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(File::from(config))
            .add_source(env)
            .build()?;

        let mut settings: Self = s.try_deserialize()?;

        if let Some(path) = settings.client.local_store.as_mut() {
            *path = shellexpand::tilde(&path.to_string_lossy())
                .into_owned()
                .into();
        }

        if let Some(api_url) = api_url {
            settings.client.api_url = api_url;
        }

        if let Some(log_level) = log_level {
            settings.client.log_level = log_level;
        }

        Ok(settings)
    }

    /// Get the (default) path to the config file.
    /// If the config file does not exist at this path, it will be created with the default config.
    ///
    /// See [`crate::get_config_dir`] for more information about where this default path is located.
    ///
    /// # Errors
    ///
    /// This function will return an error if the system config directory (e.g., `~/.config` on linux) could not be found, or if the config file was missing and could not be created.
    #[inline]
    pub fn get_config_path() -> Result<PathBuf, std::io::Error> {
        match crate::get_config_dir() {
            Ok(config_dir) => {
                // if the config directory does not exist, create it
                if !config_dir.exists() {
                    std::fs::create_dir_all(&config_dir)?;
                }
                let config_file = config_dir.join("Riffshare.toml");

                if !config_file.exists() {
                    std::fs::write(&config_file, DEFAULT_CONFIG)?;
                }

                Ok(config_file)
            }
            Err(e) => {
                eprintln!("Error: {e}");
                Err(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "Unable to find the config directory for riffshare.",
                ))
            }
        }
    }

    /// Where the local store (votes, admin token, first-visit flag) is kept.
    ///
    /// # Errors
    ///
    /// Fails if no path is configured and the data directory can't be determined.
    pub fn local_store_path(&self) -> Result<PathBuf, DirectoryError> {
        match &self.client.local_store {
            Some(path) => Ok(path.clone()),
            None => crate::get_data_dir().map(|dir| dir.join(LOCAL_STORE_FILE)),
        }
    }

    /// Build the HTTP client these settings describe.
    ///
    /// # Errors
    ///
    /// Fails if the configured api url is invalid.
    pub fn http_client(&self) -> Result<HttpClient, ApiError> {
        HttpClient::new(
            &self.client.api_url,
            self.client.mutation_method,
            self.client.request_timeout.map(Duration::from_secs),
        )
    }
}

/// `RIFFSHARE_` variables, with `__` between nested keys.
fn environment() -> Environment {
    Environment::with_prefix("RIFFSHARE")
        .prefix_separator("_")
        .separator("__")
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct ClientSettings {
    /// Root url of the songs service, the `/songs` and `/admin/songs` endpoints live under it.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// HTTP verb used when voting and counting downloads, "post" or "patch".
    /// Default is "post".
    #[serde(default)]
    pub mutation_method: MutationMethod,
    /// Give up on a request after this many seconds.
    /// Unset means wait forever.
    #[serde(default)]
    pub request_timeout: Option<u64>,
    /// Where to keep the local store.
    /// Defaults to `local.json` in the data directory.
    #[serde(default)]
    pub local_store: Option<PathBuf>,
    /// What level of logging to use.
    /// Default is "warn".
    #[serde(default = "default_log_level")]
    #[serde(deserialize_with = "de_log_level")]
    pub log_level: log::LevelFilter,
}

fn default_api_url() -> String {
    String::from("http://localhost:5000/api")
}

fn de_log_level<'de, D>(deserializer: D) -> Result<log::LevelFilter, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Ok(log::LevelFilter::from_str(&s).unwrap_or_else(|_| default_log_level()))
}

const fn default_log_level() -> log::LevelFilter {
    log::LevelFilter::Warn
}

impl Default for ClientSettings {
    #[inline]
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            mutation_method: MutationMethod::default(),
            request_timeout: None,
            local_store: None,
            log_level: default_log_level(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Default, PartialEq, Eq)]
pub struct SubmissionSettings {
    /// Code submitters must enter, shared through the community channel.
    /// When set, the form checks it before submitting; it is always forwarded to the server.
    /// An empty string is the same as unset.
    #[serde(default, deserialize_with = "de_validation_code")]
    pub validation_code: Option<String>,
}

fn de_validation_code<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.filter(|code| !code.trim().is_empty()))
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
pub struct DisplaySettings {
    /// How many songs to show per page.
    /// Default is 20, 0 is treated as the default.
    #[serde(default = "default_page_size", deserialize_with = "de_page_size")]
    pub page_size: usize,
    /// Sort key used when none is given.
    #[serde(default)]
    pub default_sort: SongSort,
}

pub const fn default_page_size() -> usize {
    20
}

fn de_page_size<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let size = usize::deserialize(deserializer)?;
    Ok(if size == 0 { default_page_size() } else { size })
}

impl Default for DisplaySettings {
    #[inline]
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            default_sort: SongSort::default(),
        }
    }
}
