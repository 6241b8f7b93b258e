//! Configuration manager for userhub.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use url::Url;

const DEFAULT_CONFIG_PATH: &str = "config.yaml";
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Errors that may occur during the configuration loading process.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("URL is invalid: {0}")]
    Url(#[from] url::ParseError),
    #[error("Failed to deserialize `config.yaml`: {0}")]
    Deserialize(#[from] serde_yaml::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Structure of the `config.yaml` file.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    /// Instance name.
    pub name: String,
    /// Public base URL, used for `Location` and pagination links.
    pub url: String,
    /// Listen port. The `PORT` environment variable takes precedence.
    pub port: Option<u16>,
    #[serde(default)]
    version: String,
    #[serde(skip)]
    path: PathBuf,
    /// Related to PostgreSQL configuration.
    #[serde(skip_serializing)]
    pub postgres: Option<Postgres>,
}

/// PostgreSQL configuration.
#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize)]
pub struct Postgres {
    /// Hostname:(?port) for PostgreSQL instance.
    pub address: String,
    /// Database name.
    pub database: Option<String>,
    /// Username credential to connect.
    pub username: Option<String>,
    /// Password credential to connect.
    pub password: Option<String>,
    /// Maximum pool connections.
    pub pool_size: Option<u32>,
}

impl Configuration {
    /// Reads the `config.yaml` file from the specified path or the default
    /// location. A missing or unreadable file falls back to defaults.
    pub fn read(self) -> Result<Arc<Self>, Error> {
        let file_path = if self.path.as_os_str().is_empty() {
            Path::new(DEFAULT_CONFIG_PATH).to_path_buf()
        } else {
            self.path.clone()
        };

        match File::open(&file_path) {
            Ok(file) => {
                let mut config: Configuration = match serde_yaml::from_reader(file) {
                    Ok(config) => config,
                    Err(err) => {
                        return Ok(Arc::new(self.error(err)));
                    }
                };

                // set app version.
                config.version = VERSION.to_owned();

                // normalize URL.
                config.url = normalize_url(&config.url)?;

                Ok(Arc::new(config))
            }
            Err(err) => Ok(Arc::new(self.error(err))),
        }
    }

    /// Return a default configuration as fallback.
    fn error(&self, err: impl std::error::Error) -> Self {
        tracing::error!(error = %err, "`config.yaml` file not read");
        Self {
            version: VERSION.to_owned(),
            ..Default::default()
        }
    }
}

/// Parse and strip any trailing slash so links can append paths.
fn normalize_url(url: &str) -> Result<String, Error> {
    let parsed = Url::parse(url)?;
    Ok(parsed.as_str().trim_end_matches('/').to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_url() {
        assert_eq!(
            normalize_url("http://localhost:1111/").unwrap(),
            "http://localhost:1111"
        );
        assert_eq!(
            normalize_url("https://users.example.com").unwrap(),
            "https://users.example.com"
        );
        assert!(normalize_url("not a url").is_err());
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = Configuration {
            path: PathBuf::from("does-not-exist.yaml"),
            ..Default::default()
        }
        .read()
        .unwrap();
        assert_eq!(config.name, "");
        assert_eq!(config.postgres, None);
        assert_eq!(config.version, VERSION);
    }
}
