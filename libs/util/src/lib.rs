use std::{
    env,
    path::{Path, PathBuf},
};

use serde::de::DeserializeOwned;

mod config;

pub use config::{Config, DatabaseConfig, ServerConfig};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {}", path.display(), source)]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {}: {}", path.display(), source)]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid value for {name}: {value}")]
    InvalidEnv { name: &'static str, value: String },
}

pub fn workspace_dir() -> PathBuf {
    let util_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    util_dir
        .ancestors()
        .nth(2)
        .unwrap_or(util_dir)
        .to_path_buf()
}

/// Path of the config file: `$CONFIG` when set, otherwise `config_name`
/// under the workspace root.
pub fn config_path(config_name: &str) -> PathBuf {
    match env::var_os("CONFIG") {
        Some(path) => PathBuf::from(path),
        None => workspace_dir().join(config_name),
    }
}

pub fn load_config<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let config =
        std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;

    toml::from_str::<T>(&config).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}
