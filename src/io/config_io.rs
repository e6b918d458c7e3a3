use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::io::paths::CONFIG_FILE;
use crate::model::config::Config;

/// Error type for config loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Read `traytodo.toml` from the data directory. A missing file gives the
/// defaults; a malformed one is an error.
pub fn read_config(data_dir: &Path) -> Result<Config, ConfigError> {
    let config_path = data_dir.join(CONFIG_FILE);
    let config_text = match fs::read_to_string(&config_path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Config::default()),
        Err(e) => {
            return Err(ConfigError::ReadError {
                path: config_path,
                source: e,
            });
        }
    };
    toml::from_str(&config_text).map_err(|e| ConfigError::ParseError {
        path: config_path,
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::config::BucketScheme;
    use tempfile::TempDir;

    #[test]
    fn missing_config_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = read_config(tmp.path()).unwrap();
        assert_eq!(config.store.file, "tasks.json");
    }

    #[test]
    fn reads_config_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            "[store]\nfile = \"todo.json\"\n\n[archive]\nscheme = \"day-count\"\n",
        )
        .unwrap();
        let config = read_config(tmp.path()).unwrap();
        assert_eq!(config.store.file, "todo.json");
        assert_eq!(config.archive.scheme, BucketScheme::DayCount);
    }

    #[test]
    fn malformed_config_is_an_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "[store\nfile = ").unwrap();
        let err = read_config(tmp.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
        assert!(err.to_string().contains(CONFIG_FILE));
    }
}
