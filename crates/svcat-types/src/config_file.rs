use std::fmt::Debug;
use std::io::Error as IoError;
use std::io::ErrorKind;
use std::io::Write;
use std::path::Path;
use std::fs::{File, read_to_string};

use tracing::debug;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadConfigError {
    #[error("unable to read config: {0}")]
    Io(#[from] IoError),
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}

/// TOML persistence for configuration structs
pub trait SaveLoadConfig: Sized {
    fn save_to<T: AsRef<Path>>(&self, path: T) -> Result<(), IoError>;

    fn load_from<T: AsRef<Path>>(path: T) -> Result<Self, LoadConfigError>;

    fn load_str(config: &str) -> Result<Self, LoadConfigError>;
}

impl<S> SaveLoadConfig for S
where
    S: Serialize + DeserializeOwned + Debug,
{
    fn save_to<T: AsRef<Path>>(&self, path: T) -> Result<(), IoError> {
        let path = path.as_ref();
        debug!(?path, "saving config");
        let content =
            toml::to_string(self).map_err(|err| IoError::new(ErrorKind::InvalidData, err))?;

        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()
    }

    fn load_from<T: AsRef<Path>>(path: T) -> Result<Self, LoadConfigError> {
        let path = path.as_ref();
        debug!(?path, "loading config");
        let content = read_to_string(path)?;
        Self::load_str(&content)
    }

    fn load_str(config: &str) -> Result<Self, LoadConfigError> {
        Ok(toml::from_str(config)?)
    }
}

#[cfg(test)]
mod test {

    use serde::{Serialize, Deserialize};

    use super::{SaveLoadConfig, LoadConfigError};

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct SampleConfig {
        prefix: String,
        capacity: usize,
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("sample.toml");
        let config = SampleConfig {
            prefix: "bindings".to_owned(),
            capacity: 10,
        };
        config.save_to(&path).expect("save");

        let loaded = SampleConfig::load_from(&path).expect("load");
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_invalid_str() {
        let err = SampleConfig::load_str("prefix = 3").expect_err("should not parse");
        assert!(matches!(err, LoadConfigError::Toml(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = SampleConfig::load_from("/nonexistent/svcat.toml").expect_err("missing");
        assert!(matches!(err, LoadConfigError::Io(_)));
    }
}
