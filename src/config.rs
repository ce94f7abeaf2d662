//! Nominate configuration.
//!
//! Loaded from `~/.nominate/config.toml`. A missing file means defaults:
//! the database lives next to it and completion notices are off.
//!
//! ```toml
//! database = "/srv/nominate/central.db"
//!
//! [notify]
//! enabled = true
//! endpoint = "https://docs.google.com/forms/d/e/FORM_ID/formResponse"
//! field = "entry.123456789"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::notify::{CommandNotifier, CompletionNotice, NoopNotifier, Notifier, NotifyError};

/// Errors that can occur loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not determine home directory")]
    NoHome,

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("notify is enabled in {path} but `{key}` is empty")]
    MissingNotifyKey { path: PathBuf, key: &'static str },
}

/// Nominate configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    /// Where the committee database lives. Defaults to
    /// `~/.nominate/committee.sqlite`.
    pub database: Option<PathBuf>,

    pub notify: NotifyConfig,
}

/// The completion notice endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct NotifyConfig {
    pub enabled: bool,

    /// URL the notice is posted to.
    pub endpoint: String,

    /// Form field that carries the message.
    pub field: String,
}

impl Config {
    /// Load config from `~/.nominate/config.toml`, or defaults if there is
    /// no such file.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path().ok_or(ConfigError::NoHome)?;
        Self::load_from(&path)
    }

    /// Load config from `path`, or defaults if it doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if config.notify.enabled {
            for (key, value) in [
                ("endpoint", &config.notify.endpoint),
                ("field", &config.notify.field),
            ] {
                if value.trim().is_empty() {
                    return Err(ConfigError::MissingNotifyKey {
                        path: path.to_path_buf(),
                        key,
                    });
                }
            }
        }

        Ok(config)
    }

    /// The config directory: `~/.nominate`.
    pub fn dir() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".nominate"))
    }

    /// The config file path: `~/.nominate/config.toml`.
    pub fn path() -> Option<PathBuf> {
        Self::dir().map(|d| d.join("config.toml"))
    }

    /// The configured database path, or `~/.nominate/committee.sqlite`.
    pub fn database_path(&self) -> Option<PathBuf> {
        self.database
            .clone()
            .or_else(|| Self::dir().map(|d| d.join("committee.sqlite")))
    }

    /// The notifier this configuration asks for.
    pub fn notifier(&self) -> ConfiguredNotifier {
        if self.notify.enabled {
            ConfiguredNotifier::Command(CommandNotifier::new(
                self.notify.endpoint.clone(),
                self.notify.field.clone(),
            ))
        } else {
            ConfiguredNotifier::Disabled(NoopNotifier)
        }
    }
}

/// Either notifier, chosen at startup.
#[derive(Debug, Clone)]
pub enum ConfiguredNotifier {
    Disabled(NoopNotifier),
    Command(CommandNotifier),
}

impl Notifier for ConfiguredNotifier {
    fn notify(&self, notice: &CompletionNotice) -> Result<(), NotifyError> {
        match self {
            Self::Disabled(n) => n.notify(notice),
            Self::Command(n) => n.notify(notice),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn write_config(contents: &str) -> (TempDir, PathBuf) {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, contents).unwrap();
        (tmp, path)
    }

    #[test]
    fn missing_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = Config::load_from(&tmp.path().join("config.toml")).unwrap();

        assert_eq!(config, Config::default());
        assert!(matches!(config.notifier(), ConfiguredNotifier::Disabled(_)));
    }

    #[test]
    fn full_config() {
        let (_tmp, path) = write_config(
            r#"
database = "/srv/nominate/central.db"

[notify]
enabled = true
endpoint = "https://example.com/form"
field = "entry.1"
"#,
        );

        let config = Config::load_from(&path).unwrap();

        assert_eq!(
            config.database_path(),
            Some(PathBuf::from("/srv/nominate/central.db"))
        );
        assert_eq!(config.notify.endpoint, "https://example.com/form");
        assert!(matches!(config.notifier(), ConfiguredNotifier::Command(_)));
    }

    #[test]
    fn disabled_notify_needs_no_endpoint() {
        let (_tmp, path) = write_config("[notify]\nenabled = false\n");
        let config = Config::load_from(&path).unwrap();
        assert!(!config.notify.enabled);
    }

    #[test]
    fn enabled_notify_requires_endpoint() {
        let (_tmp, path) = write_config("[notify]\nenabled = true\nfield = \"entry.1\"\n");
        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingNotifyKey { key: "endpoint", .. }
        ));
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let (_tmp, path) = write_config("database = [");
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
