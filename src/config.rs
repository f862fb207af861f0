//! Configuration types.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;
use crate::wizard::model::storage_keys;

/// Where the wizard snapshot is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// Lost on exit.
    Memory,
    /// One JSON file per key under `dir`.
    File { dir: PathBuf },
    /// A libSQL database file.
    LibSql { path: PathBuf },
}

/// Wizard configuration.
#[derive(Debug, Clone)]
pub struct WizardConfig {
    /// Storage backend for the form snapshot.
    pub storage: StorageBackend,
    /// Key the snapshot is stored under.
    pub storage_key: String,
    /// Latency of the simulated final submission.
    pub submit_delay: Duration,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            storage: StorageBackend::File {
                dir: PathBuf::from("./data"),
            },
            storage_key: storage_keys::FORM_STATE.to_string(),
            submit_delay: Duration::from_secs(2),
        }
    }
}

impl WizardConfig {
    /// Build config from environment variables, falling back to defaults.
    ///
    /// - `FORM_WIZARD_STORAGE`: `memory`, `file` (default) or `libsql`
    /// - `FORM_WIZARD_DATA_PATH`: data directory, default `./data`
    /// - `FORM_WIZARD_STORAGE_KEY`: snapshot key
    /// - `FORM_WIZARD_SUBMIT_DELAY_MS`: simulated submission latency
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build config from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let data_path = lookup("FORM_WIZARD_DATA_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./data"));

        let storage = match lookup("FORM_WIZARD_STORAGE")
            .map(|s| s.trim().to_ascii_lowercase())
            .as_deref()
        {
            None | Some("") | Some("file") => StorageBackend::File { dir: data_path },
            Some("memory") => StorageBackend::Memory,
            Some("libsql") => StorageBackend::LibSql {
                path: data_path.join("form-wizard.db"),
            },
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    key: "FORM_WIZARD_STORAGE".to_string(),
                    message: format!("unknown backend '{other}' (expected memory, file or libsql)"),
                });
            }
        };

        let storage_key = match lookup("FORM_WIZARD_STORAGE_KEY") {
            Some(key) if key.trim().is_empty() => {
                return Err(ConfigError::InvalidValue {
                    key: "FORM_WIZARD_STORAGE_KEY".to_string(),
                    message: "must not be empty".to_string(),
                });
            }
            Some(key) => key.trim().to_string(),
            None => defaults.storage_key,
        };

        let submit_delay = match lookup("FORM_WIZARD_SUBMIT_DELAY_MS") {
            Some(raw) => {
                let ms: u64 = raw.trim().parse().map_err(|e| ConfigError::InvalidValue {
                    key: "FORM_WIZARD_SUBMIT_DELAY_MS".to_string(),
                    message: format!("{e}"),
                })?;
                Duration::from_millis(ms)
            }
            None => defaults.submit_delay,
        };

        Ok(Self {
            storage,
            storage_key,
            submit_delay,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_without_env() {
        let config = WizardConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(
            config.storage,
            StorageBackend::File {
                dir: PathBuf::from("./data")
            }
        );
        assert_eq!(config.storage_key, "multi-step-form-storage");
        assert_eq!(config.submit_delay, Duration::from_secs(2));
    }

    #[test]
    fn reads_overrides() {
        let config = WizardConfig::from_lookup(lookup(&[
            ("FORM_WIZARD_STORAGE", "LibSQL"),
            ("FORM_WIZARD_DATA_PATH", "/tmp/wizard"),
            ("FORM_WIZARD_STORAGE_KEY", "my-form"),
            ("FORM_WIZARD_SUBMIT_DELAY_MS", "250"),
        ]))
        .unwrap();
        assert_eq!(
            config.storage,
            StorageBackend::LibSql {
                path: PathBuf::from("/tmp/wizard/form-wizard.db")
            }
        );
        assert_eq!(config.storage_key, "my-form");
        assert_eq!(config.submit_delay, Duration::from_millis(250));

        let memory =
            WizardConfig::from_lookup(lookup(&[("FORM_WIZARD_STORAGE", "memory")])).unwrap();
        assert_eq!(memory.storage, StorageBackend::Memory);
    }

    #[test]
    fn rejects_invalid_values() {
        let err = WizardConfig::from_lookup(lookup(&[("FORM_WIZARD_STORAGE", "redis")]))
            .unwrap_err();
        assert!(err.to_string().contains("FORM_WIZARD_STORAGE"));

        let err = WizardConfig::from_lookup(lookup(&[("FORM_WIZARD_SUBMIT_DELAY_MS", "soon")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));

        assert!(WizardConfig::from_lookup(lookup(&[("FORM_WIZARD_STORAGE_KEY", " ")])).is_err());
    }
}
