//! On-disk service settings.

use directories::ProjectDirs;
use nepfont_model::ServiceSettings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const SETTINGS_SCHEMA_VERSION: u32 = 1;
const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("unable to resolve configuration directory")]
    NoConfigDirectory,
    #[error("unsupported settings version {found} (expected {SETTINGS_SCHEMA_VERSION})")]
    UnsupportedVersion { found: u32 },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct Storage {
    root: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SettingsEnvelope {
    version: u32,
    settings: ServiceSettings,
}

impl Storage {
    pub fn from_default_project() -> Result<Self, StorageError> {
        let dirs = ProjectDirs::from("dev", "Nepfont", "Nepfont")
            .ok_or(StorageError::NoConfigDirectory)?;

        Ok(Self { root: dirs.config_dir().to_path_buf() })
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Reads the stored settings, or the built-in defaults when none were saved.
    pub fn load_settings(&self) -> Result<ServiceSettings, StorageError> {
        let path = self.settings_path();
        if !path.exists() {
            debug!(path = %path.display(), "no stored settings, using defaults");
            return Ok(ServiceSettings::default());
        }

        let bytes = fs::read(path)?;
        let envelope: SettingsEnvelope = serde_json::from_slice(&bytes)?;
        if envelope.version != SETTINGS_SCHEMA_VERSION {
            return Err(StorageError::UnsupportedVersion { found: envelope.version });
        }

        Ok(envelope.settings)
    }

    pub fn save_settings(&self, settings: &ServiceSettings) -> Result<(), StorageError> {
        fs::create_dir_all(&self.root)?;

        let envelope =
            SettingsEnvelope { version: SETTINGS_SCHEMA_VERSION, settings: settings.clone() };

        let bytes = serde_json::to_vec_pretty(&envelope)?;
        fs::write(self.settings_path(), bytes)?;
        Ok(())
    }

    pub fn settings_path(&self) -> PathBuf {
        self.root.join(SETTINGS_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_round_trip() {
        let temp = tempfile::tempdir().expect("temp dir should be created");
        let store = Storage::with_root(temp.path());

        let settings = ServiceSettings {
            conversion_url: "http://127.0.0.1:8080/convert".to_owned(),
            timeout_ms: 750,
            ..ServiceSettings::default()
        };

        store.save_settings(&settings).expect("save should succeed");
        let loaded = store.load_settings().expect("load should succeed");

        assert_eq!(loaded, settings);
    }

    #[test]
    fn load_defaults_when_file_absent() {
        let temp = tempfile::tempdir().expect("temp dir should be created");
        let store = Storage::with_root(temp.path());

        let loaded = store.load_settings().expect("load should succeed");
        assert_eq!(loaded, ServiceSettings::default());
    }

    #[test]
    fn partial_settings_keep_defaults() {
        let temp = tempfile::tempdir().expect("temp dir should be created");
        let store = Storage::with_root(temp.path());
        fs::write(
            store.settings_path(),
            r#"{ "version": 1, "settings": { "client_id": "fontconversion-1234" } }"#,
        )
        .expect("write should succeed");

        let loaded = store.load_settings().expect("load should succeed");
        assert_eq!(loaded.client_id, "fontconversion-1234");
        assert_eq!(loaded.conversion_url, ServiceSettings::default().conversion_url);
    }

    #[test]
    fn rejects_unknown_version() {
        let temp = tempfile::tempdir().expect("temp dir should be created");
        let store = Storage::with_root(temp.path());
        fs::write(store.settings_path(), r#"{ "version": 9, "settings": {} }"#)
            .expect("write should succeed");

        let err = store.load_settings().expect_err("version 9 is unknown");
        assert!(matches!(err, StorageError::UnsupportedVersion { found: 9 }));
    }
}
