//! Persistent per-type generator settings.

use anyhow::{Context as _, Result};
use directories::ProjectDirs;
use mimic_core::{MimicSettings, MimicType};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Directory of `dns.json`, `quic.json` and `sip.json` settings files.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    dir: PathBuf,
}

impl SettingsStore {
    /// Store under the platform data directory.
    pub fn open_default() -> Result<Self> {
        let dirs = ProjectDirs::from("org", "mimicgen", "mimicgen")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;

        Ok(Self::at(dirs.data_dir()))
    }

    /// Store rooted at `dir`.
    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding the settings for `mimic_type`.
    pub fn path(&self, mimic_type: MimicType) -> PathBuf {
        self.dir.join(format!("{}.json", mimic_type.as_str()))
    }

    /// Load stored settings, falling back to the type's defaults.
    ///
    /// A file that is not a valid settings object is logged and ignored.
    pub fn load(&self, mimic_type: MimicType) -> Result<MimicSettings> {
        let path = self.path(mimic_type);

        if !path.exists() {
            debug!(path = %path.display(), "no stored settings, using defaults");
            return Ok(MimicSettings::default_for(mimic_type));
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let Some(mut settings) = MimicSettings::from_json(&content) else {
            warn!(path = %path.display(), "stored settings are malformed, using defaults");
            return Ok(MimicSettings::default_for(mimic_type));
        };

        if settings.mimic_type != mimic_type {
            warn!(
                path = %path.display(),
                stored = %settings.mimic_type,
                "stored settings have the wrong type, correcting"
            );
            settings.mimic_type = mimic_type;
        }
        Ok(settings)
    }

    /// Save settings to the file for their type.
    pub fn save(&self, settings: &MimicSettings) -> Result<PathBuf> {
        let path = self.path(settings.mimic_type);

        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;

        let content = serde_json::to_string_pretty(settings)?;
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        debug!(path = %path.display(), "saved settings");
        Ok(path)
    }

    /// Delete stored settings; returns false if there were none.
    pub fn reset(&self, mimic_type: MimicType) -> Result<bool> {
        let path = self.path(mimic_type);

        if !path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(&path)
            .with_context(|| format!("Failed to remove {}", path.display()))?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_when_empty() {
        let dir = TempDir::new().unwrap();
        let store = SettingsStore::at(dir.path());
        for mimic_type in MimicType::ALL {
            assert_eq!(
                store.load(mimic_type).unwrap(),
                MimicSettings::default_for(mimic_type)
            );
        }
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let store = SettingsStore::at(dir.path().join("nested"));
        let settings = MimicSettings {
            quic_version: String::from("2"),
            itime_min: 200,
            ..MimicSettings::default_quic()
        };

        let path = store.save(&settings).unwrap();
        assert_eq!(path, dir.path().join("nested").join("quic.json"));
        assert_eq!(store.load(MimicType::Quic).unwrap(), settings);
        assert_eq!(
            store.load(MimicType::Sip).unwrap(),
            MimicSettings::default_sip()
        );
    }

    #[test]
    fn test_malformed_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let store = SettingsStore::at(dir.path());
        std::fs::write(store.path(MimicType::Dns), "{ not json").unwrap();

        assert_eq!(
            store.load(MimicType::Dns).unwrap(),
            MimicSettings::default_dns()
        );
    }

    #[test]
    fn test_type_follows_file_name() {
        let dir = TempDir::new().unwrap();
        let store = SettingsStore::at(dir.path());
        std::fs::write(
            store.path(MimicType::Sip),
            r#"{"type":"DNS","sipToUser":"carol"}"#,
        )
        .unwrap();

        let settings = store.load(MimicType::Sip).unwrap();
        assert_eq!(settings.mimic_type, MimicType::Sip);
        assert_eq!(settings.sip_to_user, "carol");
        assert_eq!(settings.sip_from_user, "alice");
    }

    #[test]
    fn test_reset() {
        let dir = TempDir::new().unwrap();
        let store = SettingsStore::at(dir.path());
        assert!(!store.reset(MimicType::Dns).unwrap());

        store.save(&MimicSettings::default_dns()).unwrap();
        assert!(store.reset(MimicType::Dns).unwrap());
        assert!(!store.path(MimicType::Dns).exists());
    }
}
