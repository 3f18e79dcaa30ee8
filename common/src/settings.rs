use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::Result;

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Settings {
    #[serde(default = "default_master_volume")]
    pub master_volume: f32,
    #[serde(default = "default_music_volume")]
    pub music_volume: f32,
    #[serde(default = "default_sfx_volume")]
    pub sfx_volume: f32,
    #[serde(default = "default_enabled")]
    pub music_enabled: bool,
    #[serde(default = "default_enabled")]
    pub sfx_enabled: bool,
}

fn default_master_volume() -> f32 {
    1.0
}

fn default_music_volume() -> f32 {
    0.7
}

fn default_sfx_volume() -> f32 {
    0.8
}

fn default_enabled() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: default_master_volume(),
            music_volume: default_music_volume(),
            sfx_volume: default_sfx_volume(),
            music_enabled: default_enabled(),
            sfx_enabled: default_enabled(),
        }
    }
}

impl Settings {
    /// Clamps every volume into `[0, 1]`.
    pub fn clamped(mut self) -> Self {
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self.music_volume = self.music_volume.clamp(0.0, 1.0);
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
        self
    }

    pub fn effective_music_volume(&self) -> f32 {
        self.music_volume * self.master_volume
    }

    pub fn effective_sfx_volume(&self) -> f32 {
        self.sfx_volume * self.master_volume
    }

    /// Sets a value by its file key, e.g. `music_volume` or `sfx_enabled`.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "master_volume" => self.master_volume = value.parse::<f32>()?.clamp(0.0, 1.0),
            "music_volume" => self.music_volume = value.parse::<f32>()?.clamp(0.0, 1.0),
            "sfx_volume" => self.sfx_volume = value.parse::<f32>()?.clamp(0.0, 1.0),
            "music_enabled" => self.music_enabled = value.parse()?,
            "sfx_enabled" => self.sfx_enabled = value.parse()?,
            _ => return Err(format!("Unknown setting `{}`", key).into()),
        }
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }
}

impl FromStr for Settings {
    type Err = toml::de::Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let settings: Settings = toml::from_str(s)?;
        Ok(settings.clamped())
    }
}

/// Key-value persistence for [`Settings`].
pub trait SettingsStore {
    fn load(&self) -> Result<Settings>;
    fn save(&mut self, settings: &Settings) -> Result<()>;
}

/// Settings kept in a TOML file; a missing file reads as the defaults.
#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    pub fn new<T: AsRef<Path>>(path: T) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for FileSettingsStore {
    fn load(&self) -> Result<Settings> {
        if !self.path.exists() {
            return Ok(Settings::default());
        }

        let contents = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(err) => {
                log::error!("Could not read settings file `{}`", self.path.display());
                return Err(Box::new(err));
            }
        };

        match Settings::from_str(&contents) {
            Ok(settings) => Ok(settings),
            Err(err) => {
                log::error!("Unable to load settings from `{}`", self.path.display());
                Err(Box::new(err))
            }
        }
    }

    fn save(&mut self, settings: &Settings) -> Result<()> {
        std::fs::write(&self.path, settings.to_toml()?)?;
        Ok(())
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemorySettingsStore {
    pub settings: Option<Settings>,
    pub saves: usize,
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self) -> Result<Settings> {
        Ok(self.settings.clone().unwrap_or_default())
    }

    fn save(&mut self, settings: &Settings) -> Result<()> {
        self.settings = Some(settings.clone());
        self.saves += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_shipped_mix() {
        let settings = Settings::default();
        assert_eq!(settings.master_volume, 1.0);
        assert_eq!(settings.music_volume, 0.7);
        assert_eq!(settings.sfx_volume, 0.8);
        assert!(settings.music_enabled);
        assert!(settings.sfx_enabled);
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let settings = Settings::from_str("music_volume = 0.25\nsfx_enabled = false").unwrap();
        assert_eq!(settings.music_volume, 0.25);
        assert!(!settings.sfx_enabled);
        assert_eq!(settings.master_volume, 1.0);
    }

    #[test]
    fn volumes_are_clamped() {
        let settings = Settings::from_str("master_volume = 3.0\nsfx_volume = -1.0").unwrap();
        assert_eq!(settings.master_volume, 1.0);
        assert_eq!(settings.sfx_volume, 0.0);
    }

    #[test]
    fn set_by_key() {
        let mut settings = Settings::default();
        settings.set("music_volume", "0.5").unwrap();
        settings.set("music_enabled", "false").unwrap();
        settings.set("master_volume", "7").unwrap();

        assert_eq!(settings.music_volume, 0.5);
        assert!(!settings.music_enabled);
        assert_eq!(settings.master_volume, 1.0);
        assert!(settings.set("voice_volume", "1").is_err());
        assert!(settings.set("sfx_enabled", "maybe").is_err());
    }

    #[test]
    fn file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileSettingsStore::new(dir.path().join("settings.toml"));

        assert_eq!(store.load().unwrap(), Settings::default());

        let settings = Settings {
            sfx_volume: 0.5,
            music_enabled: false,
            ..Settings::default()
        };
        store.save(&settings).unwrap();

        assert_eq!(store.load().unwrap(), settings);
    }

    #[test]
    fn memory_store_counts_saves() {
        let mut store = MemorySettingsStore::default();
        store.save(&Settings::default()).unwrap();
        store.save(&Settings::default()).unwrap();
        assert_eq!(store.saves, 2);
    }
}
