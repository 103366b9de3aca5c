use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Default)]
pub enum ThemePreference {
    #[default]
    System,
    Light,
    Dark,
}

impl ThemePreference {
    pub fn label(&self) -> &'static str {
        match self {
            ThemePreference::System => "System",
            ThemePreference::Light => "Light",
            ThemePreference::Dark => "Dark",
        }
    }

    pub fn all() -> [ThemePreference; 3] {
        [ThemePreference::System, ThemePreference::Light, ThemePreference::Dark]
    }
}

/// Persisted between sessions. Conversion results never are.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(default)]
pub struct AppSettings {
    pub theme_preference: ThemePreference,
    pub last_open_dir: Option<PathBuf>,
    pub last_save_dir: Option<PathBuf>,
}

impl AppSettings {
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    pub fn save(&self) {
        self.save_to(&Self::config_path());
    }

    /// Missing or unreadable files fall back to defaults.
    pub fn load_from(path: &Path) -> Self {
        let Ok(contents) = fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&contents).unwrap_or_else(|err| {
            log::warn!("Ignoring malformed settings at {}: {err}", path.display());
            Self::default()
        })
    }

    pub fn save_to(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        let written = serde_json::to_string_pretty(self)
            .map_err(std::io::Error::from)
            .and_then(|json| fs::write(path, json));
        if let Err(err) = written {
            log::warn!("Could not save settings to {}: {err}", path.display());
        }
    }

    pub fn remember_open_dir(&mut self, picked: &Path) {
        self.last_open_dir = picked.parent().map(Path::to_path_buf);
        self.save();
    }

    pub fn remember_save_dir(&mut self, saved: &Path) {
        self.last_save_dir = saved.parent().map(Path::to_path_buf);
        self.save();
    }

    fn config_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("webp_to_jpeg");
        path.push("app_settings.json");
        path
    }
}
