use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const MIN_INTERVAL_MINUTES: u32 = 1;
pub const MAX_INTERVAL_MINUTES: u32 = 180;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Minutes between reminders
    #[serde(rename = "interval")]
    pub interval_minutes: u32,

    /// Start reminding as soon as the window opens
    pub auto_start: bool,

    /// Minimize instead of quitting when the window is closed
    pub minimize_to_tray: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            interval_minutes: 30,
            auto_start: false,
            minimize_to_tray: true,
        }
    }
}

impl Settings {
    pub fn settings_dir() -> Result<PathBuf> {
        let home = std::env::var("HOME").context("HOME environment variable not set")?;
        Ok(PathBuf::from(home).join(".config/standup"))
    }

    pub fn settings_path() -> Result<PathBuf> {
        Ok(Self::settings_dir()?.join("settings.json"))
    }

    /// Reads settings from `path`. A missing file yields defaults; a file that
    /// exists but can't be read or parsed is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;

        let settings: Settings = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings file {}", path.display()))?;

        Ok(settings.normalized())
    }

    /// Like [`Settings::load`], but falls back to defaults. The error, if any,
    /// is handed back so the caller can report it.
    pub fn load_or_default(path: &Path) -> (Self, Option<anyhow::Error>) {
        match Self::load(path) {
            Ok(settings) => (settings, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).context("Failed to create settings directory")?;
        }

        let content = serde_json::to_string_pretty(self).context("Failed to serialize settings")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write settings file {}", path.display()))?;

        Ok(())
    }

    pub fn interval(&self) -> chrono::Duration {
        chrono::Duration::minutes(i64::from(self.interval_minutes))
    }

    pub fn set_interval_minutes(&mut self, minutes: u32) {
        self.interval_minutes = minutes.clamp(MIN_INTERVAL_MINUTES, MAX_INTERVAL_MINUTES);
    }

    pub fn step_interval(&mut self, delta: i32) {
        let stepped = self.interval_minutes.saturating_add_signed(delta);
        self.set_interval_minutes(stepped);
    }

    fn normalized(mut self) -> Self {
        self.set_interval_minutes(self.interval_minutes);
        self
    }
}
