use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use log::{debug, warn};

use crate::ui::settings::Settings;

const APP_DIR: &str = "yandere_shift";
const ENV_KEYS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

pub fn settings_path() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(APP_DIR);
    path.push("settings.json");
    path
}

/// Missing or unreadable files fall back to defaults.
pub fn load_settings_from(path: &Path) -> Settings {
    match fs::read_to_string(path) {
        Ok(s) => serde_json::from_str(&s).unwrap_or_else(|e| {
            warn!("ignoring malformed settings at {}: {}", path.display(), e);
            Settings::default()
        }),
        Err(_) => {
            debug!("no settings at {}, using defaults", path.display());
            Settings::default()
        }
    }
}

pub fn save_settings_to(path: &Path, settings: &Settings) -> anyhow::Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating {}", dir.display()))?;
    }
    let json = serde_json::to_string_pretty(settings)?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// The first non-empty env key wins over whatever the file says.
pub fn apply_env_overrides<F>(mut settings: Settings, lookup: F) -> Settings
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(key) = ENV_KEYS
        .iter()
        .filter_map(|name| lookup(name))
        .find(|v| !v.trim().is_empty())
    {
        settings.api_key = Some(key);
    }
    settings
}
