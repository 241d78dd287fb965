use std::{fs, path::Path, time::Duration};

use serde::Deserialize;
use storage::DEFAULT_DATABASE_URL;
use tracing::warn;
use tracker_core::{animation::COUNTER_DURATION, FlyToOptions, MapSettings, STORAGE_KEY};

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub database_url: String,
    pub storage_key: String,
    pub fly_to: FlyToOptions,
    pub counter_duration: Duration,
    pub map: MapSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.into(),
            storage_key: STORAGE_KEY.into(),
            fly_to: FlyToOptions::default(),
            counter_duration: COUNTER_DURATION,
            map: MapSettings::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    database_url: Option<String>,
    storage_key: Option<String>,
    fly_to_zoom: Option<u8>,
    fly_to_duration_ms: Option<u64>,
    counter_duration_ms: Option<u64>,
    map_zoom: Option<u8>,
    tile_url: Option<String>,
}

pub fn load_settings(config_path: &Path) -> Settings {
    load_settings_with(config_path, |name| std::env::var(name).ok())
}

/// Defaults, then the TOML file, then environment variables.
fn load_settings_with(config_path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(config_path) {
        match toml::from_str::<FileSettings>(&raw) {
            Ok(file_cfg) => apply_file_settings(&mut settings, file_cfg),
            Err(error) => warn!(
                path = %config_path.display(),
                %error,
                "ignoring unparsable config file"
            ),
        }
    }

    if let Some(v) = env("DATABASE_URL") {
        settings.database_url = v;
    }
    if let Some(v) = env("APP__DATABASE_URL") {
        settings.database_url = v;
    }

    if let Some(v) = env("APP__STORAGE_KEY") {
        settings.storage_key = v;
    }

    if let Some(v) = env("APP__FLY_TO_ZOOM") {
        if let Ok(parsed) = v.parse::<u8>() {
            settings.fly_to.zoom = parsed;
        }
    }

    if let Some(v) = env("APP__COUNTER_DURATION_MS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.counter_duration = Duration::from_millis(parsed);
        }
    }

    settings
}

fn apply_file_settings(settings: &mut Settings, file_cfg: FileSettings) {
    if let Some(v) = file_cfg.database_url {
        settings.database_url = v;
    }
    if let Some(v) = file_cfg.storage_key {
        settings.storage_key = v;
    }
    if let Some(v) = file_cfg.fly_to_zoom {
        settings.fly_to.zoom = v;
    }
    if let Some(v) = file_cfg.fly_to_duration_ms {
        settings.fly_to.duration = Duration::from_millis(v);
        settings.fly_to.animate = v > 0;
    }
    if let Some(v) = file_cfg.counter_duration_ms {
        settings.counter_duration = Duration::from_millis(v);
    }
    if let Some(v) = file_cfg.map_zoom {
        settings.map.zoom = v;
    }
    if let Some(v) = file_cfg.tile_url {
        settings.map.tile_url = v;
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
