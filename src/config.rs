use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Deserialize, Default)]
pub struct WidgetConfig {
    /// Override for the shared store database written by the companion app.
    pub store_path:      Option<PathBuf>,
    /// Seconds between automatic reloads from the store.
    pub refresh_seconds: Option<u64>,
}

impl WidgetConfig {
    pub fn load() -> Result<Self> {
        let path = config_dir().join("config.toml");
        if path.exists() {
            Ok(toml::from_str(&std::fs::read_to_string(&path)?)?)
        } else {
            Ok(WidgetConfig::default())
        }
    }

    pub fn store_db_path(&self) -> PathBuf {
        self.store_path
            .clone()
            .unwrap_or_else(|| data_dir().join("tasks.db"))
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_seconds.unwrap_or(60))
    }
}

fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("taskwidget")
}

fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("taskwidget")
}
