use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub acquire: AcquireSettings,
    pub simulator: SimulatorSettings,
    pub history: HistorySettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcquireSettings {
    pub api_key: String,
    pub model: String,
    pub api_base: String,
    /// Hard deadline on one acquisition request.
    pub deadline_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatorSettings {
    pub tick_ms: u64,
    pub settle_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistorySettings {
    pub store_path: PathBuf,
    pub limit: usize,
}

impl AcquireSettings {
    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.deadline_secs)
    }
}

impl SimulatorSettings {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            acquire: AcquireSettings {
                api_key: String::new(),
                model: "gemini-3-flash-preview".into(),
                api_base: "https://generativelanguage.googleapis.com".into(),
                deadline_secs: 45,
            },
            simulator: SimulatorSettings {
                tick_ms: 150,
                settle_ms: 500,
            },
            history: HistorySettings {
                store_path: default_store_path(),
                limit: 5,
            },
        }
    }
}

fn default_store_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("streampulse")
        .join("streampulse_downloads.json")
}
