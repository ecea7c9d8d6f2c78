use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One simulated completion. Created only when a download slot settles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub title: String,
    pub thumbnail: String,
    pub quality: String,
    /// Completion time, epoch milliseconds.
    pub timestamp: i64,
}

impl HistoryEntry {
    pub fn new(title: &str, thumbnail: &str, quality: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.to_string(),
            thumbnail: thumbnail.to_string(),
            quality: quality.to_string(),
            timestamp: Utc::now().timestamp_millis(),
        }
    }
}
