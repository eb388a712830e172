use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::config::RecorderConfig;
use super::state::RecordingMode;

/// Summary of one finished recording attempt, returned by `stop`/`cancel`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingResult {
    pub id: String,
    pub mode: RecordingMode,
    /// Output path in file mode. `None` for streams and cancelled files.
    pub file_path: Option<PathBuf>,
    /// Payload bytes captured (excludes the container header).
    pub data_bytes: u64,
    pub frames: u64,
    pub duration_secs: f64,
    pub created_at: String,
    /// Failure that ended capture before stop was requested.
    pub error: Option<String>,
}

impl RecordingResult {
    pub(crate) fn new(
        config: &RecorderConfig,
        mode: RecordingMode,
        file_path: Option<PathBuf>,
        data_bytes: u64,
        frames: u64,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            mode,
            file_path,
            data_bytes,
            frames,
            duration_secs: data_bytes as f64 / config.byte_rate() as f64,
            created_at: chrono::Utc::now().to_rfc3339(),
            error: None,
        }
    }
}
