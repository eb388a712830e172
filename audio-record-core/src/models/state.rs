use serde::{Deserialize, Serialize};

/// Recording session state machine.
///
/// State transitions:
/// ```text
/// idle → starting → recording ↔ paused
///   ↑       │           │          │
///   └───────┴───────────┴──────────┘  (release / stop)
/// ```
///
/// `Starting` is the reservation held while the device and output file are
/// being opened. Queries treat it as neither recording nor paused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureState {
    Idle,
    Starting,
    Recording,
    Paused,
}

impl CaptureState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_recording(&self) -> bool {
        matches!(self, Self::Recording)
    }

    pub fn is_paused(&self) -> bool {
        matches!(self, Self::Paused)
    }

    /// Whether a capture thread may be running (recording or paused).
    pub fn is_live(&self) -> bool {
        matches!(self, Self::Recording | Self::Paused)
    }
}

/// Where captured frames go for the lifetime of one recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordingMode {
    File,
    Stream,
}
