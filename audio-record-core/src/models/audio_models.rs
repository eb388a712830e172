use serde::{Deserialize, Serialize};

/// Level reported when nothing has been captured yet.
pub const AMPLITUDE_FLOOR_DBFS: f64 = -160.0;

/// Input level metering in dBFS.
///
/// `current` is the peak of the latest captured frame, `max` the loudest
/// frame of the current recording.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Amplitude {
    pub current: f64,
    pub max: f64,
}

impl Amplitude {
    pub(crate) fn record(&mut self, level_dbfs: f64) {
        self.current = level_dbfs;
        if level_dbfs > self.max {
            self.max = level_dbfs;
        }
    }
}

impl Default for Amplitude {
    fn default() -> Self {
        Self {
            current: AMPLITUDE_FLOOR_DBFS,
            max: AMPLITUDE_FLOOR_DBFS,
        }
    }
}

/// An audio input device a frame source can capture from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputDevice {
    pub id: String,
    pub label: String,
    pub is_default: bool,
}

/// One captured frame handed to a streaming consumer.
///
/// `sequence` starts at 0 for each recording and increases by one per frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioChunk {
    pub sequence: u64,
    pub data: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amplitude_tracks_running_max() {
        let mut amp = Amplitude::default();
        amp.record(-20.0);
        amp.record(-40.0);
        assert_eq!(amp.current, -40.0);
        assert_eq!(amp.max, -20.0);
    }
}
