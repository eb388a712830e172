//! # audio-record-device
//!
//! Frame sources for audio-record-core.
//!
//! Provides:
//! - `ToneSource`: synthetic sine tone, paced to the sample clock
//! - `CpalSource`: microphone capture through cpal (feature `cpal`)
//!
//! ## Usage
//! ```ignore
//! use audio_record_core::{Recorder, RecorderConfig};
//! use audio_record_device::ToneSource;
//!
//! let recorder = Recorder::new(ToneSource::new(), RecorderConfig::default())?;
//! recorder.start_file("take.wav")?;
//! ```

#[cfg(feature = "cpal")]
pub mod cpal_source;
pub mod tone;

#[cfg(feature = "cpal")]
pub use cpal_source::CpalSource;
pub use tone::ToneSource;
