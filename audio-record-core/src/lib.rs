//! # audio-record-core
//!
//! Platform-agnostic PCM capture session engine.
//!
//! A [`Recorder`] connects a [`FrameSource`], runs a background capture
//! thread, and routes fixed-size 16-bit PCM frames either into a WAV file or
//! onto a channel of [`AudioChunk`]s for a live consumer. Pause, resume,
//! stop and cancel are driven from the caller's thread.
//!
//! ## Architecture
//!
//! ```text
//! audio-record-core (this crate)
//! ├── traits/       ← FrameSource, CaptureDevice, ChunkConsumer
//! ├── models/       ← CaptureError, CaptureState, RecorderConfig, RecordingResult, Amplitude
//! ├── processing/   ← WAV header codec, PCM level metering
//! ├── sink/         ← WavFileSink, StreamSink
//! ├── session/      ← SessionController, capture loop, Recorder, ChunkDispatcher
//! └── commands      ← method-name command surface
//! ```

pub mod commands;
pub mod models;
pub mod processing;
pub mod session;
pub mod sink;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use commands::{dispatch, MethodError};
pub use models::audio_models::{Amplitude, AudioChunk, InputDevice, AMPLITUDE_FLOOR_DBFS};
pub use models::config::RecorderConfig;
pub use models::error::CaptureError;
pub use models::recording_result::RecordingResult;
pub use models::state::{CaptureState, RecordingMode};
pub use processing::wav_format::{WavHeader, WAV_HEADER_SIZE};
pub use session::controller::SessionController;
pub use session::dispatcher::ChunkDispatcher;
pub use session::recorder::Recorder;
pub use traits::chunk_consumer::ChunkConsumer;
pub use traits::frame_source::{CaptureDevice, FrameSource, SampleSpec};
