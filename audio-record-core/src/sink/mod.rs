//! Destinations for captured frames.

pub mod file_sink;
pub mod stream_sink;

use crate::models::error::CaptureError;

pub use file_sink::WavFileSink;
pub use stream_sink::StreamSink;

/// The active output strategy of one recording.
pub enum FrameSink {
    File(WavFileSink),
    Stream(StreamSink),
}

impl FrameSink {
    /// Route one captured frame.
    pub fn accept(&mut self, frame: &[u8]) -> Result<(), CaptureError> {
        match self {
            Self::File(sink) => sink.write_frame(frame),
            Self::Stream(sink) => {
                sink.send_frame(frame);
                Ok(())
            }
        }
    }
}
