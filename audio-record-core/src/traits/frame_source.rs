use crate::models::audio_models::InputDevice;
use crate::models::error::CaptureError;

/// PCM profile requested from a frame source.
///
/// Samples are always signed 16-bit little-endian, interleaved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleSpec {
    pub sample_rate: u32,
    pub channels: u16,
}

/// A connected capture device.
///
/// Owned by the capture thread while a recording runs and handed back to the
/// recorder when the thread exits.
pub trait CaptureDevice: Send {
    /// Block until `buffer` is filled with captured PCM and return the number
    /// of bytes written into it.
    ///
    /// Returning `Ok(0)` is treated as end of stream.
    fn read_frame(&mut self, buffer: &mut [u8]) -> Result<usize, CaptureError>;

    /// Release the device. The default implementation just drops it.
    ///
    /// The recorder calls this on every path it controls, but a device can
    /// still be dropped without it (a panicking capture thread, for one), so
    /// dropping must release the underlying stream as well.
    fn disconnect(self: Box<Self>) {}
}

/// Backend that opens capture devices.
///
/// Implemented by:
/// - `ToneSource` (synthetic sine wave)
/// - `CpalSource` (default system input, behind the `cpal` feature)
pub trait FrameSource: Send + Sync {
    /// Open the default input with the given PCM profile.
    fn connect(&self, spec: &SampleSpec) -> Result<Box<dyn CaptureDevice>, CaptureError>;

    /// Input devices this source can capture from.
    fn list_devices(&self) -> Vec<InputDevice> {
        Vec::new()
    }

    /// Whether the process is allowed to capture audio.
    fn has_permission(&self) -> bool {
        true
    }
}
