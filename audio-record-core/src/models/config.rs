use crate::models::error::CaptureError;
use crate::traits::frame_source::SampleSpec;

/// Configuration for a recorder.
///
/// Fixed for the lifetime of a [`Recorder`](crate::Recorder); every recording
/// attempt uses the same PCM profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecorderConfig {
    /// Sample rate in Hz (default: 44100).
    pub sample_rate: u32,

    /// Number of interleaved channels (default: 2). Valid values: 1, 2.
    pub channels: u16,

    /// Bits per sample. Only 16-bit little-endian PCM is supported.
    pub bit_depth: u16,

    /// Bytes requested from the device per read (default: 4096).
    pub frame_bytes: usize,
}

impl RecorderConfig {
    pub fn validate(&self) -> Result<(), CaptureError> {
        if self.sample_rate == 0 {
            return Err(CaptureError::Configuration("sample rate must be positive".into()));
        }
        if ![1, 2].contains(&self.channels) {
            return Err(CaptureError::Configuration(format!(
                "unsupported channel count: {}",
                self.channels
            )));
        }
        if self.bit_depth != 16 {
            return Err(CaptureError::Configuration(format!(
                "unsupported bit depth: {}",
                self.bit_depth
            )));
        }
        let block_align = self.block_align();
        if self.sample_rate.checked_mul(block_align as u32).is_none() {
            return Err(CaptureError::Configuration(format!(
                "sample rate {} is too high for {} channels",
                self.sample_rate, self.channels
            )));
        }
        if self.frame_bytes == 0 || self.frame_bytes % block_align != 0 {
            return Err(CaptureError::Configuration(format!(
                "frame size {} is not a positive multiple of the block alignment {}",
                self.frame_bytes, block_align
            )));
        }
        Ok(())
    }

    /// Bytes per interleaved sample frame.
    pub fn block_align(&self) -> usize {
        self.channels as usize * (self.bit_depth as usize / 8)
    }

    /// Bytes per second of audio. Saturates for profiles `validate` rejects.
    pub fn byte_rate(&self) -> u32 {
        self.sample_rate.saturating_mul(self.block_align() as u32)
    }

    pub fn sample_spec(&self) -> SampleSpec {
        SampleSpec {
            sample_rate: self.sample_rate,
            channels: self.channels,
        }
    }
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            channels: 2,
            bit_depth: 16,
            frame_bytes: 4096,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_cd_quality_stereo() {
        let config = RecorderConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.block_align(), 4);
        assert_eq!(config.byte_rate(), 176_400);
    }

    #[test]
    fn rejects_unsupported_profiles() {
        let bad_channels = RecorderConfig { channels: 6, ..Default::default() };
        assert!(matches!(bad_channels.validate(), Err(CaptureError::Configuration(_))));

        let bad_depth = RecorderConfig { bit_depth: 24, ..Default::default() };
        assert!(matches!(bad_depth.validate(), Err(CaptureError::Configuration(_))));

        let bad_rate = RecorderConfig { sample_rate: 0, ..Default::default() };
        assert!(bad_rate.validate().is_err());
    }

    #[test]
    fn rejects_byte_rate_overflow() {
        let huge = RecorderConfig { sample_rate: 2_000_000_000, ..Default::default() };
        assert!(matches!(huge.validate(), Err(CaptureError::Configuration(_))));
        assert_eq!(huge.byte_rate(), u32::MAX);

        // Largest stereo rate whose byte rate still fits.
        let edge = RecorderConfig { sample_rate: u32::MAX / 4, ..Default::default() };
        assert!(edge.validate().is_ok());
    }

    #[test]
    fn frame_size_must_align_to_blocks() {
        let odd = RecorderConfig { frame_bytes: 4098, ..Default::default() };
        assert!(odd.validate().is_err());

        let mono = RecorderConfig { channels: 1, frame_bytes: 4098, ..Default::default() };
        assert!(mono.validate().is_ok());

        let empty = RecorderConfig { frame_bytes: 0, ..Default::default() };
        assert!(empty.validate().is_err());
    }
}
