//! Synthetic sine-wave frame source.
//!
//! Produces a steady tone at the requested sample spec. Useful where no
//! capture hardware exists (CI, headless hosts) and for exercising the
//! recorder end to end.

use std::f32::consts::TAU;
use std::thread;
use std::time::{Duration, Instant};

use audio_record_core::processing::pcm;
use audio_record_core::{CaptureDevice, CaptureError, FrameSource, InputDevice, SampleSpec};

/// Sine tone generator.
#[derive(Debug, Clone)]
pub struct ToneSource {
    frequency: f32,
    level: f32,
    realtime: bool,
    max_frames: Option<u64>,
}

impl ToneSource {
    /// A 440 Hz tone at half scale, paced to the sample clock.
    pub fn new() -> Self {
        Self {
            frequency: 440.0,
            level: 0.5,
            realtime: true,
            max_frames: None,
        }
    }

    pub fn with_frequency(mut self, hz: f32) -> Self {
        self.frequency = hz;
        self
    }

    /// Peak level as a fraction of full scale, clamped to `0.0..=1.0`.
    pub fn with_level(mut self, level: f32) -> Self {
        self.level = level.clamp(0.0, 1.0);
        self
    }

    /// Generate as fast as the reader asks instead of sleeping to the clock.
    pub fn unpaced(mut self) -> Self {
        self.realtime = false;
        self
    }

    /// End the stream after `frames` reads; the next read reports end of stream.
    pub fn with_frame_limit(mut self, frames: u64) -> Self {
        self.max_frames = Some(frames);
        self
    }

    fn device_label(&self) -> String {
        format!("Sine tone {} Hz", self.frequency)
    }
}

impl Default for ToneSource {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameSource for ToneSource {
    fn connect(&self, spec: &SampleSpec) -> Result<Box<dyn CaptureDevice>, CaptureError> {
        if spec.sample_rate == 0 || spec.channels == 0 {
            return Err(CaptureError::DeviceConnect(format!(
                "unsupported sample spec: {} Hz, {} channels",
                spec.sample_rate, spec.channels
            )));
        }
        log::debug!(
            "tone source connected: {} Hz tone at {} Hz x{}",
            self.frequency,
            spec.sample_rate,
            spec.channels
        );
        Ok(Box::new(ToneDevice {
            spec: *spec,
            step: TAU * self.frequency / spec.sample_rate as f32,
            level: self.level,
            realtime: self.realtime,
            max_frames: self.max_frames,
            phase: 0.0,
            frames_read: 0,
            samples_per_channel: 0,
            started: Instant::now(),
        }))
    }

    fn list_devices(&self) -> Vec<InputDevice> {
        vec![InputDevice {
            id: "tone".into(),
            label: self.device_label(),
            is_default: true,
        }]
    }
}

struct ToneDevice {
    spec: SampleSpec,
    step: f32,
    level: f32,
    realtime: bool,
    max_frames: Option<u64>,
    phase: f32,
    frames_read: u64,
    samples_per_channel: u64,
    started: Instant,
}

impl ToneDevice {
    /// Sleep until the wall clock catches up with the samples produced so far.
    fn pace(&self) {
        let due = Duration::from_secs_f64(self.samples_per_channel as f64 / self.spec.sample_rate as f64);
        if let Some(wait) = due.checked_sub(self.started.elapsed()) {
            thread::sleep(wait);
        }
    }
}

impl CaptureDevice for ToneDevice {
    fn read_frame(&mut self, buffer: &mut [u8]) -> Result<usize, CaptureError> {
        if self.max_frames.is_some_and(|limit| self.frames_read >= limit) {
            return Ok(0);
        }

        let channels = self.spec.channels as usize;
        let per_channel = buffer.len() / 2 / channels;
        let mut samples = Vec::with_capacity(per_channel * channels);
        for _ in 0..per_channel {
            let value = self.phase.sin() * self.level;
            samples.extend(std::iter::repeat(value).take(channels));
            self.phase = (self.phase + self.step) % TAU;
        }

        let encoded = pcm::encode_pcm16(&samples);
        buffer[..encoded.len()].copy_from_slice(&encoded);
        // Trailing bytes that do not make up a whole sample frame stay silent.
        buffer[encoded.len()..].fill(0);

        self.samples_per_channel += per_channel as u64;
        self.frames_read += 1;
        if self.realtime {
            self.pace();
        }
        Ok(buffer.len())
    }

    fn disconnect(self: Box<Self>) {
        log::debug!("tone source disconnected after {} frames", self.frames_read);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn stereo() -> SampleSpec {
        SampleSpec {
            sample_rate: 44100,
            channels: 2,
        }
    }

    #[test]
    fn fills_whole_frame_with_tone() {
        let mut device = ToneSource::new().unpaced().connect(&stereo()).unwrap();
        let mut frame = vec![0u8; 4096];
        assert_eq!(device.read_frame(&mut frame).unwrap(), 4096);

        let peak = pcm::peak_level(&frame);
        assert!(peak > 0.4 && peak <= 0.5, "peak was {}", peak);
    }

    #[test]
    fn channels_carry_identical_samples() {
        let mut device = ToneSource::new().unpaced().connect(&stereo()).unwrap();
        let mut frame = vec![0u8; 1024];
        device.read_frame(&mut frame).unwrap();

        let samples: Vec<i16> = pcm::samples(&frame).collect();
        for pair in samples.chunks(2) {
            assert_eq!(pair[0], pair[1]);
        }
    }

    #[test]
    fn silent_level_reads_as_floor() {
        let mut device = ToneSource::new().with_level(0.0).unpaced().connect(&stereo()).unwrap();
        let mut frame = vec![0u8; 512];
        device.read_frame(&mut frame).unwrap();
        assert_eq!(pcm::to_dbfs(pcm::peak_level(&frame)), -160.0);
    }

    #[test]
    fn frame_limit_ends_stream() {
        let mut device = ToneSource::new().unpaced().with_frame_limit(2).connect(&stereo()).unwrap();
        let mut frame = vec![0u8; 256];
        assert_eq!(device.read_frame(&mut frame).unwrap(), 256);
        assert_eq!(device.read_frame(&mut frame).unwrap(), 256);
        assert_eq!(device.read_frame(&mut frame).unwrap(), 0);
    }

    #[test]
    fn paced_reads_follow_sample_clock() {
        let spec = SampleSpec {
            sample_rate: 8000,
            channels: 1,
        };
        let mut device = ToneSource::new().connect(&spec).unwrap();
        // 800 samples at 8 kHz is 100 ms.
        let mut frame = vec![0u8; 1600];
        let started = Instant::now();
        device.read_frame(&mut frame).unwrap();
        let elapsed = started.elapsed().as_secs_f64();
        assert_abs_diff_eq!(elapsed, 0.1, epsilon = 0.08);
        assert!(elapsed >= 0.09);
    }

    #[test]
    fn rejects_empty_spec() {
        let spec = SampleSpec {
            sample_rate: 0,
            channels: 2,
        };
        let err = ToneSource::new().connect(&spec).err().unwrap();
        assert_eq!(err.code(), "device_error");
    }

    #[test]
    fn lists_one_default_device() {
        let devices = ToneSource::new().with_frequency(1000.0).list_devices();
        assert_eq!(devices.len(), 1);
        assert!(devices[0].is_default);
        assert_eq!(devices[0].label, "Sine tone 1000 Hz");
    }
}
