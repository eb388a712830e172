//! 16-bit PCM helpers: sample conversion and level metering.

use crate::models::audio_models::AMPLITUDE_FLOOR_DBFS;

/// Iterate the signed 16-bit little-endian samples in `bytes`.
///
/// A trailing odd byte is ignored.
pub fn samples(bytes: &[u8]) -> impl Iterator<Item = i16> + '_ {
    bytes.chunks_exact(2).map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
}

/// Convert f32 samples `[-1.0, 1.0]` to 16-bit PCM (little-endian bytes).
///
/// Clamps out-of-range values. Output length = `samples.len() * 2` bytes.
pub fn encode_pcm16(samples: &[f32]) -> Vec<u8> {
    let mut data = Vec::with_capacity(samples.len() * 2);
    for &sample in samples {
        let clamped = sample.clamp(-1.0, 1.0);
        let int16_value = (clamped * i16::MAX as f32) as i16;
        data.extend_from_slice(&int16_value.to_le_bytes());
    }
    data
}

/// Peak absolute level of a PCM frame, normalised to 0.0–1.0.
pub fn peak_level(bytes: &[u8]) -> f32 {
    samples(bytes)
        .map(|s| (s as f32).abs() / i16::MAX as f32)
        .fold(0.0f32, f32::max)
        .min(1.0)
}

/// Convert a linear 0.0–1.0 level to dBFS, clamped to the metering floor.
pub fn to_dbfs(level: f32) -> f64 {
    if level <= 0.0 {
        return AMPLITUDE_FLOOR_DBFS;
    }
    (20.0 * (level as f64).log10()).max(AMPLITUDE_FLOOR_DBFS)
}
