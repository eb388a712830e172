//! WAV container header codec.
//!
//! Builds the standard 44-byte RIFF/WAVE PCM header. The two length fields
//! are zero in a fresh template and patched by [`WavHeader::finalize`] once
//! the payload size is known. Pure data; writing the bytes is the file
//! sink's job.

/// Size of the standard WAV RIFF header in bytes.
pub const WAV_HEADER_SIZE: usize = 44;

const PCM_FORMAT_CHUNK_SIZE: u32 = 16;
const PCM_FORMAT_TAG: u16 = 1;

/// In-memory form of the 44-byte PCM header.
///
/// Layout:
/// ```text
/// [0-3]    "RIFF"
/// [4-7]    overall_size = data_size + 44 - 8
/// [8-11]   "WAVE"
/// [12-15]  "fmt "
/// [16-19]  16 (PCM format chunk size)
/// [20-21]  1 (PCM format code)
/// [22-23]  channels
/// [24-27]  sample_rate
/// [28-31]  byte_rate = sample_rate * channels * bits_per_sample / 8
/// [32-33]  block_align = channels * bits_per_sample / 8
/// [34-35]  bits_per_sample
/// [36-39]  "data"
/// [40-43]  data_size
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavHeader {
    pub overall_size: u32,
    pub channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
    pub data_size: u32,
}

impl WavHeader {
    /// Header with format fields filled and both length fields zeroed.
    ///
    /// Fields that cannot be represented saturate.
    pub fn new_template(sample_rate: u32, channels: u16, bits_per_sample: u16) -> Self {
        let block_align = channels.saturating_mul(bits_per_sample / 8);
        Self {
            overall_size: 0,
            channels,
            sample_rate,
            byte_rate: sample_rate.saturating_mul(block_align as u32),
            block_align,
            bits_per_sample,
            data_size: 0,
        }
    }

    /// Copy of `self` with the length fields set for `total_payload_bytes`.
    ///
    /// Sizes beyond `u32` saturate; a RIFF file cannot describe more.
    pub fn finalize(self, total_payload_bytes: u64) -> Self {
        let data_size = u32::try_from(total_payload_bytes).unwrap_or(u32::MAX);
        let overall = total_payload_bytes + WAV_HEADER_SIZE as u64 - 8;
        Self {
            data_size,
            overall_size: u32::try_from(overall).unwrap_or(u32::MAX),
            ..self
        }
    }

    pub fn to_bytes(&self) -> [u8; WAV_HEADER_SIZE] {
        let mut header = [0u8; WAV_HEADER_SIZE];

        // RIFF chunk descriptor
        header[0..4].copy_from_slice(b"RIFF");
        header[4..8].copy_from_slice(&self.overall_size.to_le_bytes());
        header[8..12].copy_from_slice(b"WAVE");

        // fmt sub-chunk
        header[12..16].copy_from_slice(b"fmt ");
        header[16..20].copy_from_slice(&PCM_FORMAT_CHUNK_SIZE.to_le_bytes());
        header[20..22].copy_from_slice(&PCM_FORMAT_TAG.to_le_bytes());
        header[22..24].copy_from_slice(&self.channels.to_le_bytes());
        header[24..28].copy_from_slice(&self.sample_rate.to_le_bytes());
        header[28..32].copy_from_slice(&self.byte_rate.to_le_bytes());
        header[32..34].copy_from_slice(&self.block_align.to_le_bytes());
        header[34..36].copy_from_slice(&self.bits_per_sample.to_le_bytes());

        // data sub-chunk
        header[36..40].copy_from_slice(b"data");
        header[40..44].copy_from_slice(&self.data_size.to_le_bytes());

        header
    }
}
