use std::fs::{self, File};
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::models::error::CaptureError;
use crate::processing::wav_format::{WavHeader, WAV_HEADER_SIZE};

/// Streaming WAV file writer.
///
/// ## File Format
///
/// ```text
/// [44-byte WAV header, length fields zero until finalize]
/// [raw interleaved 16-bit PCM data...]
/// ```
///
/// The file is only ever appended to, except for the header patch in
/// [`WavFileSink::finalize`]. Dropping the sink without finalizing leaves the
/// placeholder header in place.
pub struct WavFileSink {
    file_path: PathBuf,
    file: BufWriter<File>,
    header: WavHeader,
    data_bytes: u64,
}

impl WavFileSink {
    /// Create (or truncate) `path` and write the placeholder header.
    pub fn create(path: &Path, header: WavHeader) -> Result<Self, CaptureError> {
        let file = File::create(path).map_err(|e| CaptureError::file_io("failed to create file", e))?;
        let mut file = BufWriter::new(file);

        let written = file.write_all(&header.to_bytes()).and_then(|()| file.flush());
        if let Err(e) = written {
            drop(file);
            let _ = fs::remove_file(path);
            return Err(CaptureError::file_io("failed to write header", e));
        }

        Ok(Self {
            file_path: path.to_path_buf(),
            file,
            header,
            data_bytes: 0,
        })
    }

    /// Append one frame of payload.
    pub fn write_frame(&mut self, frame: &[u8]) -> Result<(), CaptureError> {
        self.file
            .write_all(frame)
            .map_err(|e| CaptureError::file_io("write failed", e))?;
        self.data_bytes += frame.len() as u64;
        Ok(())
    }

    /// Payload bytes written so far (excludes the header).
    pub fn data_bytes(&self) -> u64 {
        self.data_bytes
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Patch the header with the final sizes and close the file.
    ///
    /// Returns the payload byte count recorded in the header.
    pub fn finalize(mut self) -> Result<u64, CaptureError> {
        let header = self.header.finalize(self.data_bytes);

        self.file
            .seek(SeekFrom::Start(0))
            .map_err(|e| CaptureError::file_io("failed to seek to header", e))?;
        self.file
            .write_all(&header.to_bytes())
            .map_err(|e| CaptureError::file_io("failed to patch header", e))?;
        self.file
            .seek(SeekFrom::Start(WAV_HEADER_SIZE as u64 + self.data_bytes))
            .map_err(|e| CaptureError::file_io("failed to seek to end", e))?;
        self.file
            .flush()
            .map_err(|e| CaptureError::file_io("failed to flush", e))?;

        log::debug!(
            "finalized {} ({} payload bytes)",
            self.file_path.display(),
            self.data_bytes
        );
        Ok(self.data_bytes)
    }
}
