use thiserror::Error;

/// Errors returned by recorder operations.
///
/// Every public operation on [`Recorder`](crate::Recorder) returns one of
/// these instead of panicking. [`CaptureError::code`] gives the stable name
/// reported across the command surface.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("a recording session is already in progress")]
    AlreadyRecording,

    #[error("no active recording session")]
    NotRecording,

    #[error("failed to connect to capture device: {0}")]
    DeviceConnect(String),

    #[error("file i/o error: {0}")]
    FileIo(String),

    #[error("device read failed: {0}")]
    Read(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("capture thread error: {0}")]
    Thread(String),
}

impl CaptureError {
    /// Error name reported to external callers.
    pub fn code(&self) -> &'static str {
        match self {
            Self::AlreadyRecording => "already_recording",
            Self::NotRecording => "not_recording",
            Self::DeviceConnect(_) | Self::Read(_) => "device_error",
            Self::FileIo(_) => "file_io_error",
            Self::InvalidArgument(_) | Self::Configuration(_) => "argument_error",
            Self::Thread(_) => "internal_error",
        }
    }

    pub(crate) fn file_io(context: &str, err: std::io::Error) -> Self {
        Self::FileIo(format!("{context}: {err}"))
    }
}
