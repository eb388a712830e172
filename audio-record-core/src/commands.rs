//! Method-name command surface.
//!
//! Maps the recorder's operations onto the method names and JSON values an
//! external message dispatcher (plugin channel, IPC bridge) exchanges. The
//! transport itself lives outside this crate.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::models::error::CaptureError;
use crate::models::recording_result::RecordingResult;
use crate::session::recorder::Recorder;
use crate::traits::frame_source::FrameSource;

/// Every method name [`dispatch`] understands.
pub const METHODS: &[&str] = &[
    "create",
    "dispose",
    "startRecordingFile",
    "stopRecordingFile",
    "startRecording",
    "stopRecording",
    "cancelRecording",
    "pauseRecording",
    "resumeRecording",
    "listInputDevices",
    "isEncoderSupported",
    "getAmplitude",
    "hasPermission",
    "isPaused",
    "isRecording",
];

/// Error reply carrying a stable code and a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{code}: {message}")]
pub struct MethodError {
    pub code: String,
    pub message: String,
}

impl MethodError {
    fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
        }
    }
}

impl From<CaptureError> for MethodError {
    fn from(e: CaptureError) -> Self {
        Self::new(e.code(), e.to_string())
    }
}

impl From<serde_json::Error> for MethodError {
    fn from(e: serde_json::Error) -> Self {
        Self::new("internal_error", e.to_string())
    }
}

/// Run `method` against `recorder`.
///
/// `args` is the method's single argument (`Value::Null` when absent).
pub fn dispatch<S: FrameSource>(recorder: &Recorder<S>, method: &str, args: &Value) -> Result<Value, MethodError> {
    log::trace!("dispatch {}", method);
    match method {
        "create" => Ok(Value::Null),
        "dispose" => {
            recorder.dispose()?;
            Ok(Value::Null)
        }
        "startRecordingFile" => {
            let path = args
                .as_str()
                .ok_or_else(|| MethodError::new("argument_error", "Expected path string"))?;
            recorder.start_file(path)?;
            Ok(Value::Null)
        }
        "stopRecordingFile" | "stopRecording" => Ok(stopped_path(recorder.stop()?)),
        "startRecording" => {
            recorder.start_stream()?;
            Ok(Value::Null)
        }
        "cancelRecording" => {
            recorder.cancel()?;
            Ok(Value::Null)
        }
        "pauseRecording" => {
            recorder.pause()?;
            Ok(Value::Null)
        }
        "resumeRecording" => {
            recorder.resume()?;
            Ok(Value::Null)
        }
        "listInputDevices" => Ok(serde_json::to_value(recorder.list_input_devices())?),
        "isEncoderSupported" => {
            let supported = args.as_str().map_or(false, Recorder::<S>::is_encoder_supported);
            Ok(Value::Bool(supported))
        }
        "getAmplitude" => Ok(serde_json::to_value(recorder.amplitude())?),
        "hasPermission" => Ok(Value::Bool(recorder.has_permission())),
        "isPaused" => Ok(Value::Bool(recorder.is_paused())),
        "isRecording" => Ok(Value::Bool(recorder.is_recording())),
        other => Err(MethodError::new("not_implemented", format!("unknown method: {}", other))),
    }
}

/// Output path of a stopped file recording, `null` otherwise.
fn stopped_path(result: Option<RecordingResult>) -> Value {
    result
        .and_then(|r| r.file_path)
        .map(|p| Value::String(p.to_string_lossy().into_owned()))
        .unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::RecorderConfig;
    use crate::traits::frame_source::{CaptureDevice, SampleSpec};
    use serde_json::json;
    use std::thread;
    use std::time::Duration;

    struct SilentDevice;

    impl CaptureDevice for SilentDevice {
        fn read_frame(&mut self, buffer: &mut [u8]) -> Result<usize, CaptureError> {
            thread::sleep(Duration::from_millis(1));
            buffer.fill(0);
            Ok(buffer.len())
        }
    }

    struct SilentSource;

    impl FrameSource for SilentSource {
        fn connect(&self, _spec: &SampleSpec) -> Result<Box<dyn CaptureDevice>, CaptureError> {
            Ok(Box::new(SilentDevice))
        }
    }

    fn recorder() -> Recorder<SilentSource> {
        Recorder::new(SilentSource, RecorderConfig::default()).unwrap()
    }

    #[test]
    fn file_round_trip_returns_path() {
        let recorder = recorder();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cmd.wav");
        let path_str = path.to_string_lossy().into_owned();

        assert_eq!(dispatch(&recorder, "startRecordingFile", &json!(path_str)), Ok(Value::Null));
        assert_eq!(dispatch(&recorder, "isRecording", &Value::Null), Ok(json!(true)));
        assert_eq!(dispatch(&recorder, "stopRecording", &Value::Null), Ok(json!(path_str)));
        assert_eq!(dispatch(&recorder, "isRecording", &Value::Null), Ok(json!(false)));
        assert!(path.exists());
    }

    #[test]
    fn start_file_requires_string_argument() {
        let recorder = recorder();
        let err = dispatch(&recorder, "startRecordingFile", &json!(42)).unwrap_err();
        assert_eq!(err.code, "argument_error");
    }

    #[test]
    fn second_start_reports_already_recording() {
        let recorder = recorder();
        let _chunks = recorder.subscribe();
        dispatch(&recorder, "startRecording", &Value::Null).unwrap();

        let err = dispatch(&recorder, "startRecording", &Value::Null).unwrap_err();
        assert_eq!(err.code, "already_recording");

        assert_eq!(dispatch(&recorder, "stopRecording", &Value::Null), Ok(Value::Null));
    }

    #[test]
    fn pause_while_idle_reports_not_recording() {
        let recorder = recorder();
        assert_eq!(dispatch(&recorder, "pauseRecording", &Value::Null).unwrap_err().code, "not_recording");
        assert_eq!(dispatch(&recorder, "resumeRecording", &Value::Null).unwrap_err().code, "not_recording");
    }

    #[test]
    fn queries_and_stubs() {
        let recorder = recorder();
        assert_eq!(dispatch(&recorder, "create", &Value::Null), Ok(Value::Null));
        assert_eq!(dispatch(&recorder, "listInputDevices", &Value::Null), Ok(json!([])));
        assert_eq!(dispatch(&recorder, "hasPermission", &Value::Null), Ok(json!(true)));
        assert_eq!(dispatch(&recorder, "isPaused", &Value::Null), Ok(json!(false)));
        assert_eq!(dispatch(&recorder, "isEncoderSupported", &json!("wav")), Ok(json!(true)));
        assert_eq!(dispatch(&recorder, "isEncoderSupported", &json!("opus")), Ok(json!(false)));
        assert_eq!(dispatch(&recorder, "isEncoderSupported", &Value::Null), Ok(json!(false)));
        assert_eq!(
            dispatch(&recorder, "getAmplitude", &Value::Null),
            Ok(json!({ "current": -160.0, "max": -160.0 }))
        );
        assert_eq!(dispatch(&recorder, "dispose", &Value::Null), Ok(Value::Null));
    }

    #[test]
    fn unknown_method() {
        let recorder = recorder();
        let err = dispatch(&recorder, "setVolume", &Value::Null).unwrap_err();
        assert_eq!(err.code, "not_implemented");
    }

    #[test]
    fn method_list_is_complete() {
        let recorder = recorder();
        for method in METHODS {
            let reply = dispatch(&recorder, method, &Value::Null);
            if let Err(e) = reply {
                assert_ne!(e.code, "not_implemented", "{} not dispatched", method);
            }
        }
    }
}
