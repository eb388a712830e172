use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{Receiver, Sender};
use parking_lot::Mutex;

use crate::models::audio_models::{Amplitude, AudioChunk, InputDevice};
use crate::models::config::RecorderConfig;
use crate::models::error::CaptureError;
use crate::models::recording_result::RecordingResult;
use crate::models::state::{CaptureState, RecordingMode};
use crate::processing::wav_format::WavHeader;
use crate::session::capture_loop::{self, CaptureOutcome};
use crate::session::controller::SessionController;
use crate::sink::{FrameSink, StreamSink, WavFileSink};
use crate::traits::frame_source::{CaptureDevice, FrameSource};

/// Encoders this recorder can produce.
const SUPPORTED_ENCODERS: &[&str] = &["wav", "pcm16bits"];

/// One running recording attempt, owned by the recorder between start and stop.
struct ActiveRecording {
    mode: RecordingMode,
    file_path: Option<PathBuf>,
    handle: thread::JoinHandle<Option<CaptureOutcome>>,
}

/// Reusable capture session.
///
/// Generic over the frame source backend. Runs at most one recording at a
/// time; each start/stop pair is independent of the previous one.
///
/// Data flow:
/// ```text
/// [FrameSource] → connect → [CaptureDevice] ─┐
///                                             ├→ capture thread ─→ [WavFileSink]  (file mode)
/// [SessionController] pause/stop signals ─────┘                 └→ [StreamSink] → channel → consumer
/// ```
///
/// Every method takes `&self`; wrap the recorder in an `Arc` to drive it from
/// several threads. Start, stop, cancel and dispose are serialized; pause,
/// resume and the queries only touch the controller.
///
/// `stop` joins the capture thread without a timeout. A device read that
/// never returns blocks `stop` for as long.
pub struct Recorder<S: FrameSource> {
    source: S,
    config: RecorderConfig,
    controller: Arc<SessionController>,
    active: Mutex<Option<ActiveRecording>>,
    chunk_tx: Mutex<Option<Sender<AudioChunk>>>,
}

impl<S: FrameSource> Recorder<S> {
    pub fn new(source: S, config: RecorderConfig) -> Result<Self, CaptureError> {
        config.validate()?;
        Ok(Self {
            source,
            config,
            controller: Arc::new(SessionController::new()),
            active: Mutex::new(None),
            chunk_tx: Mutex::new(None),
        })
    }

    pub fn config(&self) -> &RecorderConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Register the consumer of streamed chunks.
    ///
    /// Replaces any previous subscription; a stream already running keeps
    /// delivering to the receiver it started with.
    pub fn subscribe(&self) -> Receiver<AudioChunk> {
        let (tx, rx) = crossbeam_channel::unbounded();
        *self.chunk_tx.lock() = Some(tx);
        rx
    }

    /// Start recording to a WAV file at `path`, truncating any existing file.
    pub fn start_file(&self, path: impl AsRef<Path>) -> Result<(), CaptureError> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(CaptureError::InvalidArgument("output path is empty".into()));
        }
        self.start(RecordingMode::File, Some(path.to_path_buf()))
    }

    /// Start streaming chunks to the subscribed receiver.
    pub fn start_stream(&self) -> Result<(), CaptureError> {
        self.start(RecordingMode::Stream, None)
    }

    /// Stop the recording, join the capture thread and release the device.
    ///
    /// Returns `Ok(None)` when nothing was recording; that call does no I/O.
    pub fn stop(&self) -> Result<Option<RecordingResult>, CaptureError> {
        let mut active = self.active.lock();
        let was_recording = self.controller.request_stop();
        let Some(recording) = active.take() else {
            return Ok(None);
        };
        if !was_recording {
            log::debug!("joining capture thread of a session already marked idle");
        }

        let result = self.finish(recording)?;
        log::info!(
            "recording {} stopped: {} frames, {} bytes",
            result.id,
            result.frames,
            result.data_bytes
        );
        Ok(Some(result))
    }

    /// Stop the recording and delete its output file, if any.
    pub fn cancel(&self) -> Result<Option<RecordingResult>, CaptureError> {
        let mut active = self.active.lock();
        self.controller.request_stop();
        let Some(recording) = active.take() else {
            return Ok(None);
        };

        let file_path = recording.file_path.clone();
        let finished = self.finish(recording);

        if let Some(path) = file_path {
            match fs::remove_file(&path) {
                Ok(()) => log::info!("recording cancelled, removed {}", path.display()),
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => {
                    if let Err(finish_err) = &finished {
                        log::error!("cancelled recording also failed to finish: {}", finish_err);
                    }
                    return Err(CaptureError::file_io("failed to remove cancelled recording", e));
                }
            }
        }

        let mut result = finished?;
        result.file_path = None;
        Ok(Some(result))
    }

    pub fn pause(&self) -> Result<(), CaptureError> {
        self.controller.request_pause()?;
        log::debug!("recording paused");
        Ok(())
    }

    pub fn resume(&self) -> Result<(), CaptureError> {
        self.controller.request_resume()?;
        log::debug!("recording resumed");
        Ok(())
    }

    /// Force-stop any recording and drop the chunk subscription.
    ///
    /// Safe to call at any time, including repeatedly.
    pub fn dispose(&self) -> Result<(), CaptureError> {
        let stopped = self.stop();
        self.chunk_tx.lock().take();
        if let Ok(Some(result)) = &stopped {
            log::info!("recorder disposed while recording {}", result.id);
        }
        stopped.map(|_| ())
    }

    // --- Queries ---

    pub fn state(&self) -> CaptureState {
        self.controller.state()
    }

    /// Mode of the live recording, if any.
    pub fn mode(&self) -> Option<RecordingMode> {
        self.controller.mode()
    }

    /// Recording and not paused. Reports `false` once the capture thread has
    /// faulted, even before `stop` is called.
    pub fn is_recording(&self) -> bool {
        self.controller.is_active_not_paused()
    }

    pub fn is_paused(&self) -> bool {
        self.controller.is_paused()
    }

    pub fn amplitude(&self) -> Amplitude {
        self.controller.amplitude()
    }

    /// Failure that ended the latest recording's capture loop, if any.
    pub fn last_error(&self) -> Option<CaptureError> {
        self.controller.fault()
    }

    pub fn list_input_devices(&self) -> Vec<InputDevice> {
        self.source.list_devices()
    }

    pub fn has_permission(&self) -> bool {
        self.source.has_permission()
    }

    pub fn is_encoder_supported(encoder: &str) -> bool {
        SUPPORTED_ENCODERS.contains(&encoder)
    }

    // --- Internal helpers ---

    fn start(&self, mode: RecordingMode, file_path: Option<PathBuf>) -> Result<(), CaptureError> {
        let mut active = self.active.lock();
        self.controller.try_begin(mode)?;

        match self.launch(mode, file_path) {
            Ok(recording) => {
                match &recording.file_path {
                    Some(path) => log::info!("recording to {}", path.display()),
                    None => log::info!("streaming recording started"),
                }
                *active = Some(recording);
                Ok(())
            }
            Err(e) => {
                self.controller.release();
                log::warn!("failed to start {:?} recording: {}", mode, e);
                Err(e)
            }
        }
    }

    /// Connect the device, open the sink and spawn the capture thread.
    ///
    /// Device first, file second, so a file failure never leaks a device.
    fn launch(&self, mode: RecordingMode, file_path: Option<PathBuf>) -> Result<ActiveRecording, CaptureError> {
        let device = self.source.connect(&self.config.sample_spec())?;

        let sink = match self.open_sink(mode, file_path.as_deref()) {
            Ok(sink) => sink,
            Err(e) => {
                device.disconnect();
                return Err(e);
            }
        };

        if let Err(e) = self.controller.commit() {
            abandon(device, sink, file_path.as_deref());
            return Err(e);
        }

        // The device and sink wait in a slot the thread empties on entry, so a
        // failed spawn can still hand them back for a full rollback.
        let slot = Arc::new(Mutex::new(Some((device, sink))));
        let controller = Arc::clone(&self.controller);
        let frame_bytes = self.config.frame_bytes;
        let thread_slot = Arc::clone(&slot);
        let spawned = thread::Builder::new()
            .name("record-capture".into())
            .spawn(move || {
                let (device, sink) = thread_slot.lock().take()?;
                Some(capture_loop::run(&controller, device, sink, frame_bytes))
            });

        let handle = match spawned {
            Ok(handle) => handle,
            Err(e) => {
                if let Some((device, sink)) = slot.lock().take() {
                    abandon(device, sink, file_path.as_deref());
                }
                return Err(CaptureError::Thread(format!("failed to spawn capture thread: {}", e)));
            }
        };

        Ok(ActiveRecording {
            mode,
            file_path,
            handle,
        })
    }

    fn open_sink(&self, mode: RecordingMode, file_path: Option<&Path>) -> Result<FrameSink, CaptureError> {
        match (mode, file_path) {
            (RecordingMode::File, Some(path)) => {
                let header = WavHeader::new_template(
                    self.config.sample_rate,
                    self.config.channels,
                    self.config.bit_depth,
                );
                Ok(FrameSink::File(WavFileSink::create(path, header)?))
            }
            (RecordingMode::File, None) => Err(CaptureError::InvalidArgument("output path is required".into())),
            (RecordingMode::Stream, _) => {
                let tx = self.chunk_tx.lock().clone().ok_or_else(|| {
                    CaptureError::InvalidArgument("no chunk subscriber; call subscribe() first".into())
                })?;
                Ok(FrameSink::Stream(StreamSink::new(tx)))
            }
        }
    }

    /// Join the capture thread, finalize the sink and disconnect the device.
    fn finish(&self, recording: ActiveRecording) -> Result<RecordingResult, CaptureError> {
        let outcome = recording
            .handle
            .join()
            .map_err(|_| CaptureError::Thread("capture thread panicked".into()))?
            .ok_or_else(|| CaptureError::Thread("capture thread started without a device".into()))?;
        let CaptureOutcome {
            device,
            sink,
            frames,
            error,
        } = outcome;

        let finalized = match sink {
            FrameSink::File(file_sink) => file_sink.finalize(),
            FrameSink::Stream(stream_sink) => Ok(stream_sink.bytes_sent()),
        };
        device.disconnect();

        let data_bytes = finalized.map_err(|e| {
            log::error!("failed to finalize recording: {}", e);
            e
        })?;

        let mut result = RecordingResult::new(&self.config, recording.mode, recording.file_path, data_bytes, frames);
        result.error = error.map(|e| e.to_string());
        Ok(result)
    }
}

impl<S: FrameSource> Drop for Recorder<S> {
    fn drop(&mut self) {
        if let Err(e) = self.dispose() {
            log::error!("failed to stop recording on drop: {}", e);
        }
    }
}

/// Undo a partially started recording.
fn abandon(device: Box<dyn CaptureDevice>, sink: FrameSink, file_path: Option<&Path>) {
    drop(sink);
    device.disconnect();
    if let Some(path) = file_path {
        let _ = fs::remove_file(path);
    }
}
