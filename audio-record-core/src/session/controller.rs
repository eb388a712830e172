use parking_lot::{Condvar, Mutex};

use crate::models::audio_models::Amplitude;
use crate::models::error::CaptureError;
use crate::models::state::{CaptureState, RecordingMode};
use crate::session::capture_loop::LoopPhase;

/// Fields shared between the recorder and its capture thread.
struct SharedState {
    state: CaptureState,
    mode: Option<RecordingMode>,
    fault: Option<CaptureError>,
    amplitude: Amplitude,
}

impl SharedState {
    /// Live and still backed by a running capture loop.
    fn accepts_control(&self) -> bool {
        self.state.is_live() && self.fault.is_none()
    }
}

/// Single source of truth for whether a capture is in progress.
///
/// One lock guards every field; one condition variable wakes the capture
/// thread out of a pause, both on resume and on stop. Waiters re-check the
/// state after every wake.
pub struct SessionController {
    shared: Mutex<SharedState>,
    signal: Condvar,
}

impl SessionController {
    pub fn new() -> Self {
        Self {
            shared: Mutex::new(SharedState {
                state: CaptureState::Idle,
                mode: None,
                fault: None,
                amplitude: Amplitude::default(),
            }),
            signal: Condvar::new(),
        }
    }

    /// Reserve the session for a new recording. Transitions: idle → starting.
    ///
    /// Clears the fault and meter left by the previous attempt.
    pub fn try_begin(&self, mode: RecordingMode) -> Result<(), CaptureError> {
        let mut shared = self.shared.lock();
        if !shared.state.is_idle() {
            return Err(CaptureError::AlreadyRecording);
        }
        shared.state = CaptureState::Starting;
        shared.mode = Some(mode);
        shared.fault = None;
        shared.amplitude = Amplitude::default();
        log::debug!("session reserved for {:?} recording", mode);
        Ok(())
    }

    /// Complete a reservation. Transitions: starting → recording.
    pub fn commit(&self) -> Result<(), CaptureError> {
        let mut shared = self.shared.lock();
        if shared.state != CaptureState::Starting {
            return Err(CaptureError::NotRecording);
        }
        shared.state = CaptureState::Recording;
        Ok(())
    }

    /// Abandon a reservation (or a recording whose thread never started).
    pub fn release(&self) {
        let mut shared = self.shared.lock();
        shared.state = CaptureState::Idle;
        shared.mode = None;
        self.signal.notify_all();
    }

    /// Transitions: recording → paused. Pausing twice is a no-op.
    ///
    /// Fails once the capture thread has faulted; only stop is left to do.
    pub fn request_pause(&self) -> Result<(), CaptureError> {
        let mut shared = self.shared.lock();
        if !shared.accepts_control() {
            return Err(CaptureError::NotRecording);
        }
        shared.state = CaptureState::Paused;
        Ok(())
    }

    /// Transitions: paused → recording, waking the capture thread.
    pub fn request_resume(&self) -> Result<(), CaptureError> {
        let mut shared = self.shared.lock();
        if !shared.accepts_control() {
            return Err(CaptureError::NotRecording);
        }
        shared.state = CaptureState::Recording;
        self.signal.notify_all();
        Ok(())
    }

    /// Move to idle and wake every waiter.
    ///
    /// Returns whether a recording was live. A second call returns `false`.
    pub fn request_stop(&self) -> bool {
        let mut shared = self.shared.lock();
        let was_recording = shared.state.is_live();
        shared.state = CaptureState::Idle;
        shared.mode = None;
        self.signal.notify_all();
        was_recording
    }

    pub fn state(&self) -> CaptureState {
        self.shared.lock().state
    }

    pub fn mode(&self) -> Option<RecordingMode> {
        self.shared.lock().mode
    }

    /// Paused and the capture thread has not faulted.
    pub fn is_paused(&self) -> bool {
        let shared = self.shared.lock();
        shared.state.is_paused() && shared.fault.is_none()
    }

    /// Recording, not paused, and the capture thread has not faulted.
    pub fn is_active_not_paused(&self) -> bool {
        let shared = self.shared.lock();
        shared.state.is_recording() && shared.fault.is_none()
    }

    /// Failure that ended the capture loop of the latest recording, if any.
    pub fn fault(&self) -> Option<CaptureError> {
        self.shared.lock().fault.clone()
    }

    /// Input levels of the live recording; the floor when idle.
    pub fn amplitude(&self) -> Amplitude {
        let shared = self.shared.lock();
        if shared.state.is_live() {
            shared.amplitude
        } else {
            Amplitude::default()
        }
    }

    // --- Capture thread side ---

    pub(crate) fn sample_phase(&self) -> LoopPhase {
        match self.shared.lock().state {
            CaptureState::Recording => LoopPhase::Reading,
            CaptureState::Paused => LoopPhase::WaitingOnPause,
            CaptureState::Idle | CaptureState::Starting => LoopPhase::Exiting,
        }
    }

    /// Block while paused; returns on resume or stop.
    pub(crate) fn wait_while_paused(&self) {
        let mut shared = self.shared.lock();
        while shared.state.is_paused() {
            self.signal.wait(&mut shared);
        }
    }

    pub(crate) fn record_fault(&self, error: CaptureError) {
        self.shared.lock().fault = Some(error);
    }

    pub(crate) fn record_amplitude(&self, level_dbfs: f64) {
        self.shared.lock().amplitude.record(level_dbfs);
    }
}

impl Default for SessionController {
    fn default() -> Self {
        Self::new()
    }
}
