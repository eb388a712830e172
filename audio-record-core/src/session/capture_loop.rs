//! Body of the capture thread.
//!
//! ```text
//!            ┌──────── resume ────────┐
//!            ▼                        │
//!  ──▶ Reading ── paused ──▶ WaitingOnPause
//!        │                            │
//!   stop / read or write failure     stop
//!        ▼                            │
//!     Exiting ◀───────────────────────┘
//! ```
//!
//! The controller lock is only taken to sample or update shared fields; it is
//! never held across a device read or a sink write.

use crate::models::error::CaptureError;
use crate::processing::pcm;
use crate::session::controller::SessionController;
use crate::sink::FrameSink;
use crate::traits::frame_source::CaptureDevice;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopPhase {
    Reading,
    WaitingOnPause,
    Exiting,
}

/// Everything the capture thread owned, handed back on exit.
pub(crate) struct CaptureOutcome {
    pub device: Box<dyn CaptureDevice>,
    pub sink: FrameSink,
    pub frames: u64,
    pub error: Option<CaptureError>,
}

pub(crate) fn run(
    controller: &SessionController,
    mut device: Box<dyn CaptureDevice>,
    mut sink: FrameSink,
    frame_bytes: usize,
) -> CaptureOutcome {
    let mut buffer = vec![0u8; frame_bytes];
    let mut frames = 0u64;
    let mut error = None;

    loop {
        match controller.sample_phase() {
            LoopPhase::Exiting => break,
            LoopPhase::WaitingOnPause => {
                controller.wait_while_paused();
                continue;
            }
            LoopPhase::Reading => {}
        }

        let read = match device.read_frame(&mut buffer) {
            Ok(0) => Err(CaptureError::Read("device returned no data".into())),
            Ok(n) => Ok(n.min(buffer.len())),
            Err(e) => Err(e),
        };
        let frame = match read {
            Ok(n) => &buffer[..n],
            Err(e) => {
                // State stays live; stop()/dispose() does the bookkeeping.
                log::warn!("capture read failed, ending capture loop: {}", e);
                controller.record_fault(e.clone());
                error = Some(e);
                break;
            }
        };

        if let Err(e) = sink.accept(frame) {
            log::error!("failed to write audio data, ending capture loop: {}", e);
            controller.record_fault(e.clone());
            error = Some(e);
            break;
        }
        frames += 1;

        controller.record_amplitude(pcm::to_dbfs(pcm::peak_level(frame)));
    }

    log::debug!("capture loop exited after {} frames", frames);
    CaptureOutcome {
        device,
        sink,
        frames,
        error,
    }
}
