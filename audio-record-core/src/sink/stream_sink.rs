use crossbeam_channel::Sender;

use crate::models::audio_models::AudioChunk;

/// Hands captured frames to a consumer on another thread.
///
/// Each frame is copied into an owned buffer and pushed onto an unbounded
/// channel. The capture thread never waits on the consumer; a consumer that
/// falls behind just lets chunks queue up. Channel order is frame order.
pub struct StreamSink {
    tx: Sender<AudioChunk>,
    next_sequence: u64,
    bytes_sent: u64,
    consumer_gone: bool,
}

impl StreamSink {
    pub fn new(tx: Sender<AudioChunk>) -> Self {
        Self {
            tx,
            next_sequence: 0,
            bytes_sent: 0,
            consumer_gone: false,
        }
    }

    /// Enqueue one frame. Frames are dropped once the receiver is gone.
    pub fn send_frame(&mut self, frame: &[u8]) {
        let chunk = AudioChunk {
            sequence: self.next_sequence,
            data: frame.to_vec(),
        };
        self.next_sequence += 1;
        self.bytes_sent += frame.len() as u64;

        if self.tx.send(chunk).is_err() && !self.consumer_gone {
            log::debug!("chunk receiver dropped; discarding streamed frames");
            self.consumer_gone = true;
        }
    }

    /// Number of frames handed off so far.
    pub fn frames_sent(&self) -> u64 {
        self.next_sequence
    }

    pub fn bytes_sent(&self) -> u64 {
        self.bytes_sent
    }
}
