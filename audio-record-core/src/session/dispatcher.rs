use std::thread;

use crossbeam_channel::Receiver;

use crate::models::audio_models::AudioChunk;
use crate::models::error::CaptureError;
use crate::traits::chunk_consumer::ChunkConsumer;

/// Single-threaded delivery context for streamed chunks.
///
/// Drains a chunk receiver on its own thread and hands every chunk to the
/// consumer in arrival order. The thread ends once every sender is gone,
/// i.e. after the recorder is disposed (or resubscribed) and the last stream
/// has stopped.
pub struct ChunkDispatcher {
    handle: thread::JoinHandle<u64>,
}

impl ChunkDispatcher {
    pub fn spawn<C>(chunks: Receiver<AudioChunk>, mut consumer: C) -> Result<Self, CaptureError>
    where
        C: ChunkConsumer + 'static,
    {
        let handle = thread::Builder::new()
            .name("record-chunk-dispatch".into())
            .spawn(move || {
                let mut delivered = 0u64;
                for chunk in chunks.iter() {
                    consumer.on_chunk(chunk);
                    delivered += 1;
                }
                log::debug!("chunk dispatcher finished after {} chunks", delivered);
                delivered
            })
            .map_err(|e| CaptureError::Thread(format!("failed to spawn dispatcher thread: {}", e)))?;

        Ok(Self { handle })
    }

    /// Wait for the channel to close; returns the number of chunks delivered.
    pub fn join(self) -> Result<u64, CaptureError> {
        self.handle
            .join()
            .map_err(|_| CaptureError::Thread("chunk consumer panicked".into()))
    }
}
