use crate::models::audio_models::AudioChunk;

/// Receiver of streamed chunks.
///
/// Called from the [`ChunkDispatcher`](crate::ChunkDispatcher) thread, never
/// from the capture thread, so a slow consumer cannot stall capture.
pub trait ChunkConsumer: Send {
    fn on_chunk(&mut self, chunk: AudioChunk);
}

impl<F> ChunkConsumer for F
where
    F: FnMut(AudioChunk) + Send,
{
    fn on_chunk(&mut self, chunk: AudioChunk) {
        self(chunk)
    }
}
