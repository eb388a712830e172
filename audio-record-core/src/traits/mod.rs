pub mod chunk_consumer;
pub mod frame_source;
