//! record-wav - capture audio to a WAV file (or a chunk stream) from the command line
//!
//! Uses the default cpal input device when built with `--features cpal`,
//! a synthetic tone otherwise (or when `--tone` is given).

use std::path::PathBuf;
use std::process;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use clap::Parser;

use audio_record_core::{
    AudioChunk, CaptureError, ChunkDispatcher, FrameSource, Recorder, RecorderConfig, RecordingResult,
};
use audio_record_device::ToneSource;

#[derive(Parser, Debug)]
#[command(name = "record-wav")]
#[command(about = "Record 16-bit PCM audio to a WAV file")]
#[command(version)]
struct Args {
    /// Output WAV file. Without it the capture is streamed and only counted.
    output: Option<PathBuf>,

    /// Recording length in seconds (pauses not included)
    #[arg(short, long, default_value = "5")]
    duration: f64,

    /// Pause after this many seconds of recording
    #[arg(long, requires = "pause_for")]
    pause_at: Option<f64>,

    /// Length of the pause in seconds
    #[arg(long, requires = "pause_at")]
    pause_for: Option<f64>,

    #[arg(long, default_value = "44100")]
    sample_rate: u32,

    #[arg(long, default_value = "2")]
    channels: u16,

    /// Bytes per capture frame
    #[arg(long, default_value = "4096")]
    frame_bytes: usize,

    /// Record a sine tone of this frequency instead of an input device
    #[arg(long)]
    tone: Option<f32>,

    /// List input devices and exit
    #[arg(long)]
    list_devices: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let config = RecorderConfig {
        sample_rate: args.sample_rate,
        channels: args.channels,
        frame_bytes: args.frame_bytes,
        ..Default::default()
    };

    let outcome = match args.tone {
        Some(hz) => run(ToneSource::new().with_frequency(hz), config, &args),
        None => run(default_source(), config, &args),
    };

    match outcome {
        Ok(Some(result)) => report(&result),
        Ok(None) => {}
        Err(e) => {
            log::error!("recording failed: {}", e);
            eprintln!("error [{}]: {}", e.code(), e);
            process::exit(1);
        }
    }
}

#[cfg(feature = "cpal")]
fn default_source() -> audio_record_device::CpalSource {
    audio_record_device::CpalSource::default_device()
}

#[cfg(not(feature = "cpal"))]
fn default_source() -> ToneSource {
    ToneSource::new()
}

fn run<S: FrameSource>(source: S, config: RecorderConfig, args: &Args) -> Result<Option<RecordingResult>, CaptureError> {
    let recorder = Recorder::new(source, config)?;

    if args.list_devices {
        for device in recorder.list_input_devices() {
            let marker = if device.is_default { "*" } else { " " };
            println!("{} {}  ({})", marker, device.label, device.id);
        }
        return Ok(None);
    }
    if !recorder.has_permission() {
        return Err(CaptureError::DeviceConnect("no usable input device".into()));
    }

    let streamed = Arc::new(AtomicU64::new(0));
    let dispatcher = match &args.output {
        Some(path) => {
            recorder.start_file(path)?;
            None
        }
        None => {
            let counter = Arc::clone(&streamed);
            let dispatcher = ChunkDispatcher::spawn(recorder.subscribe(), move |chunk: AudioChunk| {
                counter.fetch_add(chunk.data.len() as u64, Ordering::Relaxed);
            })?;
            recorder.start_stream()?;
            Some(dispatcher)
        }
    };

    match (args.pause_at, args.pause_for) {
        (Some(at), Some(length)) if at < args.duration => {
            record_for(&recorder, at);
            recorder.pause()?;
            log::info!("paused for {:.1}s", length);
            thread::sleep(secs(length));
            recorder.resume()?;
            record_for(&recorder, args.duration - at);
        }
        _ => record_for(&recorder, args.duration),
    }

    let result = recorder.stop()?;
    recorder.dispose()?;
    if let Some(dispatcher) = dispatcher {
        let chunks = dispatcher.join()?;
        println!("streamed {} chunks, {} bytes", chunks, streamed.load(Ordering::Relaxed));
    }
    Ok(result)
}

/// Sleep for `seconds`, logging the input level once per second.
fn record_for<S: FrameSource>(recorder: &Recorder<S>, seconds: f64) {
    let mut remaining = seconds.max(0.0);
    while remaining > 0.0 {
        let step = remaining.min(1.0);
        thread::sleep(secs(step));
        remaining -= step;

        if let Some(e) = recorder.last_error() {
            log::warn!("capture stopped early: {}", e);
            return;
        }
        let level = recorder.amplitude();
        log::info!("level {:.1} dBFS (max {:.1})", level.current, level.max);
    }
}

fn secs(value: f64) -> Duration {
    Duration::from_secs_f64(value.max(0.0))
}

fn report(result: &RecordingResult) {
    match &result.file_path {
        Some(path) => println!("wrote {} ({:.2}s, {} bytes)", path.display(), result.duration_secs, result.data_bytes),
        None => println!("captured {:.2}s, {} bytes", result.duration_secs, result.data_bytes),
    }
    if let Some(error) = &result.error {
        println!("capture ended early: {}", error);
    }
}
