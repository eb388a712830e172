//! Microphone capture through cpal.
//!
//! cpal delivers samples on its own callback thread in whatever buffer sizes
//! the host picks. Each connected device owns a worker thread that keeps the
//! `cpal::Stream` alive (streams are not `Send` on every host) and forwards
//! converted 16-bit PCM over a channel; `read_frame` re-slices that byte
//! stream into fixed-size frames.

use std::thread;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, SampleRate, StreamConfig};
use crossbeam_channel::{Receiver, Sender};

use audio_record_core::processing::pcm;
use audio_record_core::{CaptureDevice, CaptureError, FrameSource, InputDevice, SampleSpec};

/// Input devices of the default cpal host.
#[derive(Debug, Clone, Default)]
pub struct CpalSource {
    device_name: Option<String>,
}

impl CpalSource {
    /// Capture from the host's default input device.
    pub fn default_device() -> Self {
        Self { device_name: None }
    }

    /// Capture from the input device whose name matches `name`.
    pub fn with_device(name: impl Into<String>) -> Self {
        Self {
            device_name: Some(name.into()),
        }
    }
}

impl FrameSource for CpalSource {
    fn connect(&self, spec: &SampleSpec) -> Result<Box<dyn CaptureDevice>, CaptureError> {
        let (event_tx, event_rx) = crossbeam_channel::unbounded();
        let (ready_tx, ready_rx) = crossbeam_channel::bounded(1);
        let (stop_tx, stop_rx) = crossbeam_channel::bounded::<()>(1);
        let device_name = self.device_name.clone();
        let spec = *spec;

        let handle = thread::Builder::new()
            .name("record-cpal-input".into())
            .spawn(move || run_stream(device_name, spec, event_tx, ready_tx, stop_rx))
            .map_err(|e| CaptureError::Thread(format!("failed to spawn input thread: {}", e)))?;

        match ready_rx.recv() {
            Ok(Ok(())) => Ok(Box::new(CpalDevice {
                events: event_rx,
                pending: Vec::new(),
                stop_tx,
                handle: Some(handle),
            })),
            Ok(Err(e)) => {
                let _ = handle.join();
                Err(e)
            }
            Err(_) => {
                let _ = handle.join();
                Err(CaptureError::DeviceConnect("input thread exited before the stream opened".into()))
            }
        }
    }

    fn list_devices(&self) -> Vec<InputDevice> {
        let host = cpal::default_host();
        let default_name = host.default_input_device().and_then(|d| d.name().ok());

        match host.input_devices() {
            Ok(devices) => devices
                .filter_map(|d| d.name().ok())
                .map(|name| InputDevice {
                    id: name.clone(),
                    is_default: default_name.as_deref() == Some(name.as_str()),
                    label: name,
                })
                .collect(),
            Err(e) => {
                log::warn!("failed to enumerate input devices: {}", e);
                Vec::new()
            }
        }
    }

    fn has_permission(&self) -> bool {
        cpal::default_host().default_input_device().is_some()
    }
}

enum InputEvent {
    Samples(Vec<u8>),
    Failed(String),
}

struct CpalDevice {
    events: Receiver<InputEvent>,
    pending: Vec<u8>,
    stop_tx: Sender<()>,
    handle: Option<thread::JoinHandle<()>>,
}

impl CaptureDevice for CpalDevice {
    fn read_frame(&mut self, buffer: &mut [u8]) -> Result<usize, CaptureError> {
        while self.pending.len() < buffer.len() {
            match self.events.recv() {
                Ok(InputEvent::Samples(bytes)) => self.pending.extend_from_slice(&bytes),
                Ok(InputEvent::Failed(message)) => return Err(CaptureError::Read(message)),
                Err(_) => return Err(CaptureError::Read("input stream closed".into())),
            }
        }
        buffer.copy_from_slice(&self.pending[..buffer.len()]);
        self.pending.drain(..buffer.len());
        Ok(buffer.len())
    }

    fn disconnect(mut self: Box<Self>) {
        let _ = self.stop_tx.send(());
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("cpal input thread panicked");
            }
        }
    }
}

/// Worker body: open the stream, report readiness, hold the stream until stopped.
fn run_stream(
    device_name: Option<String>,
    spec: SampleSpec,
    events: Sender<InputEvent>,
    ready: Sender<Result<(), CaptureError>>,
    stop: Receiver<()>,
) {
    let stream = match open_stream(device_name.as_deref(), &spec, events) {
        Ok(stream) => stream,
        Err(e) => {
            let _ = ready.send(Err(e));
            return;
        }
    };

    if let Err(e) = stream.play() {
        let _ = ready.send(Err(CaptureError::DeviceConnect(format!("failed to start stream: {}", e))));
        return;
    }
    if ready.send(Ok(())).is_err() {
        return;
    }

    // Returns on an explicit stop or once the device handle is dropped.
    let _ = stop.recv();
    drop(stream);
    log::debug!("cpal input stream closed");
}

fn open_stream(
    device_name: Option<&str>,
    spec: &SampleSpec,
    events: Sender<InputEvent>,
) -> Result<cpal::Stream, CaptureError> {
    let host = cpal::default_host();
    let device = match device_name {
        None => host
            .default_input_device()
            .ok_or_else(|| CaptureError::DeviceConnect("no default input device".into()))?,
        Some(wanted) => host
            .input_devices()
            .map_err(|e| CaptureError::DeviceConnect(e.to_string()))?
            .find(|d| d.name().map(|n| n == wanted).unwrap_or(false))
            .ok_or_else(|| CaptureError::DeviceConnect(format!("input device not found: {}", wanted)))?,
    };

    let sample_format = device
        .default_input_config()
        .map_err(|e| CaptureError::DeviceConnect(e.to_string()))?
        .sample_format();

    let config = StreamConfig {
        channels: spec.channels,
        sample_rate: SampleRate(spec.sample_rate),
        buffer_size: cpal::BufferSize::Default,
    };

    log::info!(
        "opening input device {:?}: {} Hz, {} channels, {:?}",
        device.name().unwrap_or_default(),
        spec.sample_rate,
        spec.channels,
        sample_format
    );

    match sample_format {
        SampleFormat::I16 => build_stream::<i16>(&device, &config, events),
        SampleFormat::U16 => build_stream::<u16>(&device, &config, events),
        SampleFormat::F32 => build_stream::<f32>(&device, &config, events),
        other => Err(CaptureError::DeviceConnect(format!("unsupported sample format: {:?}", other))),
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &StreamConfig,
    events: Sender<InputEvent>,
) -> Result<cpal::Stream, CaptureError>
where
    T: cpal::SizedSample + Send + 'static,
    f32: cpal::FromSample<T>,
{
    let error_events = events.clone();
    device
        .build_input_stream(
            config,
            move |data: &[T], _: &cpal::InputCallbackInfo| {
                let samples: Vec<f32> = data.iter().map(|&s| cpal::Sample::to_sample::<f32>(s)).collect();
                let _ = events.send(InputEvent::Samples(pcm::encode_pcm16(&samples)));
            },
            move |err| {
                log::error!("input stream error: {}", err);
                let _ = error_events.send(InputEvent::Failed(err.to_string()));
            },
            None,
        )
        .map_err(|e| CaptureError::DeviceConnect(format!("failed to build input stream: {}", e)))
}
