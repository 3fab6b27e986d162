use anyhow::Context;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossbeam_channel::{Receiver, Sender};

use crate::audio_api::AudioCommand;

mod clip_id;
mod engine;
mod frame;
mod sample_buffer;
mod voice;

pub use clip_id::{next_clip_id, ClipId};
pub use engine::Engine;
pub use frame::StereoFrame;
pub use sample_buffer::SampleBuffer;

const COMMAND_QUEUE: usize = 1024;

// Keeps the output stream alive and hands out command senders for channels.
pub struct AudioHandle {
    tx: Sender<AudioCommand>,
    sample_rate: u32,
    _output_stream: cpal::Stream,
}

impl AudioHandle {
    pub fn send(&self, cmd: AudioCommand) {
        if self.tx.try_send(cmd).is_err() {
            log::warn!("audio command queue full, dropping command");
        }
    }

    pub fn sender(&self) -> Sender<AudioCommand> {
        self.tx.clone()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

pub fn start_audio() -> anyhow::Result<AudioHandle> {
    let (tx, rx) = crossbeam_channel::bounded::<AudioCommand>(COMMAND_QUEUE);

    let host = cpal::default_host();
    let device = host.default_output_device().context("no default output device")?;
    let config = device.default_output_config().context("no default output config")?;

    let sample_rate: u32 = config.sample_rate(); // a plain u32 alias since cpal 0.17
    let channels = config.channels() as usize;

    match config.sample_format() {
        cpal::SampleFormat::F32 => {
            let output_stream = build_output_stream_f32(&device, &config.into(), rx, sample_rate, channels)?;
            output_stream.play().context("failed to play output stream")?;
            log::info!("audio output running at {sample_rate} Hz, {channels} channels");

            Ok(AudioHandle {
                tx,
                sample_rate,
                _output_stream: output_stream,
            })
        }
        other => anyhow::bail!("unsupported sample format {other:?} (only f32 supported for now)"),
    }
}

fn build_output_stream_f32(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    rx: Receiver<AudioCommand>,
    sample_rate: u32,
    channels: usize,
) -> anyhow::Result<cpal::Stream> {
    let mut engine = Engine::new(sample_rate);

    let err_fn = |err| log::error!("audio output stream error: {err}");

    let stream = device.build_output_stream(
        config,
        move |data: &mut [f32], _info| {
            while let Ok(cmd) = rx.try_recv() {
                engine.handle_cmd(cmd);
            }
            engine.render_interleaved(data, channels);
        },
        err_fn,
        None,
    )?;

    Ok(stream)
}
