use std::collections::HashMap;

use crate::audio_api::{AudioCommand, ChannelId};

use super::clip_id::ClipId;
use super::frame::StereoFrame;
use super::sample_buffer::SampleBuffer;
use super::voice::Voice;

const MAX_ONE_SHOTS: usize = 16; // hard cap so cue spam can't grow the pool in the callback

pub struct Engine {
    sample_rate: f32,
    clips: HashMap<ClipId, SampleBuffer>,
    voices: HashMap<ChannelId, Voice>,
    one_shots: Vec<(ChannelId, Voice)>,
    scratch: Vec<StereoFrame>,
}

impl Engine {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate: sample_rate as f32,
            clips: HashMap::new(),
            voices: HashMap::new(),
            one_shots: Vec::with_capacity(MAX_ONE_SHOTS),
            scratch: Vec::new(),
        }
    }

    pub fn handle_cmd(&mut self, cmd: AudioCommand) {
        match cmd {
            AudioCommand::RegisterClip { id, buffer } => {
                self.clips.insert(id, buffer);
            }
            AudioCommand::Start { channel, clip, from, pitch, volume, looping } => {
                let pos = from * self.sample_rate;
                self.voices.insert(channel, Voice::new(clip, pos, pitch, volume, looping));
            }
            AudioCommand::Halt { channel } => {
                self.voices.remove(&channel);
            }
            AudioCommand::Seek { channel, seconds } => {
                if let Some(v) = self.voices.get_mut(&channel) {
                    v.pos = (seconds * self.sample_rate).max(0.0);
                }
            }
            AudioCommand::SetPitch { channel, pitch } => {
                if let Some(v) = self.voices.get_mut(&channel) {
                    v.pitch = pitch;
                }
            }
            AudioCommand::SetVolume { channel, volume } => {
                if let Some(v) = self.voices.get_mut(&channel) {
                    v.gain = volume;
                }
            }
            AudioCommand::SetLooping { channel, looping } => {
                if let Some(v) = self.voices.get_mut(&channel) {
                    v.looping = looping;
                }
            }
            AudioCommand::OneShot { channel, clip, volume, pitch } => {
                if self.one_shots.len() >= MAX_ONE_SHOTS {
                    self.one_shots.remove(0); // steal the oldest
                }
                self.one_shots.push((channel, Voice::new(clip, 0.0, pitch, volume, false)));
            }
            AudioCommand::CutOneShots { channel } => {
                self.one_shots.retain(|(owner, _)| *owner != channel);
            }
        }
    }

    pub fn render_block(&mut self, out: &mut [StereoFrame]) {
        out.fill(StereoFrame::zero());

        for voice in self.voices.values_mut() {
            if let Some(buffer) = self.clips.get(&voice.clip) {
                voice.render_into(buffer, out);
            }
        }
        // finished channel voices stay silent until the next Start
        self.voices.retain(|_, v| v.active);

        for (_, voice) in self.one_shots.iter_mut() {
            match self.clips.get(&voice.clip) {
                Some(buffer) => voice.render_into(buffer, out),
                None => voice.active = false,
            }
        }
        self.one_shots.retain(|(_, v)| v.active);
    }

    pub fn render_interleaved(&mut self, data: &mut [f32], channels: usize) {
        let channels = channels.max(1);
        let n_frames = data.len() / channels;
        let mut scratch = std::mem::take(&mut self.scratch);
        scratch.resize(n_frames, StereoFrame::zero());
        self.render_block(&mut scratch);

        for (out, frame) in data.chunks_mut(channels).zip(scratch.iter()) {
            match out.len() {
                1 => out[0] = 0.5 * (frame.left + frame.right),
                _ => {
                    out[0] = frame.left;
                    out[1] = frame.right;
                    for extra in &mut out[2..] {
                        *extra = 0.0;
                    }
                }
            }
        }
        self.scratch = scratch;
    }

    pub fn active_voices(&self) -> usize {
        self.voices.len() + self.one_shots.len()
    }
}
