pub use crate::audio::{ClipId, SampleBuffer};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChannelId(pub u16);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Clip {
    pub id: ClipId,
    pub length: f32,
}

impl Clip {
    pub fn new(id: ClipId, length: f32) -> Self {
        Self { id, length: length.max(0.0) }
    }
}

// Everything the control side tells the engine. Channels work out *when* things
// happen (including delayed starts), the engine only renders what it's told.
#[derive(Clone, Debug)]
pub enum AudioCommand {
    // The engine can't touch the filesystem from the callback, so buffers are
    // decoded up front and handed over once.
    RegisterClip { id: ClipId, buffer: SampleBuffer },

    Start {
        channel: ChannelId,
        clip: ClipId,
        from: f32, // seconds
        pitch: f32,
        volume: f32,
        looping: bool,
    },
    Halt { channel: ChannelId },
    Seek { channel: ChannelId, seconds: f32 },
    SetPitch { channel: ChannelId, pitch: f32 },
    SetVolume { channel: ChannelId, volume: f32 },
    SetLooping { channel: ChannelId, looping: bool },

    // fire and forget, independent of the channel's own voice; tagged with the
    // channel only so Stop can cut them
    OneShot { channel: ChannelId, clip: ClipId, volume: f32, pitch: f32 },
    CutOneShots { channel: ChannelId },
}

// Reported by `advance` when playback crosses a boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelEvent {
    Started,
    Looped,
    // A non-looping clip ran off its end and stopped.
    Finished,
}

// A single independently controllable playback unit.
pub trait AudioChannel {
    fn play(&mut self);
    // Start after `seconds`. Replaces any start that is still pending.
    fn play_delayed(&mut self, seconds: f32);
    fn pause(&mut self);
    // Halt and rewind to the start. Also silences in-flight one-shots.
    fn stop(&mut self);
    fn play_one_shot(&mut self, clip: &Clip, volume: f32);

    fn pitch(&self) -> f32;
    fn set_pitch(&mut self, pitch: f32);
    fn volume(&self) -> f32;
    fn set_volume(&mut self, volume: f32);
    fn time(&self) -> f32;
    fn set_time(&mut self, seconds: f32);
    // True while the clip is sounding, a start is pending, or a one-shot is still ringing.
    fn is_playing(&self) -> bool;
    fn looping(&self) -> bool;
    fn set_looping(&mut self, looping: bool);
    fn clip(&self) -> Option<Clip>;
    fn set_clip(&mut self, clip: Option<Clip>);

    // Move time forward by `dt` seconds. Called once per tick by the owning controller.
    fn advance(&mut self, dt: f32) -> Option<ChannelEvent>;
}
