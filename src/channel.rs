use crossbeam_channel::Sender;

use crate::audio_api::{AudioChannel, AudioCommand, ChannelEvent, ChannelId, Clip};

pub const MIN_PITCH: f32 = 0.25;
pub const MAX_PITCH: f32 = 3.0;

#[derive(Clone, Copy, Debug, PartialEq)]
enum Playback {
    Idle,
    Scheduled { remaining: f32 },
    Sounding,
}

// The control-side model of one playback channel.
//
// Time advances only through `advance`, so the model is deterministic and doubles as
// the source of truth for the status surface. With a sender attached, each state change
// is mirrored to the engine as an `AudioCommand`.
//
// A channel holds at most one pending delayed start. `play`, `play_delayed`, `pause`,
// `stop` and `set_clip` all replace or clear it, so a stale start never fires after a
// newer command.
#[derive(Clone, Debug)]
pub struct Channel {
    id: ChannelId,
    clip: Option<Clip>,
    pitch: f32,
    volume: f32,
    time: f32,
    looping: bool,
    playback: Playback,
    one_shots: Vec<f32>, // seconds left on each in-flight one-shot
    tx: Option<Sender<AudioCommand>>,
}

impl Channel {
    pub fn new(id: ChannelId) -> Self {
        Self {
            id,
            clip: None,
            pitch: 1.0,
            volume: 1.0,
            time: 0.0,
            looping: false,
            playback: Playback::Idle,
            one_shots: Vec::new(),
            tx: None,
        }
    }

    pub fn with_clip(mut self, clip: Clip) -> Self {
        self.clip = Some(clip);
        self
    }

    pub fn with_sender(mut self, tx: Sender<AudioCommand>) -> Self {
        self.tx = Some(tx);
        self
    }

    pub fn id(&self) -> ChannelId {
        self.id
    }

    // True only while the clip itself is audible (not while a start is pending).
    pub fn is_sounding(&self) -> bool {
        self.playback == Playback::Sounding
    }

    pub fn is_scheduled(&self) -> bool {
        matches!(self.playback, Playback::Scheduled { .. })
    }

    pub fn one_shots_ringing(&self) -> usize {
        self.one_shots.len()
    }

    fn send(&self, cmd: AudioCommand) {
        if let Some(tx) = &self.tx {
            // a full queue only costs audio, never control state
            if tx.try_send(cmd).is_err() {
                log::warn!("channel {:?}: audio queue full", self.id);
            }
        }
    }

    fn start_now(&mut self) {
        let Some(clip) = self.clip else {
            log::debug!("channel {:?}: play with no clip", self.id);
            self.playback = Playback::Idle;
            return;
        };
        self.playback = Playback::Sounding;
        self.send(AudioCommand::Start {
            channel: self.id,
            clip: clip.id,
            from: self.time,
            pitch: self.pitch,
            volume: self.volume,
            looping: self.looping,
        });
    }

    fn halt(&mut self) {
        if self.playback == Playback::Sounding {
            self.send(AudioCommand::Halt { channel: self.id });
        }
        self.playback = Playback::Idle;
    }
}

impl AudioChannel for Channel {
    fn play(&mut self) {
        self.start_now();
    }

    fn play_delayed(&mut self, seconds: f32) {
        if seconds <= 0.0 {
            self.start_now();
            return;
        }
        self.halt();
        self.playback = Playback::Scheduled { remaining: seconds };
    }

    fn pause(&mut self) {
        self.halt();
    }

    fn stop(&mut self) {
        self.halt();
        self.time = 0.0;
        if !self.one_shots.is_empty() {
            self.one_shots.clear();
            self.send(AudioCommand::CutOneShots { channel: self.id });
        }
    }

    fn play_one_shot(&mut self, clip: &Clip, volume: f32) {
        let volume = volume.clamp(0.0, 1.0) * self.volume;
        self.one_shots.push(clip.length / self.pitch);
        self.send(AudioCommand::OneShot { channel: self.id, clip: clip.id, volume, pitch: self.pitch });
    }

    fn pitch(&self) -> f32 {
        self.pitch
    }

    fn set_pitch(&mut self, pitch: f32) {
        if !pitch.is_finite() {
            return;
        }
        self.pitch = pitch.clamp(MIN_PITCH, MAX_PITCH);
        if self.is_sounding() {
            self.send(AudioCommand::SetPitch { channel: self.id, pitch: self.pitch });
        }
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn set_volume(&mut self, volume: f32) {
        if !volume.is_finite() {
            return;
        }
        self.volume = volume.clamp(0.0, 1.0);
        if self.is_sounding() {
            self.send(AudioCommand::SetVolume { channel: self.id, volume: self.volume });
        }
    }

    fn time(&self) -> f32 {
        self.time
    }

    fn set_time(&mut self, seconds: f32) {
        let end = self.clip.map_or(0.0, |c| c.length);
        self.time = if seconds.is_finite() { seconds.clamp(0.0, end) } else { 0.0 };
        if self.is_sounding() {
            self.send(AudioCommand::Seek { channel: self.id, seconds: self.time });
        }
    }

    fn is_playing(&self) -> bool {
        self.playback != Playback::Idle || !self.one_shots.is_empty()
    }

    fn looping(&self) -> bool {
        self.looping
    }

    fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
        if self.is_sounding() {
            self.send(AudioCommand::SetLooping { channel: self.id, looping });
        }
    }

    fn clip(&self) -> Option<Clip> {
        self.clip
    }

    fn set_clip(&mut self, clip: Option<Clip>) {
        self.halt();
        self.clip = clip;
        self.time = 0.0;
    }

    fn advance(&mut self, dt: f32) -> Option<ChannelEvent> {
        if dt <= 0.0 {
            return None;
        }
        self.one_shots.retain_mut(|left| {
            *left -= dt;
            *left > 0.0
        });

        let mut event = None;
        let mut audible = dt;
        if let Playback::Scheduled { remaining } = self.playback {
            if remaining > dt {
                self.playback = Playback::Scheduled { remaining: remaining - dt };
                return None;
            }
            audible = dt - remaining;
            self.start_now();
            if self.is_sounding() {
                event = Some(ChannelEvent::Started);
            }
        }

        if self.playback == Playback::Sounding {
            if let Some(clip) = self.clip {
                self.time += audible * self.pitch;
                if self.time >= clip.length {
                    if self.looping && clip.length > 0.0 {
                        self.time %= clip.length;
                        event = Some(ChannelEvent::Looped);
                    } else {
                        // the engine voice has run out on its own
                        self.playback = Playback::Idle;
                        self.time = 0.0;
                        event = Some(ChannelEvent::Finished);
                    }
                }
            }
        }
        event
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::next_clip_id;
    use approx::assert_abs_diff_eq;
    use pretty_assertions::assert_eq;

    fn channel_with(length: f32) -> Channel {
        Channel::new(ChannelId(0)).with_clip(Clip::new(next_clip_id(), length))
    }

    #[test]
    fn delayed_start_fires_after_the_delay() {
        let mut ch = channel_with(60.0);
        ch.play_delayed(5.0);
        assert!(ch.is_playing());
        assert!(!ch.is_sounding());

        assert_eq!(ch.advance(4.5), None);
        assert_eq!(ch.time(), 0.0);
        assert_eq!(ch.advance(1.0), Some(ChannelEvent::Started));
        assert!(ch.is_sounding());
        assert_abs_diff_eq!(ch.time(), 0.5);
    }

    #[test]
    fn pause_keeps_position_and_stop_rewinds() {
        let mut ch = channel_with(60.0);
        ch.play();
        ch.advance(3.0);
        ch.pause();
        assert!(!ch.is_playing());
        assert_eq!(ch.time(), 3.0);

        ch.play();
        ch.advance(1.0);
        assert_eq!(ch.time(), 4.0);
        ch.stop();
        assert_eq!(ch.time(), 0.0);
    }

    #[test]
    fn pause_cancels_a_pending_start() {
        let mut ch = channel_with(60.0);
        ch.play_delayed(5.0);
        ch.pause();
        assert_eq!(ch.advance(10.0), None);
        assert!(!ch.is_playing());
    }

    #[test]
    fn newer_delay_replaces_the_pending_one() {
        let mut ch = channel_with(60.0);
        ch.play_delayed(5.0);
        ch.advance(4.0);
        ch.play_delayed(5.0);
        assert_eq!(ch.advance(2.0), None);
        assert_eq!(ch.advance(3.0), Some(ChannelEvent::Started));
    }

    #[test]
    fn pitch_scales_elapsed_time() {
        let mut ch = channel_with(60.0);
        ch.set_pitch(3.0);
        ch.play();
        ch.advance(2.0);
        assert_eq!(ch.time(), 6.0);
    }

    #[test]
    fn pitch_stays_inside_the_playable_range() {
        let mut ch = channel_with(60.0);
        ch.set_pitch(0.0);
        assert_eq!(ch.pitch(), MIN_PITCH);
        ch.set_pitch(-2.0);
        assert_eq!(ch.pitch(), MIN_PITCH);
        ch.set_pitch(9.0);
        assert_eq!(ch.pitch(), MAX_PITCH);
        ch.set_pitch(f32::NAN);
        assert_eq!(ch.pitch(), MAX_PITCH);

        // a floored pitch still moves time forward
        ch.set_pitch(0.0);
        ch.play();
        ch.advance(4.0);
        assert_eq!(ch.time(), 1.0);
    }

    #[test]
    fn looping_wraps_and_one_shot_clip_finishes() {
        let mut ch = channel_with(4.0);
        ch.set_looping(true);
        ch.play();
        assert_eq!(ch.advance(5.0), Some(ChannelEvent::Looped));
        assert_eq!(ch.time(), 1.0);

        ch.set_looping(false);
        assert_eq!(ch.advance(3.0), Some(ChannelEvent::Finished));
        assert!(!ch.is_playing());
        assert_eq!(ch.time(), 0.0);
    }

    #[test]
    fn one_shot_rings_for_its_length() {
        let mut ch = Channel::new(ChannelId(9));
        let cue = Clip::new(next_clip_id(), 1.0);
        ch.play_one_shot(&cue, 0.7);
        assert!(ch.is_playing());
        ch.advance(0.5);
        assert_eq!(ch.one_shots_ringing(), 1);
        ch.advance(0.5);
        assert!(!ch.is_playing());
    }

    #[test]
    fn set_time_is_clamped_to_the_clip() {
        let mut ch = channel_with(8.0);
        ch.set_time(12.0);
        assert_eq!(ch.time(), 8.0);
        ch.set_time(-1.0);
        assert_eq!(ch.time(), 0.0);
    }

    #[test]
    fn state_changes_are_mirrored_to_the_engine() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let clip = Clip::new(next_clip_id(), 10.0);
        let mut ch = Channel::new(ChannelId(2)).with_clip(clip).with_sender(tx);

        ch.set_time(2.0);
        ch.play_delayed(1.0);
        assert!(rx.try_recv().is_err()); // nothing audible yet

        ch.advance(1.0);
        match rx.try_recv().unwrap() {
            AudioCommand::Start { channel, clip: id, from, .. } => {
                assert_eq!(channel, ChannelId(2));
                assert_eq!(id, clip.id);
                assert_eq!(from, 2.0);
            }
            other => panic!("expected Start, got {other:?}"),
        }

        ch.pause();
        assert!(matches!(rx.try_recv().unwrap(), AudioCommand::Halt { channel: ChannelId(2) }));
    }

    #[test]
    fn stop_cuts_ringing_one_shots_in_the_engine() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut ch = Channel::new(ChannelId(4)).with_sender(tx);
        ch.stop();
        assert!(rx.try_recv().is_err()); // nothing to cut

        ch.play_one_shot(&Clip::new(next_clip_id(), 1.0), 1.0);
        assert!(matches!(rx.try_recv().unwrap(), AudioCommand::OneShot { channel: ChannelId(4), .. }));
        ch.stop();
        assert!(!ch.is_playing());
        assert!(matches!(rx.try_recv().unwrap(), AudioCommand::CutOneShots { channel: ChannelId(4) }));
    }
}
