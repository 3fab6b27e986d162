use crate::audio_api::{AudioChannel, ChannelEvent, Clip};
use crate::channel::Channel;
use crate::shared::{CUE_DELAY_SECS, CUE_VOLUME, FAST_FORWARD_PITCH, Ignored, Outcome};

use super::track_set::{Direction, TrackSet};
use super::{TransportOp, TransportState};

// The confirmation sound for each transport button. Buttons without a clip stay silent.
#[derive(Clone, Debug, Default)]
pub struct CueBank {
    clips: [Option<Clip>; TransportOp::COUNT],
}

impl CueBank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, op: TransportOp, clip: Clip) -> Self {
        self.clips[op.index()] = Some(clip);
        self
    }

    pub fn get(&self, op: TransportOp) -> Option<&Clip> {
        self.clips[op.index()].as_ref()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransportSettings {
    // Wait between the cue sound and the track (re)starting.
    pub cue_delay: f32,
    pub fast_forward_pitch: f32,
    pub cue_volume: f32,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            cue_delay: CUE_DELAY_SECS,
            fast_forward_pitch: FAST_FORWARD_PITCH,
            cue_volume: CUE_VOLUME,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TransportStatus {
    pub track_index: usize,
    pub track_count: usize,
    pub position: f32,
    pub duration: f32,
    pub state: TransportState,
    pub pitch: f32,
    pub volume: f32,
    pub sounding: bool,
    pub command_seq: u64,
    pub last_command: Option<TransportOp>,
}

// Drives the track channel through the transport buttons.
//
// Every button plays its cue on a separate channel first; anything that (re)starts the
// track does so after `cue_delay`, so the cue is heard on its own. Stop and Pause both
// pause the track rather than rewinding it, so playback always resumes where it left off.
pub struct TransportController<C: AudioChannel = Channel> {
    tracks: TrackSet,
    song: C,
    cue: C,
    cues: CueBank,
    settings: TransportSettings,
    state: TransportState,
    command_seq: u64,
    last_command: Option<TransportOp>,
}

impl<C: AudioChannel> TransportController<C> {
    pub fn new(tracks: TrackSet, mut song: C, cue: C, cues: CueBank, settings: TransportSettings) -> Self {
        song.set_clip(Some(tracks.current().clip));
        song.set_pitch(1.0);
        Self {
            tracks,
            song,
            cue,
            cues,
            settings,
            state: TransportState::Stopped,
            command_seq: 0,
            last_command: None,
        }
    }

    pub fn state(&self) -> TransportState {
        self.state
    }

    pub fn tracks(&self) -> &TrackSet {
        &self.tracks
    }

    pub fn song(&self) -> &C {
        &self.song
    }

    pub fn cue(&self) -> &C {
        &self.cue
    }

    pub fn play(&mut self) -> Outcome {
        if self.cue.is_playing() || self.song.is_playing() {
            log::debug!("play refused: something is already sounding");
            return Outcome::Ignored(Ignored::Busy);
        }
        self.press(TransportOp::Play);
        self.song.set_pitch(1.0);
        self.tracks.record_position(self.song.time());
        self.song.play_delayed(self.settings.cue_delay);
        self.song.set_looping(true);
        self.state = TransportState::Playing;
        Outcome::Applied
    }

    pub fn stop(&mut self) -> Outcome {
        self.press(TransportOp::Stop);
        self.song.set_pitch(1.0);
        self.song.pause();
        self.tracks.record_position(self.song.time());
        self.state = TransportState::Stopped;
        Outcome::Applied
    }

    // Acts as Stop while the track is playing and as Play while it isn't.
    pub fn pause(&mut self) -> Outcome {
        self.press(TransportOp::Pause);
        self.song.set_pitch(1.0);
        if self.song.is_playing() {
            self.song.pause();
            self.tracks.record_position(self.song.time());
            self.state = TransportState::Paused;
        } else {
            self.tracks.record_position(self.song.time());
            self.song.play_delayed(self.settings.cue_delay);
            self.state = TransportState::Playing;
        }
        Outcome::Applied
    }

    pub fn fast_forward(&mut self) -> Outcome {
        self.press(TransportOp::FastForward);
        let pitch = self.settings.fast_forward_pitch;
        if self.song.is_playing() {
            self.song.pause();
            self.song.set_time(self.tracks.position());
        } else {
            self.tracks.record_position(self.song.time());
        }
        self.song.set_pitch(pitch);
        self.song.play_delayed(self.settings.cue_delay);
        self.state = TransportState::FastForwarding;

        if self.tracks.at_end() {
            self.restart_from_top();
        }
        Outcome::Applied
    }

    pub fn next(&mut self) -> Outcome {
        self.switch_track(Direction::Forward)
    }

    pub fn previous(&mut self) -> Outcome {
        self.switch_track(Direction::Backward)
    }

    pub fn reset(&mut self) -> Outcome {
        self.press(TransportOp::Reset);
        self.song.set_pitch(1.0);
        self.song.pause();
        self.load_track(0, 0.0);
        self.song.play_delayed(self.settings.cue_delay);
        self.state = TransportState::Playing;
        Outcome::Applied
    }

    // Silences the whole board without a cue; the position is kept for the next Play.
    pub fn halt(&mut self) {
        self.song.set_pitch(1.0);
        self.song.pause();
        self.cue.stop();
        self.tracks.record_position(self.song.time());
        self.state = TransportState::Stopped;
        log::debug!("transport halted at {:.2}s", self.tracks.position());
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.song.set_volume(volume.clamp(0.0, 1.0));
    }

    pub fn tick(&mut self, dt: f32) {
        self.cue.advance(dt);
        let event = self.song.advance(dt);
        self.tracks.record_position(self.song.time());

        match (self.state, event) {
            (TransportState::FastForwarding, Some(ChannelEvent::Looped | ChannelEvent::Finished)) => {
                log::debug!("fast-forward reached the end of track {}", self.tracks.current_index());
                self.restart_from_top();
            }
            (TransportState::Playing, Some(ChannelEvent::Finished)) => {
                self.state = TransportState::Stopped;
            }
            _ => {}
        }
    }

    pub fn status(&self) -> TransportStatus {
        TransportStatus {
            track_index: self.tracks.current_index(),
            track_count: self.tracks.len(),
            position: self.song.time(),
            duration: self.tracks.current().duration(),
            state: self.state,
            pitch: self.song.pitch(),
            volume: self.song.volume(),
            sounding: self.song.is_playing(),
            command_seq: self.command_seq,
            last_command: self.last_command,
        }
    }

    fn press(&mut self, op: TransportOp) {
        self.command_seq += 1;
        self.last_command = Some(op);
        log::debug!("transport #{}: {}", self.command_seq, op.label());
        if let Some(clip) = self.cues.get(op) {
            self.cue.play_one_shot(clip, self.settings.cue_volume);
        }
    }

    // Next and Previous: carry the playback point over unless it's past the end of the
    // track we're switching to.
    fn switch_track(&mut self, direction: Direction) -> Outcome {
        let op = match direction {
            Direction::Forward => TransportOp::Next,
            Direction::Backward => TransportOp::Previous,
        };
        self.press(op);
        self.song.set_pitch(1.0);

        let elapsed = self.song.time();
        let target = self.tracks.neighbour(direction);
        let start = self.tracks.resume_point(elapsed, target);
        log::debug!(
            "switching track {} -> {target} at {elapsed:.2}s, resuming at {start:.2}s",
            self.tracks.current_index()
        );

        self.song.pause();
        self.load_track(target, start);
        self.song.play_delayed(self.settings.cue_delay);
        self.state = TransportState::Playing;
        Outcome::Applied
    }

    fn load_track(&mut self, index: usize, start: f32) {
        let clip = self.tracks.get(index).map(|t| t.clip);
        self.song.set_clip(clip);
        self.song.stop();
        self.song.set_time(start);
        self.tracks.select(index, start);
    }

    // Hard reset at the end of a fast-forward: normal speed, from the top, right away.
    fn restart_from_top(&mut self) {
        self.song.pause();
        self.song.set_time(0.0);
        self.tracks.record_position(0.0);
        self.song.set_pitch(1.0);
        self.song.play();
        self.state = TransportState::Playing;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::next_clip_id;
    use crate::audio_api::ChannelId;
    use approx::assert_abs_diff_eq;
    use pretty_assertions::assert_eq;

    fn clip(length: f32) -> Clip {
        Clip::new(next_clip_id(), length)
    }

    fn cues() -> CueBank {
        TransportOp::ALL.iter().fold(CueBank::new(), |bank, op| bank.with(*op, clip(1.0)))
    }

    fn deck(lengths: &[f32]) -> TransportController {
        let tracks = TrackSet::new(lengths.iter().map(|l| clip(*l))).unwrap();
        TransportController::new(
            tracks,
            Channel::new(ChannelId(0)),
            Channel::new(ChannelId(1)),
            cues(),
            TransportSettings::default(),
        )
    }

    // let the cue ring out and the delayed start fire
    fn settle(deck: &mut TransportController) {
        deck.tick(CUE_DELAY_SECS);
    }

    fn park_at(deck: &mut TransportController, index: usize, position: f32) {
        deck.load_track(index, position);
    }

    #[test]
    fn starts_stopped_on_the_first_track() {
        let deck = deck(&[60.0, 60.0, 60.0, 60.0]);
        let status = deck.status();
        assert_eq!(status.state, TransportState::Stopped);
        assert_eq!(status.track_index, 0);
        assert_eq!(status.position, 0.0);
        assert_eq!(status.pitch, 1.0);
        assert_eq!(status.last_command, None);
    }

    #[test]
    fn play_waits_for_the_cue_then_loops_the_track() {
        let mut deck = deck(&[60.0, 60.0, 60.0, 60.0]);
        assert_eq!(deck.play(), Outcome::Applied);
        assert_eq!(deck.state(), TransportState::Playing);
        assert!(deck.cue().is_playing());
        assert!(!deck.song().is_sounding());
        assert!(deck.song().looping());

        deck.tick(4.0);
        assert!(!deck.song().is_sounding());
        deck.tick(2.0);
        assert!(deck.song().is_sounding());
        assert_abs_diff_eq!(deck.tracks().position(), 1.0);
    }

    #[test]
    fn play_refuses_while_anything_is_sounding() {
        let mut deck = deck(&[60.0, 60.0, 60.0, 60.0]);
        deck.play();
        let seq = deck.status().command_seq;

        // the play cue is still ringing
        assert_eq!(deck.play(), Outcome::Ignored(Ignored::Busy));
        settle(&mut deck);
        // now the track itself is sounding
        assert_eq!(deck.play(), Outcome::Ignored(Ignored::Busy));
        assert_eq!(deck.status().command_seq, seq);
        assert_eq!(deck.state(), TransportState::Playing);
    }

    #[test]
    fn stop_keeps_the_position_for_resuming() {
        let mut deck = deck(&[60.0, 60.0, 60.0, 60.0]);
        deck.play();
        settle(&mut deck);
        deck.tick(10.0);
        deck.stop();

        assert_eq!(deck.state(), TransportState::Stopped);
        assert!(!deck.song().is_playing());
        assert_eq!(deck.tracks().position(), 10.0);

        deck.tick(1.0); // stop cue rings out
        assert_eq!(deck.play(), Outcome::Applied);
        settle(&mut deck);
        assert_eq!(deck.tracks().position(), 10.0);
    }

    #[test]
    fn pause_toggles_between_paused_and_playing() {
        let mut deck = deck(&[60.0, 60.0, 60.0, 60.0]);
        deck.play();
        settle(&mut deck);
        deck.tick(3.0);

        deck.pause();
        assert_eq!(deck.state(), TransportState::Paused);
        assert_eq!(deck.tracks().position(), 3.0);

        deck.pause();
        assert_eq!(deck.state(), TransportState::Playing);
        assert!(deck.song().is_scheduled());
        settle(&mut deck);
        assert_eq!(deck.tracks().position(), 3.0);
        deck.tick(1.0);
        assert_eq!(deck.tracks().position(), 4.0);
    }

    #[test]
    fn fast_forward_runs_at_triple_speed() {
        let mut deck = deck(&[60.0, 60.0, 60.0, 60.0]);
        deck.play();
        settle(&mut deck);
        deck.tick(2.0);

        deck.fast_forward();
        assert_eq!(deck.state(), TransportState::FastForwarding);
        assert_eq!(deck.song().pitch(), 3.0);
        settle(&mut deck);
        deck.tick(1.0);
        assert_eq!(deck.tracks().position(), 5.0);
    }

    #[test]
    fn fast_forward_into_the_end_restarts_at_normal_speed() {
        let mut deck = deck(&[12.0, 60.0, 60.0, 60.0]);
        deck.fast_forward();
        settle(&mut deck);
        deck.tick(3.0); // 9s in
        assert_eq!(deck.state(), TransportState::FastForwarding);

        deck.tick(1.5); // would be 13.5s
        assert_eq!(deck.state(), TransportState::Playing);
        assert_eq!(deck.song().pitch(), 1.0);
        assert_eq!(deck.tracks().position(), 0.0);
        assert!(deck.song().is_sounding());
    }

    #[test]
    fn fast_forward_from_the_very_end_resets_immediately() {
        let mut deck = deck(&[12.0, 60.0, 60.0, 60.0]);
        park_at(&mut deck, 0, 12.0);
        deck.fast_forward();

        assert_eq!(deck.state(), TransportState::Playing);
        assert_eq!(deck.song().pitch(), 1.0);
        assert_eq!(deck.tracks().position(), 0.0);
        assert!(deck.song().is_sounding());
    }

    #[test]
    fn next_from_the_last_track_wraps_and_restarts_when_too_long() {
        let mut deck = deck(&[8.0, 60.0, 60.0, 60.0]);
        park_at(&mut deck, 3, 10.0);
        deck.next();

        assert_eq!(deck.tracks().current_index(), 0);
        assert_eq!(deck.tracks().position(), 0.0);
        assert_eq!(deck.song().time(), 0.0);
        assert_eq!(deck.song().clip(), deck.tracks().get(0).map(|t| t.clip));
    }

    #[test]
    fn next_from_the_last_track_carries_over_when_it_fits() {
        let mut deck = deck(&[15.0, 60.0, 60.0, 60.0]);
        park_at(&mut deck, 3, 10.0);
        deck.next();

        assert_eq!(deck.tracks().current_index(), 0);
        assert_eq!(deck.tracks().position(), 10.0);
        assert_eq!(deck.state(), TransportState::Playing);
        assert!(deck.song().is_scheduled());
        settle(&mut deck);
        assert_eq!(deck.tracks().position(), 10.0);
    }

    #[test]
    fn previous_from_the_first_track_wraps_to_the_last() {
        let mut deck = deck(&[60.0, 60.0, 60.0, 5.0]);
        park_at(&mut deck, 0, 7.0);
        deck.previous();
        assert_eq!(deck.tracks().current_index(), 3);
        assert_eq!(deck.tracks().position(), 0.0);
    }

    #[test]
    fn previous_from_the_first_track_carries_over_when_it_fits() {
        let mut deck = deck(&[60.0, 60.0, 60.0, 20.0]);
        park_at(&mut deck, 0, 7.0);
        deck.previous();

        assert_eq!(deck.tracks().current_index(), 3);
        assert_eq!(deck.tracks().position(), 7.0);
        assert_eq!(deck.state(), TransportState::Playing);
        assert!(deck.song().is_scheduled());
        settle(&mut deck);
        assert_eq!(deck.tracks().position(), 7.0);
        deck.tick(1.0);
        assert_eq!(deck.tracks().position(), 8.0);
    }

    #[test]
    fn next_then_previous_restores_the_track() {
        let mut deck = deck(&[60.0, 60.0, 60.0, 60.0]);
        for start in 0..4 {
            park_at(&mut deck, start, 0.0);
            deck.next();
            deck.previous();
            assert_eq!(deck.tracks().current_index(), start);
        }
    }

    #[test]
    fn switching_tracks_drops_fast_forward_pitch() {
        let mut deck = deck(&[60.0, 60.0, 60.0, 60.0]);
        deck.fast_forward();
        deck.next();
        assert_eq!(deck.song().pitch(), 1.0);
        assert_eq!(deck.state(), TransportState::Playing);
    }

    #[test]
    fn reset_goes_back_to_the_first_track_even_while_playing() {
        let mut deck = deck(&[60.0, 60.0, 60.0, 60.0]);
        deck.play();
        settle(&mut deck);
        deck.next();
        settle(&mut deck);
        deck.tick(4.0);

        assert_eq!(deck.reset(), Outcome::Applied);
        assert_eq!(deck.tracks().current_index(), 0);
        assert_eq!(deck.tracks().position(), 0.0);
        assert_eq!(deck.state(), TransportState::Playing);
        settle(&mut deck);
        assert!(deck.song().is_sounding());
    }

    #[test]
    fn every_button_rings_its_cue_once() {
        let mut deck = deck(&[60.0, 60.0, 60.0, 60.0]);
        deck.play();
        deck.stop();
        deck.pause();
        deck.fast_forward();
        deck.next();
        deck.previous();
        deck.reset();
        assert_eq!(deck.cue().one_shots_ringing(), 7);
        assert_eq!(deck.status().command_seq, 7);
        assert_eq!(deck.status().last_command, Some(TransportOp::Reset));
    }

    #[test]
    fn stop_during_the_cue_window_cancels_the_pending_start() {
        let mut deck = deck(&[60.0, 60.0, 60.0, 60.0]);
        deck.play();
        deck.tick(2.0);
        deck.stop();
        deck.tick(10.0);
        assert!(!deck.song().is_playing());
        assert_eq!(deck.tracks().position(), 0.0);
    }

    #[test]
    fn halt_silences_track_and_cue_and_keeps_the_position() {
        let mut deck = deck(&[60.0, 60.0, 60.0, 60.0]);
        deck.fast_forward();
        settle(&mut deck);
        deck.tick(2.0);
        deck.next(); // cue ringing, start pending
        let seq = deck.status().command_seq;

        deck.halt();
        let status = deck.status();
        assert_eq!(status.state, TransportState::Stopped);
        assert!(!status.sounding);
        assert!(!deck.cue().is_playing());
        assert_eq!(status.pitch, 1.0);
        assert_eq!(status.command_seq, seq);

        deck.tick(10.0);
        assert!(!deck.song().is_playing());
        assert_eq!(deck.tracks().current_index(), 1);
        assert_eq!(deck.play(), Outcome::Applied);
    }

    #[test]
    fn volume_is_clamped() {
        let mut deck = deck(&[60.0]);
        deck.set_volume(1.5);
        assert_eq!(deck.status().volume, 1.0);
        deck.set_volume(-0.5);
        assert_eq!(deck.status().volume, 0.0);
    }
}
