// Sits between the TUI and the two controllers: turns InputEvents into control calls,
// drives the per-tick duty and assembles the DisplayState.
use std::path::Path;

use crossbeam_channel::Sender;

use crate::audio_api::{AudioChannel, AudioCommand, ChannelId, Clip};
use crate::channel::Channel;
use crate::config::{ClipSource, DeckConfig};
use crate::error::Result;
use crate::loader::clip_loader;
use crate::shared::{DisplayState, Ignored, InputEvent, Outcome};
use crate::sonification::{AlertKind, ParameterPresetBank, SonificationChannels, SonificationController};
use crate::transport::{CueBank, TrackSet, TransportController, TransportOp};

pub struct Middle<C: AudioChannel = Channel> {
    player: TransportController<C>,
    detector: SonificationController<C>,
    notice: String,
}

impl<C: AudioChannel> Middle<C> {
    pub fn new(player: TransportController<C>, detector: SonificationController<C>) -> Self {
        Self { player, detector, notice: String::new() }
    }

    pub fn player(&self) -> &TransportController<C> {
        &self.player
    }

    pub fn detector(&self) -> &SonificationController<C> {
        &self.detector
    }

    pub fn handle_input(&mut self, event: InputEvent) -> Outcome {
        let outcome = match &event {
            InputEvent::Play => self.player.play(),
            InputEvent::Stop => self.player.stop(),
            InputEvent::Pause => self.player.pause(),
            InputEvent::FastForward => self.player.fast_forward(),
            InputEvent::Next => self.player.next(),
            InputEvent::Previous => self.player.previous(),
            InputEvent::Reset => self.player.reset(),
            InputEvent::AdjustTrackVolume(delta) => {
                self.player.set_volume(self.player.status().volume + delta);
                Outcome::Applied
            }

            // a preset (and so an alert) takes the music down with it
            InputEvent::ApplyPreset(state) => self.halt_track_if_applied(|d| d.apply_preset(*state)),
            InputEvent::TriggerAlert(kind) => self.halt_track_if_applied(|d| d.trigger_alert(*kind)),
            InputEvent::StopAll => {
                self.player.halt();
                self.detector.stop_all()
            }
            InputEvent::StopAlertsOnly => self.detector.stop_alerts_only(),
            InputEvent::StartAmbient(which) => self.detector.start_ambient(*which),
            InputEvent::AdjustPitch(which, delta) => {
                let current = self.detector.channels().ambient_channel(*which).pitch();
                self.detector.set_pitch(*which, current + delta);
                Outcome::Applied
            }
            InputEvent::AdjustVolume(which, delta) => {
                let current = self.detector.channels().ambient_channel(*which).volume();
                self.detector.set_volume(*which, current + delta);
                Outcome::Applied
            }
            InputEvent::AdjustConfidence(kind, delta) => {
                let current = self.detector.status().confidence.get(*kind);
                self.detector.set_confidence(*kind, current + delta);
                Outcome::Applied
            }
            InputEvent::ToggleGsrControl => {
                let enabled = !self.detector.gsr_control_enabled();
                self.detector.set_gsr_control_enabled(enabled);
                Outcome::Applied
            }

            InputEvent::Quit => Outcome::Applied,
        };

        self.notice = match outcome {
            Outcome::Applied => String::new(),
            Outcome::Ignored(reason) => {
                let text = refusal_text(&event, reason);
                log::debug!("{text}");
                text
            }
        };
        outcome
    }

    fn halt_track_if_applied(
        &mut self,
        op: impl FnOnce(&mut SonificationController<C>) -> Outcome,
    ) -> Outcome {
        let outcome = op(&mut self.detector);
        if outcome.is_applied() {
            self.player.halt();
        }
        outcome
    }

    pub fn tick(&mut self, dt: f64) {
        let dt = dt as f32;
        self.player.tick(dt);
        self.detector.tick(dt);
    }

    pub fn display_state(&self) -> DisplayState {
        DisplayState {
            transport: self.player.status(),
            detector: self.detector.status(),
            notice: self.notice.clone(),
        }
    }
}

fn refusal_text(event: &InputEvent, reason: Ignored) -> String {
    match (event, reason) {
        (InputEvent::TriggerAlert(kind), Ignored::ControlDisabled) => {
            format!("{} alert ignored: control is off", kind.label())
        }
        (_, Ignored::Busy) => format!("{event:?} ignored: already playing"),
        (_, Ignored::ControlDisabled) => format!("{event:?} ignored: control is off"),
    }
}

// A deck built from config, plus the engine registrations its clips still need.
pub struct Deck {
    pub middle: Middle,
    pub registrations: Vec<AudioCommand>,
}

impl Middle {
    // Load every clip the config names and wire both controllers to fresh channels.
    // With a sender, channels mirror their state to the engine; without one they run silent.
    pub fn from_config(
        config: &DeckConfig,
        config_dir: &Path,
        sample_rate: u32,
        tx: Option<Sender<AudioCommand>>,
    ) -> Result<Deck> {
        let bank = ParameterPresetBank::derive(&config.presets)?;
        let mut wiring = Wiring { config_dir, sample_rate, tx, next_channel: 0, registrations: Vec::new() };

        let transport = &config.transport;
        let mut tracks = Vec::with_capacity(transport.tracks.len());
        for (i, source) in transport.tracks.iter().enumerate() {
            tracks.push(wiring.clip(&format!("track {i}"), source)?);
        }
        let tracks = TrackSet::new(tracks)?;

        let mut cues = CueBank::new();
        for op in TransportOp::ALL {
            if let Some(source) = transport.cues.get(op) {
                cues = cues.with(op, wiring.clip(&format!("{} cue", op.label()), source)?);
            }
        }

        let song = wiring.channel(None);
        let cue = wiring.channel(None);
        let player = TransportController::new(tracks, song, cue, cues, transport.settings());

        let d = &config.detector;
        let channels = SonificationChannels {
            ambient: wiring.clip_channel("ambient", &d.ambient)?,
            pulse: wiring.clip_channel("pulse", &d.pulse)?,
            respiration: wiring.clip_channel("respiration", &d.respiration)?,
            gsr: wiring.clip_channel(AlertKind::Gsr.label(), &d.gsr)?,
            truth: wiring.clip_channel(AlertKind::Truth.label(), &d.truth)?,
            lie: wiring.clip_channel(AlertKind::Lie.label(), &d.lie)?,
            alert: wiring.clip_channel("alert", &d.alert)?,
        };
        let detector = SonificationController::new(channels, bank, d.settings());

        log::info!(
            "deck ready: {} tracks, {} channels, {} clips to register",
            player.tracks().len(),
            wiring.next_channel,
            wiring.registrations.len()
        );
        Ok(Deck { middle: Middle::new(player, detector), registrations: wiring.registrations })
    }
}

struct Wiring<'a> {
    config_dir: &'a Path,
    sample_rate: u32,
    tx: Option<Sender<AudioCommand>>,
    next_channel: u16,
    registrations: Vec<AudioCommand>,
}

impl Wiring<'_> {
    fn clip(&mut self, name: &str, source: &ClipSource) -> Result<Clip> {
        let loaded = clip_loader::load(name, source, self.config_dir, self.sample_rate)?;
        let (clip, register) = loaded.register();
        self.registrations.extend(register);
        Ok(clip)
    }

    fn channel(&mut self, clip: Option<Clip>) -> Channel {
        let mut channel = Channel::new(ChannelId(self.next_channel));
        self.next_channel += 1;
        if let Some(clip) = clip {
            channel = channel.with_clip(clip);
        }
        if let Some(tx) = &self.tx {
            channel = channel.with_sender(tx.clone());
        }
        channel
    }

    fn clip_channel(&mut self, name: &str, source: &ClipSource) -> Result<Channel> {
        let clip = self.clip(name, source)?;
        Ok(self.channel(Some(clip)))
    }
}
