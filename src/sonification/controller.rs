use crate::audio_api::AudioChannel;
use crate::channel::{Channel, MAX_PITCH, MIN_PITCH};
use crate::shared::{ALERT_VOLUME, Ignored, Outcome};

use super::preset::{ParameterPresetBank, PresetState};
use super::{AlertConfidence, AlertKind, AmbientChannel};

pub const AMBIENT_START_VOLUME: f32 = 0.5;

// Every channel the board owns. The controller is the only thing that touches them.
#[derive(Clone, Debug)]
pub struct SonificationChannels<C: AudioChannel = Channel> {
    pub ambient: C,
    pub pulse: C,
    pub respiration: C,
    pub gsr: C,
    pub truth: C,
    pub lie: C,
    pub alert: C,
}

impl<C: AudioChannel> SonificationChannels<C> {
    fn each_mut(&mut self) -> [&mut C; 7] {
        [
            &mut self.ambient,
            &mut self.pulse,
            &mut self.respiration,
            &mut self.gsr,
            &mut self.truth,
            &mut self.lie,
            &mut self.alert,
        ]
    }

    fn alerts_mut(&mut self) -> [&mut C; 4] {
        [&mut self.gsr, &mut self.truth, &mut self.lie, &mut self.alert]
    }

    fn for_alert_mut(&mut self, kind: AlertKind) -> &mut C {
        match kind {
            AlertKind::Truth => &mut self.truth,
            AlertKind::Lie => &mut self.lie,
            AlertKind::Gsr => &mut self.gsr,
        }
    }

    pub fn ambient_channel(&self, which: AmbientChannel) -> &C {
        match which {
            AmbientChannel::Pulse => &self.pulse,
            AmbientChannel::Respiration => &self.respiration,
        }
    }

    fn ambient_channel_mut(&mut self, which: AmbientChannel) -> &mut C {
        match which {
            AmbientChannel::Pulse => &mut self.pulse,
            AmbientChannel::Respiration => &mut self.respiration,
        }
    }

    pub fn any_playing(&self) -> bool {
        [
            &self.ambient,
            &self.pulse,
            &self.respiration,
            &self.gsr,
            &self.truth,
            &self.lie,
            &self.alert,
        ]
        .iter()
        .any(|c| c.is_playing())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SonificationSettings {
    pub alert_volume: f32,
    pub gsr_control_enabled: bool,
    pub ambient_on_start: bool,
    pub confidence: AlertConfidence,
}

impl Default for SonificationSettings {
    fn default() -> Self {
        Self {
            alert_volume: ALERT_VOLUME,
            gsr_control_enabled: true,
            ambient_on_start: true,
            confidence: AlertConfidence::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChannelStatus {
    pub pitch: f32,
    pub volume: f32,
    pub playing: bool,
    pub elapsed: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SonificationStatus {
    pub preset: Option<PresetState>,
    pub last_alert: Option<AlertKind>,
    pub alert_active: bool,
    pub ambient_enabled: bool,
    pub gsr_control_enabled: bool,
    pub progress: f32,
    pub pulse: ChannelStatus,
    pub respiration: ChannelStatus,
    pub confidence: AlertConfidence,
}

// The lie-detector board: presets on the pulse/respiration loops plus alert stingers.
pub struct SonificationController<C: AudioChannel = Channel> {
    channels: SonificationChannels<C>,
    bank: ParameterPresetBank,
    confidence: AlertConfidence,
    alert_volume: f32,
    gsr_control_enabled: bool,
    ambient_enabled: bool,
    alert_active: bool,
    progress: f32,
    pulse_elapsed: f32,
    respiration_elapsed: f32,
    alert_elapsed: [f32; AlertKind::COUNT],
    preset: Option<PresetState>,
    last_alert: Option<AlertKind>,
}

impl<C: AudioChannel> SonificationController<C> {
    pub fn new(mut channels: SonificationChannels<C>, bank: ParameterPresetBank, settings: SonificationSettings) -> Self {
        for kind in AlertKind::ALL {
            channels.for_alert_mut(kind).set_volume(settings.alert_volume);
        }
        // loops idle at nominal speed, half volume, until a preset says otherwise
        for ch in [&mut channels.pulse, &mut channels.respiration] {
            ch.set_pitch(1.0);
            ch.set_volume(AMBIENT_START_VOLUME);
        }
        Self {
            channels,
            bank,
            confidence: settings.confidence.clamped(),
            alert_volume: settings.alert_volume,
            gsr_control_enabled: settings.gsr_control_enabled,
            ambient_enabled: settings.ambient_on_start,
            alert_active: false,
            progress: 0.0,
            pulse_elapsed: 0.0,
            respiration_elapsed: 0.0,
            alert_elapsed: [0.0; AlertKind::COUNT],
            preset: None,
            last_alert: None,
        }
    }

    pub fn channels(&self) -> &SonificationChannels<C> {
        &self.channels
    }

    pub fn alert_elapsed(&self, kind: AlertKind) -> f32 {
        self.alert_elapsed[kind.index()]
    }

    // Switch both ambient loops to the parameters of `state` and restart them together.
    pub fn apply_preset(&mut self, state: PresetState) -> Outcome {
        let preset = *self.bank.get(state);
        log::debug!("applying preset {}", state.label());

        for ch in [&mut self.channels.alert, &mut self.channels.pulse, &mut self.channels.respiration] {
            ch.stop();
        }

        for (ch, params) in [
            (&mut self.channels.pulse, preset.pulse),
            (&mut self.channels.respiration, preset.respiration),
        ] {
            ch.set_pitch(params.pitch);
            ch.set_volume(params.volume);
            ch.set_looping(true);
        }
        self.pulse_elapsed = 0.0;
        self.respiration_elapsed = 0.0;
        self.channels.pulse.play();
        self.channels.respiration.play();

        self.progress = 0.0;
        self.ambient_enabled = true;
        self.preset = Some(state);
        Outcome::Applied
    }

    // Play the stinger for `kind` at its confidence pitch, then move to its preset.
    pub fn trigger_alert(&mut self, kind: AlertKind) -> Outcome {
        if kind == AlertKind::Gsr && !self.gsr_control_enabled {
            log::debug!("gsr alert ignored: control disabled");
            return Outcome::Ignored(Ignored::ControlDisabled);
        }
        self.alert_active = true;
        self.last_alert = Some(kind);

        let pitch = self.confidence.get(kind);
        let volume = self.alert_volume;
        let ch = self.channels.for_alert_mut(kind);
        ch.set_pitch(pitch);
        ch.set_volume(volume);
        self.alert_elapsed[kind.index()] = ch.time();
        ch.set_looping(false);
        ch.stop();
        ch.play();
        log::debug!("{} alert at pitch {pitch:.2}", kind.label());

        self.progress = 0.0;
        self.apply_preset(kind.preset())
    }

    pub fn stop_all(&mut self) -> Outcome {
        for ch in self.channels.each_mut() {
            ch.stop();
        }
        self.ambient_enabled = false;
        self.alert_active = false;
        self.progress = 0.0;
        self.pulse_elapsed = 0.0;
        self.respiration_elapsed = 0.0;
        Outcome::Applied
    }

    // Silence the stingers only; the ambient loops carry on.
    pub fn stop_alerts_only(&mut self) -> Outcome {
        for ch in self.channels.alerts_mut() {
            ch.stop();
        }
        self.ambient_enabled = true;
        self.alert_active = false;
        self.progress = 0.0;
        Outcome::Applied
    }

    pub fn start_ambient(&mut self, which: AmbientChannel) -> Outcome {
        self.ambient_enabled = true;
        self.restart(which);
        Outcome::Applied
    }

    pub fn set_pitch(&mut self, which: AmbientChannel, pitch: f32) {
        self.channels.ambient_channel_mut(which).set_pitch(pitch.clamp(MIN_PITCH, MAX_PITCH));
    }

    pub fn set_volume(&mut self, which: AmbientChannel, volume: f32) {
        self.channels.ambient_channel_mut(which).set_volume(volume.clamp(0.0, 1.0));
    }

    pub fn set_confidence(&mut self, kind: AlertKind, pitch: f32) {
        self.confidence.set(kind, pitch);
    }

    pub fn set_gsr_control_enabled(&mut self, enabled: bool) {
        self.gsr_control_enabled = enabled;
    }

    pub fn gsr_control_enabled(&self) -> bool {
        self.gsr_control_enabled
    }

    // Per-frame duty: keep the ambient loops cycling, or keep everything quiet.
    pub fn tick(&mut self, dt: f32) {
        for ch in self.channels.each_mut() {
            ch.advance(dt);
        }
        if !self.ambient_enabled {
            self.stop_all();
            return;
        }

        self.progress += dt;
        self.pulse_elapsed += dt;
        self.respiration_elapsed += dt;
        for which in [AmbientChannel::Pulse, AmbientChannel::Respiration] {
            let length = self.channels.ambient_channel(which).clip().map_or(0.0, |c| c.length);
            if length > 0.0 && self.elapsed(which) >= length {
                self.restart(which);
            }
        }
    }

    pub fn status(&self) -> SonificationStatus {
        let channel_status = |which: AmbientChannel| {
            let ch = self.channels.ambient_channel(which);
            ChannelStatus {
                pitch: ch.pitch(),
                volume: ch.volume(),
                playing: ch.is_playing(),
                elapsed: self.elapsed(which),
            }
        };
        SonificationStatus {
            preset: self.preset,
            last_alert: self.last_alert,
            alert_active: self.alert_active,
            ambient_enabled: self.ambient_enabled,
            gsr_control_enabled: self.gsr_control_enabled,
            progress: self.progress,
            pulse: channel_status(AmbientChannel::Pulse),
            respiration: channel_status(AmbientChannel::Respiration),
            confidence: self.confidence,
        }
    }

    fn elapsed(&self, which: AmbientChannel) -> f32 {
        match which {
            AmbientChannel::Pulse => self.pulse_elapsed,
            AmbientChannel::Respiration => self.respiration_elapsed,
        }
    }

    fn restart(&mut self, which: AmbientChannel) {
        let ch = self.channels.ambient_channel_mut(which);
        ch.stop();
        ch.play();
        match which {
            AmbientChannel::Pulse => self.pulse_elapsed = 0.0,
            AmbientChannel::Respiration => self.respiration_elapsed = 0.0,
        }
    }
}
