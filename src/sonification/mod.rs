// The lie-detector board: two ambient loops (pulse and respiration) whose pitch and
// volume follow the subject's state, plus one-shot alert stingers.

mod controller;
mod preset;

use serde::{Deserialize, Serialize};

use crate::channel::{MAX_PITCH, MIN_PITCH};

pub use controller::{ChannelStatus, SonificationChannels, SonificationController, SonificationSettings, SonificationStatus};
pub use preset::{ChannelParams, ParameterPreset, ParameterPresetBank, PresetDerivation, PresetState, StateReading};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    Truth,
    Lie,
    Gsr,
}

impl AlertKind {
    pub const COUNT: usize = 3;
    pub const ALL: [AlertKind; AlertKind::COUNT] = [AlertKind::Truth, AlertKind::Lie, AlertKind::Gsr];

    pub fn index(self) -> usize {
        self as usize
    }

    // The state the board moves to once the stinger has fired.
    pub fn preset(self) -> PresetState {
        match self {
            AlertKind::Truth => PresetState::ExcitedTrue,
            AlertKind::Lie => PresetState::ExcitedFalse,
            AlertKind::Gsr => PresetState::Moderate,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AlertKind::Truth => "TRUTH",
            AlertKind::Lie => "LIE",
            AlertKind::Gsr => "GSR",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AmbientChannel {
    Pulse,
    Respiration,
}

impl AmbientChannel {
    pub fn label(self) -> &'static str {
        match self {
            AmbientChannel::Pulse => "pulse",
            AmbientChannel::Respiration => "respiration",
        }
    }
}

// Pitch each alert stinger plays at; higher reads as more certain.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfidence {
    pub truth: f32,
    pub lie: f32,
    pub gsr: f32,
}

impl Default for AlertConfidence {
    fn default() -> Self {
        Self { truth: 1.0, lie: 1.0, gsr: 1.0 }
    }
}

impl AlertConfidence {
    pub fn get(&self, kind: AlertKind) -> f32 {
        match kind {
            AlertKind::Truth => self.truth,
            AlertKind::Lie => self.lie,
            AlertKind::Gsr => self.gsr,
        }
    }

    pub fn set(&mut self, kind: AlertKind, pitch: f32) {
        let pitch = pitch.clamp(MIN_PITCH, MAX_PITCH);
        match kind {
            AlertKind::Truth => self.truth = pitch,
            AlertKind::Lie => self.lie = pitch,
            AlertKind::Gsr => self.gsr = pitch,
        }
    }

    pub fn clamped(mut self) -> Self {
        for kind in AlertKind::ALL {
            self.set(kind, self.get(kind));
        }
        self
    }
}
