use serde::{Deserialize, Serialize};

use crate::channel::{MAX_PITCH, MIN_PITCH};
use crate::error::{DeckError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresetState {
    Calm,
    ExcitedTrue,
    ExcitedFalse,
    Moderate,
}

impl PresetState {
    pub const ALL: [PresetState; 4] = [
        PresetState::Calm,
        PresetState::ExcitedTrue,
        PresetState::ExcitedFalse,
        PresetState::Moderate,
    ];

    // Quietest to loudest; preset volumes must rise strictly along this order.
    pub const BY_INTENSITY: [PresetState; 4] = [
        PresetState::Calm,
        PresetState::Moderate,
        PresetState::ExcitedTrue,
        PresetState::ExcitedFalse,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            PresetState::Calm => "CALM",
            PresetState::ExcitedTrue => "EXCITED/TRUE",
            PresetState::ExcitedFalse => "EXCITED/FALSE",
            PresetState::Moderate => "MODERATE",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChannelParams {
    pub pitch: f32,
    pub volume: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParameterPreset {
    pub state: PresetState,
    pub pulse: ChannelParams,
    pub respiration: ChannelParams,
}

// Measurements for one state, normalised against the calm baselines to get pitch.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateReading {
    pub pulse_bpm: f32,
    pub pulse_gain: f32,
    pub pulse_volume: f32,
    pub respiration_rate: f32,
    pub respiration_gain: f32,
    pub respiration_volume: f32,
}

// How the bank is derived: pitch = reading / baseline × gain.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresetDerivation {
    pub pulse_baseline_bpm: f32,
    pub respiration_baseline_rate: f32,
    pub calm: StateReading,
    pub excited_true: StateReading,
    pub excited_false: StateReading,
    pub moderate: StateReading,
}

impl Default for PresetDerivation {
    // 80 bpm and 17 breaths/min play at pitch 1.0
    fn default() -> Self {
        Self {
            pulse_baseline_bpm: 80.0,
            respiration_baseline_rate: 17.0,
            calm: StateReading {
                pulse_bpm: 40.0,
                pulse_gain: 1.0,
                pulse_volume: 0.25,
                respiration_rate: 12.0,
                respiration_gain: 1.0,
                respiration_volume: 0.25,
            },
            excited_true: StateReading {
                pulse_bpm: 95.0,
                pulse_gain: 1.15,
                pulse_volume: 0.75,
                respiration_rate: 21.0,
                respiration_gain: 1.25,
                respiration_volume: 0.75,
            },
            excited_false: StateReading {
                pulse_bpm: 128.5,
                pulse_gain: 1.25,
                pulse_volume: 1.0,
                respiration_rate: 25.0,
                respiration_gain: 2.0,
                respiration_volume: 1.0,
            },
            moderate: StateReading {
                pulse_bpm: 80.0,
                pulse_gain: 1.05,
                pulse_volume: 0.5,
                respiration_rate: 17.0,
                respiration_gain: 1.05,
                respiration_volume: 0.5,
            },
        }
    }
}

impl PresetDerivation {
    pub fn reading(&self, state: PresetState) -> &StateReading {
        match state {
            PresetState::Calm => &self.calm,
            PresetState::ExcitedTrue => &self.excited_true,
            PresetState::ExcitedFalse => &self.excited_false,
            PresetState::Moderate => &self.moderate,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ParameterPresetBank {
    presets: [ParameterPreset; 4],
}

impl Default for ParameterPresetBank {
    fn default() -> Self {
        Self::build(&PresetDerivation::default())
    }
}

impl ParameterPresetBank {
    pub fn derive(derivation: &PresetDerivation) -> Result<Self> {
        if !(derivation.pulse_baseline_bpm > 0.0 && derivation.respiration_baseline_rate > 0.0) {
            return Err(DeckError::InvalidPreset("baselines must be positive".into()));
        }
        let bank = Self::build(derivation);
        bank.validate()?;
        Ok(bank)
    }

    fn build(d: &PresetDerivation) -> Self {
        let presets = PresetState::ALL.map(|state| {
            let r = d.reading(state);
            ParameterPreset {
                state,
                pulse: ChannelParams {
                    pitch: r.pulse_bpm / d.pulse_baseline_bpm * r.pulse_gain,
                    volume: r.pulse_volume,
                },
                respiration: ChannelParams {
                    pitch: r.respiration_rate / d.respiration_baseline_rate * r.respiration_gain,
                    volume: r.respiration_volume,
                },
            }
        });
        Self { presets }
    }

    fn validate(&self) -> Result<()> {
        for preset in &self.presets {
            for (name, p) in [("pulse", preset.pulse), ("respiration", preset.respiration)] {
                if !(MIN_PITCH..=MAX_PITCH).contains(&p.pitch) {
                    return Err(DeckError::InvalidPreset(format!(
                        "{} {name} pitch {:.3} outside {MIN_PITCH}..={MAX_PITCH}",
                        preset.state.label(),
                        p.pitch
                    )));
                }
                if !(0.0..=1.0).contains(&p.volume) {
                    return Err(DeckError::InvalidPreset(format!(
                        "{} {name} volume {:.3} outside 0..=1",
                        preset.state.label(),
                        p.volume
                    )));
                }
            }
        }

        for pair in PresetState::BY_INTENSITY.windows(2) {
            let (quieter, louder) = (self.get(pair[0]), self.get(pair[1]));
            if quieter.pulse.volume >= louder.pulse.volume
                || quieter.respiration.volume >= louder.respiration.volume
            {
                return Err(DeckError::InvalidPreset(format!(
                    "{} must be louder than {}",
                    louder.state.label(),
                    quieter.state.label()
                )));
            }
        }
        Ok(())
    }

    pub fn get(&self, state: PresetState) -> &ParameterPreset {
        &self.presets[state.index()]
    }
}
