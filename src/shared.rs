// The control surface and status surface shared between the middle layer and the TUI.
//
// The TUI only ever produces `InputEvent`s and draws a `DisplayState`; every decision
// about what a key press means for playback lives in the controllers behind `Middle`.

use crate::sonification::{AlertKind, AmbientChannel, PresetState, SonificationStatus};
use crate::transport::TransportStatus;

pub const NUM_TRACKS: usize = 4;
pub const CUE_DELAY_SECS: f32 = 5.0;
pub const FAST_FORWARD_PITCH: f32 = 3.0;
pub const CUE_VOLUME: f32 = 0.7;
pub const ALERT_VOLUME: f32 = 0.75;

// What became of a control-surface call. Nothing on the control path ever errors;
// refused calls leave all state untouched and say why.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Ignored(Ignored),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ignored {
    // Something is already sounding (Play while the track or a cue is playing).
    Busy,
    // The control that triggers this is switched off (GSR alert).
    ControlDisabled,
}

impl Outcome {
    pub fn is_applied(self) -> bool {
        self == Outcome::Applied
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    // 8-track transport
    Play,
    Stop,
    Pause,
    FastForward,
    Next,
    Previous,
    Reset,
    AdjustTrackVolume(f32),

    // lie detector board
    ApplyPreset(PresetState),
    TriggerAlert(AlertKind),
    StopAll,
    StopAlertsOnly,
    StartAmbient(AmbientChannel),
    AdjustPitch(AmbientChannel, f32),
    AdjustVolume(AmbientChannel, f32),
    AdjustConfidence(AlertKind, f32),
    ToggleGsrControl,

    Quit,
}

#[derive(Clone, Debug)]
pub struct DisplayState {
    pub transport: TransportStatus,
    pub detector: SonificationStatus,
    pub notice: String, // last refused command, blank when the last one went through
}
