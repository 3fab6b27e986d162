// The 8-track player: a fixed set of tracks driven by cue-confirmed transport buttons.

mod controller;
mod track_set;

pub use controller::{CueBank, TransportController, TransportSettings, TransportStatus};
pub use track_set::{Direction, Track, TrackSet};

// Exactly one of these holds at any time; a fresh controller starts `Stopped`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransportState {
    Stopped,
    Playing,
    Paused,
    FastForwarding,
}

impl TransportState {
    pub fn label(self) -> &'static str {
        match self {
            TransportState::Stopped => "STOPPED",
            TransportState::Playing => "PLAYING",
            TransportState::Paused => "PAUSED",
            TransportState::FastForwarding => "FF >>",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransportOp {
    Play,
    Stop,
    Pause,
    FastForward,
    Next,
    Previous,
    Reset,
}

impl TransportOp {
    pub const COUNT: usize = 7;
    pub const ALL: [TransportOp; TransportOp::COUNT] = [
        TransportOp::Play,
        TransportOp::Stop,
        TransportOp::Pause,
        TransportOp::FastForward,
        TransportOp::Next,
        TransportOp::Previous,
        TransportOp::Reset,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            TransportOp::Play => "play",
            TransportOp::Stop => "stop",
            TransportOp::Pause => "pause",
            TransportOp::FastForward => "fast-forward",
            TransportOp::Next => "next",
            TransportOp::Previous => "previous",
            TransportOp::Reset => "reset",
        }
    }
}
