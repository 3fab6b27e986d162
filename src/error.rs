use std::path::PathBuf;

// Everything that can go wrong while building a deck. Once the deck is running,
// control-path anomalies are reported as `Outcome::Ignored` instead.
#[derive(Debug, thiserror::Error)]
pub enum DeckError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    #[error("unsupported sample format in {path}: {detail}")]
    UnsupportedFormat { path: PathBuf, detail: String },

    #[error("a track set needs at least one track")]
    EmptyTrackSet,

    #[error("clip `{0}` has neither a path nor a length")]
    UnsizedClip(String),

    #[error("Invalid preset: {0}")]
    InvalidPreset(String),
}

pub type Result<T> = std::result::Result<T, DeckError>;
