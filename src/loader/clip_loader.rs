use std::path::Path;

use crate::audio::{next_clip_id, SampleBuffer};
use crate::audio_api::{AudioCommand, Clip};
use crate::config::ClipSource;
use crate::error::{DeckError, Result};

// A clip ready for the control side, plus the decoded audio the engine still needs.
#[derive(Debug)]
pub struct LoadedClip {
    pub clip: Clip,
    pub buffer: Option<SampleBuffer>,
}

impl LoadedClip {
    pub fn register(self) -> (Clip, Option<AudioCommand>) {
        let cmd = self.buffer.map(|buffer| AudioCommand::RegisterClip { id: self.clip.id, buffer });
        (self.clip, cmd)
    }
}

// Decode a WAV from disk (relative to `base_dir`) or mint a silent clip of the given length.
pub fn load(name: &str, source: &ClipSource, base_dir: &Path, sample_rate: u32) -> Result<LoadedClip> {
    let id = next_clip_id();
    match (&source.path, source.length_secs) {
        (Some(path), _) => {
            let path = base_dir.join(path);
            let buffer = SampleBuffer::load_wav(&path, sample_rate)?;
            let length = buffer.duration_secs(sample_rate);
            log::debug!("clip `{name}`: {} ({length:.2}s)", path.display());
            Ok(LoadedClip { clip: Clip::new(id, length), buffer: Some(buffer) })
        }
        (None, Some(length)) => Ok(LoadedClip { clip: Clip::new(id, length), buffer: None }),
        (None, None) => Err(DeckError::UnsizedClip(name.to_string())),
    }
}
