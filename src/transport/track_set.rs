use crate::audio_api::Clip;
use crate::error::{DeckError, Result};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Track {
    pub index: usize,
    pub clip: Clip,
}

impl Track {
    pub fn duration(&self) -> f32 {
        self.clip.length
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

// The loaded tracks plus which one is current and where in it we are.
#[derive(Clone, Debug)]
pub struct TrackSet {
    tracks: Vec<Track>,
    current: usize,
    position: f32,
}

impl TrackSet {
    pub fn new(clips: impl IntoIterator<Item = Clip>) -> Result<Self> {
        let tracks: Vec<Track> = clips
            .into_iter()
            .enumerate()
            .map(|(index, clip)| Track { index, clip })
            .collect();
        if tracks.is_empty() {
            return Err(DeckError::EmptyTrackSet);
        }
        Ok(Self { tracks, current: 0, position: 0.0 })
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> &Track {
        &self.tracks[self.current]
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn position(&self) -> f32 {
        self.position
    }

    pub fn at_end(&self) -> bool {
        self.position >= self.current().duration()
    }

    pub(crate) fn record_position(&mut self, seconds: f32) {
        self.position = seconds.max(0.0);
    }

    // Index one step away from the current track, wrapping at both ends.
    pub fn neighbour(&self, direction: Direction) -> usize {
        let n = self.tracks.len();
        match direction {
            Direction::Forward => (self.current + 1) % n,
            Direction::Backward => (self.current + n - 1) % n,
        }
    }

    // Where playback lands when switching to `target` from `elapsed` seconds into the
    // current track: carried over if it fits, otherwise back to the top.
    pub fn resume_point(&self, elapsed: f32, target: usize) -> f32 {
        match self.tracks.get(target) {
            Some(track) if elapsed < track.duration() => elapsed.max(0.0),
            _ => 0.0,
        }
    }

    pub(crate) fn select(&mut self, index: usize, position: f32) {
        self.current = index.min(self.tracks.len() - 1);
        self.position = position.max(0.0);
    }
}
