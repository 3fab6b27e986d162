// Deck configuration, read once at startup from <dir>/cuedeck.json.
//
// Every field has a default so a partial file (or no file at all) still gives a
// playable deck; clips without a path play as silence of the given length.
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::shared::{ALERT_VOLUME, CUE_DELAY_SECS, CUE_VOLUME, FAST_FORWARD_PITCH, NUM_TRACKS};
use crate::sonification::{AlertConfidence, PresetDerivation, SonificationSettings};
use crate::transport::{TransportOp, TransportSettings};

pub const CONFIG_FILE: &str = "cuedeck.json";

// Where a clip comes from. Relative paths are taken from the config directory.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipSource {
    pub path: Option<PathBuf>,
    pub length_secs: Option<f32>,
}

impl ClipSource {
    pub fn silent(length_secs: f32) -> Self {
        Self { path: None, length_secs: Some(length_secs) }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self { path: Some(path.into()), length_secs: None }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CueSources {
    pub play: Option<ClipSource>,
    pub stop: Option<ClipSource>,
    pub pause: Option<ClipSource>,
    pub fast_forward: Option<ClipSource>,
    pub next: Option<ClipSource>,
    pub previous: Option<ClipSource>,
    pub reset: Option<ClipSource>,
}

impl Default for CueSources {
    fn default() -> Self {
        let click = || Some(ClipSource::silent(1.0));
        Self {
            play: click(),
            stop: click(),
            pause: click(),
            fast_forward: click(),
            next: click(),
            previous: click(),
            reset: click(),
        }
    }
}

impl CueSources {
    pub fn get(&self, op: TransportOp) -> Option<&ClipSource> {
        match op {
            TransportOp::Play => self.play.as_ref(),
            TransportOp::Stop => self.stop.as_ref(),
            TransportOp::Pause => self.pause.as_ref(),
            TransportOp::FastForward => self.fast_forward.as_ref(),
            TransportOp::Next => self.next.as_ref(),
            TransportOp::Previous => self.previous.as_ref(),
            TransportOp::Reset => self.reset.as_ref(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    pub cue_delay_secs: f32,
    pub fast_forward_pitch: f32,
    pub cue_volume: f32,
    pub tracks: Vec<ClipSource>,
    pub cues: CueSources,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            cue_delay_secs: CUE_DELAY_SECS,
            fast_forward_pitch: FAST_FORWARD_PITCH,
            cue_volume: CUE_VOLUME,
            tracks: vec![ClipSource::silent(180.0); NUM_TRACKS],
            cues: CueSources::default(),
        }
    }
}

impl TransportConfig {
    pub fn settings(&self) -> TransportSettings {
        TransportSettings {
            cue_delay: self.cue_delay_secs.max(0.0),
            fast_forward_pitch: self.fast_forward_pitch,
            cue_volume: self.cue_volume.clamp(0.0, 1.0),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    pub ambient: ClipSource,
    pub pulse: ClipSource,
    pub respiration: ClipSource,
    pub gsr: ClipSource,
    pub truth: ClipSource,
    pub lie: ClipSource,
    pub alert: ClipSource,
    pub alert_volume: f32,
    pub gsr_control_enabled: bool,
    pub ambient_on_start: bool,
    pub confidence: AlertConfidence,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            ambient: ClipSource::silent(120.0),
            pulse: ClipSource::silent(1.0),
            respiration: ClipSource::silent(4.0),
            gsr: ClipSource::silent(1.5),
            truth: ClipSource::silent(1.5),
            lie: ClipSource::silent(1.5),
            alert: ClipSource::silent(1.5),
            alert_volume: ALERT_VOLUME,
            gsr_control_enabled: true,
            ambient_on_start: true,
            confidence: AlertConfidence::default(),
        }
    }
}

impl DetectorConfig {
    pub fn settings(&self) -> SonificationSettings {
        SonificationSettings {
            alert_volume: self.alert_volume.clamp(0.0, 1.0),
            gsr_control_enabled: self.gsr_control_enabled,
            ambient_on_start: self.ambient_on_start,
            confidence: self.confidence.clamped(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckConfig {
    pub tick_rate_ms: u64,
    pub transport: TransportConfig,
    pub detector: DetectorConfig,
    pub presets: PresetDerivation,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: 16, // ~60fps
            transport: TransportConfig::default(),
            detector: DetectorConfig::default(),
            presets: PresetDerivation::default(),
        }
    }
}

impl DeckConfig {
    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms.max(1))
    }
}

// <config_dir>/cuedeck.json
pub fn config_file_path(config_dir: &Path) -> PathBuf {
    config_dir.join(CONFIG_FILE)
}

pub fn load_config(config_dir: &Path) -> Result<DeckConfig> {
    let path = config_file_path(config_dir);
    if !path.exists() {
        log::info!("no {} found, using defaults", path.display());
        return Ok(DeckConfig::default());
    }
    let data = std::fs::read_to_string(&path)?;
    let config = serde_json::from_str(&data)?;
    log::info!("loaded config from {}", path.display());
    Ok(config)
}
