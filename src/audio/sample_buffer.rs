use std::path::Path;

use crate::error::{DeckError, Result};

use super::frame::StereoFrame;

#[derive(Clone, Debug, Default)]
pub struct SampleBuffer {
    pub data: Vec<StereoFrame>,
}

impl SampleBuffer {
    // Decode a PCM WAV file and bring it to `target_rate`.
    //
    // Mono files are duplicated to both sides; files with more than two channels keep
    // their first two.
    pub fn load_wav(path: &Path, target_rate: u32) -> Result<Self> {
        let mut reader = hound::WavReader::open(path)?;
        let spec = reader.spec();
        let file_channels = spec.channels.max(1) as usize;

        let samples: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => reader.samples::<f32>().collect::<std::result::Result<_, _>>()?,
            hound::SampleFormat::Int => {
                if spec.bits_per_sample == 0 || spec.bits_per_sample > 32 {
                    return Err(DeckError::UnsupportedFormat {
                        path: path.to_path_buf(),
                        detail: format!("{} bits per sample", spec.bits_per_sample),
                    });
                }
                let max = (1i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|x| x as f32 / max))
                    .collect::<std::result::Result<_, _>>()?
            }
        };

        let frames: Vec<StereoFrame> = samples
            .chunks_exact(file_channels)
            .map(|c| StereoFrame {
                left: c[0],
                right: if file_channels > 1 { c[1] } else { c[0] },
            })
            .collect();

        let data = if spec.sample_rate != target_rate {
            resample_linear(&frames, spec.sample_rate, target_rate)
        } else {
            frames
        };

        log::debug!(
            "decoded {} ({} Hz, {} ch) into {} frames",
            path.display(),
            spec.sample_rate,
            spec.channels,
            data.len()
        );
        Ok(Self { data })
    }

    pub fn duration_secs(&self, sample_rate: u32) -> f32 {
        if sample_rate == 0 {
            return 0.0;
        }
        self.data.len() as f32 / sample_rate as f32
    }
}

fn resample_linear(frames: &[StereoFrame], source_rate: u32, target_rate: u32) -> Vec<StereoFrame> {
    if source_rate == target_rate || source_rate == 0 || frames.is_empty() {
        return frames.to_vec();
    }
    let ratio = target_rate as f64 / source_rate as f64;
    let out_len = (frames.len() as f64 * ratio).ceil() as usize;
    let last = frames.len() - 1;

    (0..out_len)
        .map(|i| {
            let src_pos = i as f64 / ratio;
            let idx = src_pos.floor() as usize;
            if idx >= last {
                frames[last]
            } else {
                StereoFrame::lerp(frames[idx], frames[idx + 1], (src_pos - idx as f64) as f32)
            }
        })
        .collect()
}
