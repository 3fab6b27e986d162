use super::clip_id::ClipId;
use super::frame::StereoFrame;
use super::sample_buffer::SampleBuffer;

// A playing clip inside the engine. Channels own one voice each; one-shots get their own.
#[derive(Clone, Debug)]
pub struct Voice {
    pub clip: ClipId,
    pub pos: f32, // in frames, fractional
    pub pitch: f32,
    pub gain: f32,
    pub looping: bool,
    pub active: bool,
}

impl Voice {
    pub fn new(clip: ClipId, pos: f32, pitch: f32, gain: f32, looping: bool) -> Self {
        Self {
            clip,
            pos: pos.max(0.0),
            pitch,
            gain,
            looping,
            active: true,
        }
    }

    pub fn render_into(&mut self, buffer: &SampleBuffer, out: &mut [StereoFrame]) {
        let data = &buffer.data;
        let len = data.len();
        if len == 0 {
            self.active = false;
        }

        for frame in out.iter_mut() {
            if !self.active {
                break;
            }
            if self.pos >= len as f32 {
                if self.looping {
                    self.pos %= len as f32;
                } else {
                    self.active = false;
                    break;
                }
            }

            let i = self.pos as usize;
            let frac = self.pos - i as f32;
            let s0 = data[i];
            let s1 = if i + 1 < len {
                data[i + 1]
            } else if self.looping {
                data[0]
            } else {
                s0
            };
            let sample = StereoFrame::lerp(s0, s1, frac);

            frame.left += sample.left * self.gain;
            frame.right += sample.right * self.gain;

            self.pos += self.pitch;
        }
    }
}
