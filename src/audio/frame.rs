// One stereo frame; the engine renders into these and interleaves at the end
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StereoFrame {
    pub left: f32,
    pub right: f32,
}

impl StereoFrame {
    pub fn zero() -> Self {
        Self::default()
    }

    #[inline]
    pub fn lerp(a: StereoFrame, b: StereoFrame, t: f32) -> StereoFrame {
        StereoFrame {
            left: a.left * (1.0 - t) + b.left * t,
            right: a.right * (1.0 - t) + b.right * t,
        }
    }
}
