use std::ops::Range;

use rand_chacha::ChaCha8Rng;

use super::noise::{PixelNoise, create_rng};
use crate::capture::{FramePoll, FrameSource, RgbaFrame};
use crate::config::Resolution;
use crate::error::Result;

/// Fingertip-covered frame whose red mean is as close to `red_level` as 8-bit pixels allow
///
/// Without noise the fractional part of the level is dithered over the first
/// pixels, so the frame mean is exact to within `1 / pixel_count` and the
/// dispersion stays below 0.5. With noise every pixel gets an independent
/// Gaussian offset before rounding.
pub fn synthesize_frame(
    resolution: Resolution,
    red_level: f32,
    noise: &PixelNoise,
    rng: &mut ChaCha8Rng,
) -> RgbaFrame {
    let level = red_level.clamp(0.0, 255.0);
    let pixels = resolution.pixel_count();
    let base = level.floor();
    let bumped = ((level - base) * pixels as f32).round() as usize;

    let mut data = Vec::with_capacity(resolution.frame_bytes());
    for i in 0..pixels {
        let red = if noise.is_silent() {
            base + if i < bumped { 1.0 } else { 0.0 }
        } else {
            (level + noise.sample(rng)).round()
        };
        let red = red.clamp(0.0, 255.0) as u8;
        // Tissue-lit frames are dominated by red; green/blue are kept low and flat
        data.extend_from_slice(&[red, red / 4, red / 8, 255]);
    }

    RgbaFrame::from_pixels(resolution, data)
}

/// Uncovered-lens frame: a high-contrast scene with large red dispersion
pub fn uncovered_frame(resolution: Resolution) -> RgbaFrame {
    let width = resolution.width as usize;
    let data = (0..resolution.pixel_count())
        .flat_map(|i| {
            let (x, y) = (i % width, i / width);
            let v = if (x + y) % 2 == 0 { 230 } else { 20 };
            [v, v, v, 255]
        })
        .collect();
    RgbaFrame::from_pixels(resolution, data)
}

/// Frame source replaying a synthetic red-level trace
pub struct SyntheticSource {
    resolution: Resolution,
    trace: Vec<f32>,
    position: usize,
    uncovered: Option<Range<usize>>,
    noise: PixelNoise,
    rng: ChaCha8Rng,
}

impl SyntheticSource {
    pub fn new(
        resolution: Resolution,
        trace: Vec<f32>,
        pixel_noise_std: f32,
        seed: Option<u64>,
    ) -> Result<Self> {
        Ok(Self {
            resolution,
            trace,
            position: 0,
            uncovered: None,
            noise: PixelNoise::new(pixel_noise_std)?,
            rng: create_rng(seed),
        })
    }

    /// Replace the frames in `range` with uncovered-lens frames
    pub fn with_uncovered(mut self, range: Range<usize>) -> Self {
        self.uncovered = Some(range);
        self
    }
}

impl FrameSource for SyntheticSource {
    fn open(&mut self) -> Result<()> {
        self.position = 0;
        Ok(())
    }

    fn next_frame(&mut self) -> Result<FramePoll> {
        let Some(&level) = self.trace.get(self.position) else {
            return Ok(FramePoll::Ended);
        };
        let index = self.position;
        self.position += 1;

        let frame = match &self.uncovered {
            Some(range) if range.contains(&index) => uncovered_frame(self.resolution),
            _ => synthesize_frame(self.resolution, level, &self.noise, &mut self.rng),
        };
        Ok(FramePoll::Frame(frame))
    }

    fn resolution(&self) -> Resolution {
        self.resolution
    }
}
