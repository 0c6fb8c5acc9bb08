use crate::capture::RgbaFrame;

/// Per-frame red-channel statistics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reflectance {
    /// Mean red value over every pixel of the frame
    pub red_average: f32,
    /// Population standard deviation of the red channel
    pub red_std_dev: f32,
}

impl Reflectance {
    pub fn new(red_average: f32, red_std_dev: f32) -> Self {
        Self {
            red_average,
            red_std_dev,
        }
    }
}

/// Reduce a frame to its red-channel mean and dispersion
///
/// Sums are accumulated as integers so the result does not depend on pixel
/// order; the variance is `(n * sum_sq - sum^2) / n^2`, which is exactly the
/// mean squared deviation from the mean.
pub fn extract_reflectance(frame: &RgbaFrame) -> Reflectance {
    let mut count: u128 = 0;
    let mut sum: u128 = 0;
    let mut sum_sq: u128 = 0;

    for red in frame.red_channel() {
        let r = red as u128;
        count += 1;
        sum += r;
        sum_sq += r * r;
    }

    if count == 0 {
        return Reflectance::new(0.0, 0.0);
    }

    let n = count as f64;
    let mean = sum as f64 / n;
    let variance = (count * sum_sq - sum * sum) as f64 / (n * n);

    Reflectance::new(mean as f32, variance.sqrt() as f32)
}
