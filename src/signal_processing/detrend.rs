use crate::constants::MIN_DETREND_LEN;

/// Centered moving-average detrender
///
/// Subtracts from each sample the mean of the samples within `radius` of it.
/// Windows are clipped at the ends of the signal rather than padded, so edge
/// samples are averaged over fewer neighbours. With `radius = fps / 2` this
/// removes baseline drift slower than about one cycle per second.
pub struct Detrender {
    radius: usize,
}

impl Detrender {
    pub fn new(radius: usize) -> Self {
        Self { radius }
    }

    /// Detrender with a half-second radius at the given frame rate
    pub fn for_frame_rate(fps: u32) -> Self {
        Self::new(fps as usize / 2)
    }

    /// Return the signal minus its local mean
    ///
    /// Signals shorter than three samples are returned unchanged.
    pub fn process(&self, signal: &[f32]) -> Vec<f32> {
        let len = signal.len();
        if len < MIN_DETREND_LEN {
            return signal.to_vec();
        }

        // prefix[i] = sum of signal[..i]
        let mut prefix = Vec::with_capacity(len + 1);
        prefix.push(0.0f64);
        let mut acc = 0.0f64;
        for &x in signal {
            acc += x as f64;
            prefix.push(acc);
        }

        (0..len)
            .map(|i| {
                let start = i.saturating_sub(self.radius);
                let end = (i + self.radius).min(len - 1);
                let count = (end - start + 1) as f64;
                let local_mean = (prefix[end + 1] - prefix[start]) / count;
                (signal[i] as f64 - local_mean) as f32
            })
            .collect()
    }
}
