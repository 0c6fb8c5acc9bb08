/// Exponential moving average of instantaneous BPM estimates
///
/// `rate = (1 - weight) * rate + weight * bpm`, starting from 0. A rate of 0
/// means "not yet available"; since every estimate comes from a positive
/// in-band frequency, the smoothed rate is positive after the first update.
pub struct RateSmoother {
    weight: f32,
    rate: f32,
}

impl RateSmoother {
    pub fn new(weight: f32) -> Self {
        Self { weight, rate: 0.0 }
    }

    /// Fold in a new estimate and return the smoothed rate
    pub fn update(&mut self, bpm: f32) -> f32 {
        self.rate = (1.0 - self.weight) * self.rate + self.weight * bpm;
        self.rate
    }

    pub fn rate(&self) -> f32 {
        self.rate
    }

    pub fn is_available(&self) -> bool {
        self.rate > 0.0
    }

    pub fn reset(&mut self) {
        self.rate = 0.0;
    }
}
