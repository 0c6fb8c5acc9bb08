use super::Filter;

/// Single-pole IIR low-pass filter
///
/// `y[0] = x[0]`, then `y[i] = alpha * x[i] + (1 - alpha) * y[i-1]`.
/// Seeding with the first input means a constant signal passes through
/// unchanged from the very first sample.
pub struct LowPassFilter {
    alpha: f32,
    state: Option<f32>,
}

impl LowPassFilter {
    /// Create a new low-pass filter with the given smoothing factor (0-1].
    pub fn new(alpha: f32) -> Self {
        Self { alpha, state: None }
    }

    /// Filter a complete signal from a fresh state
    pub fn filter_signal(&mut self, signal: &[f32]) -> Vec<f32> {
        self.reset();
        let mut out = signal.to_vec();
        self.process_buffer(&mut out);
        out
    }
}

impl Filter for LowPassFilter {
    fn process(&mut self, sample: f32) -> f32 {
        let y = match self.state {
            Some(prev) => self.alpha * sample + (1.0 - self.alpha) * prev,
            None => sample,
        };
        self.state = Some(y);
        y
    }

    fn reset(&mut self) {
        self.state = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_passes_through() {
        let mut lp = LowPassFilter::new(0.25);
        let out = lp.filter_signal(&[42.0; 16]);
        assert!(out.iter().all(|&y| y == 42.0));
    }

    #[test]
    fn test_recursion() {
        let mut lp = LowPassFilter::new(0.5);
        let out = lp.filter_signal(&[0.0, 4.0, 4.0, 0.0]);
        assert_eq!(out, vec![0.0, 2.0, 3.0, 1.5]);
    }

    #[test]
    fn test_empty() {
        let mut lp = LowPassFilter::new(0.5);
        assert!(lp.filter_signal(&[]).is_empty());
    }

    #[test]
    fn test_filter_signal_starts_fresh() {
        let mut lp = LowPassFilter::new(0.5);
        lp.filter_signal(&[100.0, 100.0]);
        let out = lp.filter_signal(&[1.0, 1.0]);
        assert_eq!(out, vec![1.0, 1.0]);
    }

    #[test]
    fn test_attenuates_alternating_signal() {
        let mut lp = LowPassFilter::new(0.2);
        let signal: Vec<f32> = (0..200).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        let out = lp.filter_signal(&signal);
        let peak = out[100..].iter().fold(0.0f32, |a, &b| a.max(b.abs()));
        assert!(peak < 0.2, "Nyquist component should be attenuated, got {}", peak);
    }
}
