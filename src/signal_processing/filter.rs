/// Common trait for sample-by-sample filters
///
/// Implemented by `LowPassFilter`.
pub trait Filter {
    /// Process a single sample through the filter
    fn process(&mut self, sample: f32) -> f32;

    /// Return the filter to its initial state
    fn reset(&mut self);

    /// Process a buffer of samples in-place
    fn process_buffer(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }
}
