use std::collections::VecDeque;

/// Fixed-capacity FIFO of accepted reflectance samples
///
/// Length grows up to `capacity` and then stays there; each push past that
/// point evicts the oldest sample. Iteration order is arrival order.
pub struct SampleWindow {
    samples: VecDeque<f32>,
    capacity: usize,
}

impl SampleWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a sample, evicting the oldest when the window is full
    pub fn push(&mut self, sample: f32) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    pub fn is_full(&self) -> bool {
        self.samples.len() >= self.capacity
    }

    /// Fill level as a whole percentage, rounded down
    pub fn fill_percent(&self) -> u8 {
        if self.capacity == 0 {
            return 100;
        }
        (self.samples.len() * 100 / self.capacity).min(100) as u8
    }

    /// Samples in chronological order (oldest to newest)
    pub fn to_vec(&self) -> Vec<f32> {
        self.samples.iter().copied().collect()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
