mod frames;
mod noise;
mod signal;

pub use frames::{SyntheticSource, synthesize_frame, uncovered_frame};
pub use noise::{NoiseConfig, PixelNoise, apply_noise, create_rng};
pub use signal::{generate_ppg_trace, generate_ppg_trace_with_rate_fn, generate_readings};
