use std::f32::consts::PI;

use crate::signal_processing::Reflectance;

/// Red-channel trace of a steady pulse: `baseline + amplitude * sin(2 pi f t)`
pub fn generate_ppg_trace(
    bpm: f32,
    sample_rate: f32,
    num_samples: usize,
    baseline: f32,
    amplitude: f32,
) -> Vec<f32> {
    generate_ppg_trace_with_rate_fn(sample_rate, num_samples, baseline, amplitude, |_| bpm)
}

/// Red-channel trace with a time-varying pulse rate
///
/// `rate_fn` maps time in seconds to BPM. Phase is accumulated sample by
/// sample so rate changes are continuous.
pub fn generate_ppg_trace_with_rate_fn<F>(
    sample_rate: f32,
    num_samples: usize,
    baseline: f32,
    amplitude: f32,
    rate_fn: F,
) -> Vec<f32>
where
    F: Fn(f32) -> f32,
{
    let mut phase = 0.0f32;
    let mut trace = Vec::with_capacity(num_samples);

    for i in 0..num_samples {
        let t = i as f32 / sample_rate;
        trace.push(baseline + amplitude * phase.sin());
        phase += 2.0 * PI * rate_fn(t) / 60.0 / sample_rate;
        if phase > 2.0 * PI {
            phase -= 2.0 * PI;
        }
    }

    trace
}

/// Pair every trace value with a fixed per-frame dispersion
pub fn generate_readings(trace: &[f32], red_std_dev: f32) -> Vec<Reflectance> {
    trace
        .iter()
        .map(|&avg| Reflectance::new(avg, red_std_dev))
        .collect()
}
