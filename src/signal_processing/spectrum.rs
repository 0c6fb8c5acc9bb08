use std::f32::consts::PI;
use std::ops::RangeInclusive;

use num_complex::Complex;

use crate::config::PulseConfig;
use crate::constants::MIN_PEAK_MAGNITUDE;

/// Dominant in-band spectral component
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectralPeak {
    /// Winning DFT bin
    pub bin: usize,
    /// Normalised magnitude of that bin
    pub magnitude: f32,
    /// Bin centre frequency in Hz
    pub frequency_hz: f32,
}

impl SpectralPeak {
    pub fn bpm(&self) -> f32 {
        self.frequency_hz * 60.0
    }
}

/// Apply a Hanning window: `x[n] * 0.5 * (1 - cos(2 pi n / (N - 1)))`
///
/// A single sample has no taper and is returned unchanged.
pub fn hann_window(signal: &[f32]) -> Vec<f32> {
    let len = signal.len();
    if len < 2 {
        return signal.to_vec();
    }
    let denom = (len - 1) as f32;
    signal
        .iter()
        .enumerate()
        .map(|(n, &x)| x * 0.5 * (1.0 - (2.0 * PI * n as f32 / denom).cos()))
        .collect()
}

/// Magnitude spectrum by direct DFT for bins `0..N/2`, each scaled by `1/N`
///
/// O(N^2), which is fine for the few hundred samples a window holds. Twiddle
/// factors are tabulated once per call and indexed by `(k * n) mod N`.
pub fn magnitude_spectrum(signal: &[f32]) -> Vec<f32> {
    let len = signal.len();
    if len == 0 {
        return Vec::new();
    }

    let twiddles: Vec<Complex<f32>> = (0..len)
        .map(|m| Complex::from_polar(1.0, -2.0 * PI * m as f32 / len as f32))
        .collect();

    (0..len / 2)
        .map(|k| {
            let sum: Complex<f32> = signal
                .iter()
                .enumerate()
                .map(|(n, &x)| twiddles[(k * n) % len] * x)
                .sum();
            sum.norm() / len as f32
        })
        .collect()
}

/// Band-limited dominant-frequency estimator
pub struct SpectralEstimator {
    sample_rate: f32,
    min_bpm: f32,
    max_bpm: f32,
}

impl SpectralEstimator {
    /// # Arguments
    /// * `sample_rate` - Signal sample rate in Hz (the nominal frame rate)
    /// * `min_bpm`, `max_bpm` - Plausible heart-rate band
    pub fn new(sample_rate: f32, min_bpm: f32, max_bpm: f32) -> Self {
        Self {
            sample_rate,
            min_bpm,
            max_bpm,
        }
    }

    pub fn from_config(config: &PulseConfig) -> Self {
        Self::new(
            config.sample_rate(),
            config.analysis.min_bpm,
            config.analysis.max_bpm,
        )
    }

    /// Bins covering the heart-rate band for an `len`-sample signal
    ///
    /// Lower edge rounds down, upper edge rounds up, both inclusive, clipped
    /// to the `len / 2` bins of the spectrum. `None` when nothing is left.
    pub fn band_bins(&self, len: usize) -> Option<RangeInclusive<usize>> {
        let bins = len / 2;
        if bins == 0 {
            return None;
        }
        // bpm * len / (60 * rate), in f64 so exact bin edges stay exact
        let scale = len as f64 / (60.0 * self.sample_rate as f64);
        let lo = (self.min_bpm as f64 * scale).floor().max(0.0) as usize;
        let hi = ((self.max_bpm as f64 * scale).ceil() as usize).min(bins - 1);
        if lo > hi {
            return None;
        }
        Some(lo..=hi)
    }

    /// Convert a bin index of an `len`-sample DFT to Hz
    pub fn bin_frequency(&self, bin: usize, len: usize) -> f32 {
        bin as f32 * self.sample_rate / len as f32
    }

    /// Pick the strongest in-band bin of a magnitude spectrum
    ///
    /// `len` is the length of the time-domain signal the spectrum came from.
    /// Ties go to the lowest bin. A band whose best magnitude is not above
    /// `MIN_PEAK_MAGNITUDE` reports no peak.
    pub fn find_peak(&self, spectrum: &[f32], len: usize) -> Option<SpectralPeak> {
        let band = self.band_bins(len)?;
        let mut best: Option<(usize, f32)> = None;

        for bin in band {
            let magnitude = *spectrum.get(bin)?;
            match best {
                Some((_, m)) if magnitude <= m => {}
                _ => best = Some((bin, magnitude)),
            }
        }

        let (bin, magnitude) = best?;
        if magnitude <= MIN_PEAK_MAGNITUDE {
            return None;
        }

        Some(SpectralPeak {
            bin,
            magnitude,
            frequency_hz: self.bin_frequency(bin, len),
        })
    }

    /// Window, transform and search a processed signal
    pub fn estimate(&self, signal: &[f32]) -> Option<SpectralPeak> {
        let windowed = hann_window(signal);
        let spectrum = magnitude_spectrum(&windowed);
        self.find_peak(&spectrum, signal.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq_hz: f32, sample_rate: f32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| (2.0 * PI * freq_hz * i as f32 / sample_rate).sin())
            .collect()
    }

    #[test]
    fn test_hann_endpoints() {
        let w = hann_window(&[1.0; 5]);
        assert!(w[0].abs() < 1e-6);
        assert!(w[4].abs() < 1e-6);
        assert!((w[2] - 1.0).abs() < 1e-6);
        assert!((w[1] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_hann_single_sample() {
        assert_eq!(hann_window(&[3.0]), vec![3.0]);
        assert!(hann_window(&[]).is_empty());
    }

    #[test]
    fn test_spectrum_length() {
        assert_eq!(magnitude_spectrum(&[0.0; 240]).len(), 120);
        assert_eq!(magnitude_spectrum(&[0.0; 7]).len(), 3);
        assert!(magnitude_spectrum(&[]).is_empty());
    }

    #[test]
    fn test_spectrum_of_dc() {
        let spectrum = magnitude_spectrum(&[2.0; 16]);
        assert!((spectrum[0] - 2.0).abs() < 1e-5);
        assert!(spectrum[1..].iter().all(|&m| m < 1e-5));
    }

    #[test]
    fn test_spectrum_of_on_bin_cosine() {
        // cos at bin 4 of 32: magnitude 0.5 at k=4, nothing elsewhere
        let signal: Vec<f32> = (0..32)
            .map(|n| (2.0 * PI * 4.0 * n as f32 / 32.0).cos())
            .collect();
        let spectrum = magnitude_spectrum(&signal);
        assert!((spectrum[4] - 0.5).abs() < 1e-4);
        for (k, &m) in spectrum.iter().enumerate() {
            if k != 4 {
                assert!(m < 1e-4, "leakage {} at bin {}", m, k);
            }
        }
    }

    #[test]
    fn test_band_bins() {
        let est = SpectralEstimator::new(30.0, 45.0, 180.0);
        // 0.75 Hz * 240 / 30 = 6, 3 Hz * 240 / 30 = 24
        assert_eq!(est.band_bins(240), Some(6..=24));
        // 0.75 * 100 / 30 = 2.5 -> 2, 3 * 100 / 30 = 10
        assert_eq!(est.band_bins(100), Some(2..=10));
    }

    #[test]
    fn test_band_edges_on_exact_bins() {
        // 42 * 300 / 1800 = 7 and 84 * 300 / 1800 = 14, neither rounded outward
        let est = SpectralEstimator::new(30.0, 42.0, 84.0);
        assert_eq!(est.band_bins(300), Some(7..=14));
        let est = SpectralEstimator::new(30.0, 42.0, 42.0);
        assert_eq!(est.band_bins(300), Some(7..=7));
    }

    #[test]
    fn test_band_clipped_to_spectrum() {
        let est = SpectralEstimator::new(30.0, 45.0, 180.0);
        // Upper edge 3 Hz * 10 / 30 = 1 bin, spectrum has bins 0..5
        assert_eq!(est.band_bins(10), Some(0..=1));
        assert_eq!(est.band_bins(1), None);
        assert_eq!(est.band_bins(0), None);
    }

    #[test]
    fn test_on_bin_sinusoid_peak() {
        let est = SpectralEstimator::new(30.0, 45.0, 180.0);
        for &(freq, len) in &[(1.25f32, 240usize), (1.0, 240), (2.0, 150), (1.5, 300)] {
            let peak = est.estimate(&sine(freq, 30.0, len)).expect("peak");
            let expected = (freq * len as f32 / 30.0).round() as usize;
            assert_eq!(peak.bin, expected, "freq {} len {}", freq, len);
            assert!((peak.bpm() - freq * 60.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_out_of_band_component_ignored() {
        let est = SpectralEstimator::new(30.0, 45.0, 180.0);
        // Strong 5 Hz (300 BPM) plus weaker in-band 1.25 Hz
        let signal: Vec<f32> = sine(5.0, 30.0, 240)
            .iter()
            .zip(sine(1.25, 30.0, 240))
            .map(|(a, b)| 4.0 * a + b)
            .collect();
        let peak = est.estimate(&signal).unwrap();
        assert_eq!(peak.bin, 10);
    }

    #[test]
    fn test_flat_signal_has_no_peak() {
        let est = SpectralEstimator::new(30.0, 45.0, 180.0);
        assert!(est.estimate(&[0.0; 240]).is_none());
    }

    #[test]
    fn test_tie_goes_to_lowest_bin() {
        let est = SpectralEstimator::new(30.0, 45.0, 180.0);
        let mut spectrum = vec![0.0; 120];
        spectrum[8] = 1.0;
        spectrum[12] = 1.0;
        let peak = est.find_peak(&spectrum, 240).unwrap();
        assert_eq!(peak.bin, 8);
    }

    #[test]
    fn test_short_spectrum_has_no_peak() {
        let est = SpectralEstimator::new(30.0, 45.0, 180.0);
        assert!(est.find_peak(&[1.0; 3], 240).is_none());
    }
}
