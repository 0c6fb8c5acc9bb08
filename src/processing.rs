use std::fmt;
use std::mem::discriminant;

use crate::capture::RgbaFrame;
use crate::config::{PulseConfig, Resolution};
use crate::error::Result;
use crate::signal_processing::{
    Detrender, DisplayRange, DisplayScaler, Filter, GateDecision, LowPassFilter, QualityGate,
    RateSmoother, Reflectance, SampleWindow, SpectralEstimator, SpectralPeak,
    extract_reflectance,
};

/// Pipeline status reported with every cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// No session running
    Ready,
    /// Session started, no frame processed yet
    Initializing,
    /// Window filling; percentage of capacity
    Calibrating(u8),
    /// Lens not covered by tissue
    NeedsCoverage,
    /// Brightness jump from movement
    MotionDetected,
    /// Window full, rate being estimated
    Processing,
}

impl Status {
    pub fn is_rejection(&self) -> bool {
        matches!(self, Status::NeedsCoverage | Status::MotionDetected)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Ready => write!(f, "ready"),
            Status::Initializing => write!(f, "initializing"),
            Status::Calibrating(pct) => write!(f, "calibrating {}%", pct),
            Status::NeedsCoverage => write!(f, "cover the lens fully"),
            Status::MotionDetected => write!(f, "motion detected"),
            Status::Processing => write!(f, "processing"),
        }
    }
}

/// Everything a presentation layer needs after one pipeline pass
#[derive(Debug, Clone, PartialEq)]
pub struct CycleResult {
    pub status: Status,
    /// Smoothed heart rate in BPM, full precision; 0 means unavailable
    pub heart_rate: f32,
    /// Spectral peak found this cycle, if any
    pub peak: Option<SpectralPeak>,
    /// Processed signal as (index, value) pairs; empty unless processing
    pub signal: Vec<(usize, f32)>,
    pub display_range: DisplayRange,
    pub monitoring: bool,
}

impl CycleResult {
    /// Heart rate rounded for display, `None` while unavailable
    pub fn displayed_bpm(&self) -> Option<u32> {
        if self.heart_rate > 0.0 {
            Some(self.heart_rate.round() as u32)
        } else {
            None
        }
    }
}

/// Per-frame PPG pipeline
///
/// Frame -> quality gate -> sliding window, then once the window is full:
/// detrend -> low-pass -> spectral peak -> rate smoothing, with the filtered
/// signal also driving the display range. All state lives here and nothing
/// is shared; the host calls [`PulseProcessor::process_frame`] once per frame.
pub struct PulseProcessor {
    gate: QualityGate,
    window: SampleWindow,
    detrender: Detrender,
    low_pass: LowPassFilter,
    estimator: SpectralEstimator,
    rate: RateSmoother,
    scaler: DisplayScaler,
    resolution: Resolution,
    last_status: Option<Status>,
}

impl PulseProcessor {
    pub fn new(config: &PulseConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            gate: QualityGate::new(&config.quality),
            window: SampleWindow::new(config.window_capacity()),
            detrender: Detrender::for_frame_rate(config.capture.nominal_frame_rate),
            low_pass: LowPassFilter::new(config.analysis.low_pass_alpha),
            estimator: SpectralEstimator::from_config(config),
            rate: RateSmoother::new(config.analysis.rate_smoothing),
            scaler: DisplayScaler::new(&config.display),
            resolution: config.capture.resolution,
            last_status: None,
        })
    }

    /// Run one pipeline pass on a decoded frame
    pub fn process_frame(&mut self, frame: &RgbaFrame) -> CycleResult {
        debug_assert_eq!(
            frame.resolution(),
            self.resolution,
            "frame resolution does not match configuration"
        );
        let reading = extract_reflectance(frame);
        self.process_reading(reading)
    }

    /// Run one pipeline pass on pre-extracted frame statistics
    pub fn process_reading(&mut self, reading: Reflectance) -> CycleResult {
        match self.gate.evaluate(reading) {
            GateDecision::NeedsCoverage => return self.reject(Status::NeedsCoverage, reading),
            GateDecision::MotionDetected => return self.reject(Status::MotionDetected, reading),
            GateDecision::Accept => {}
        }

        self.window.push(reading.red_average);
        if !self.window.is_full() {
            let status = Status::Calibrating(self.window.fill_percent());
            self.note_status(status);
            return self.idle_result(status);
        }

        let samples = self.window.to_vec();
        let detrended = self.detrender.process(&samples);
        let filtered = self.low_pass.filter_signal(&detrended);

        let peak = self.estimator.estimate(&filtered);
        match peak {
            Some(p) => {
                self.rate.update(p.bpm());
                log::debug!(
                    "Peak bin {} ({:.1} BPM, mag {:.4}), smoothed {:.1} BPM",
                    p.bin,
                    p.bpm(),
                    p.magnitude,
                    self.rate.rate()
                );
            }
            None => log::debug!("No in-band peak this cycle"),
        }

        let display_range = self.scaler.update(&filtered);
        self.note_status(Status::Processing);

        CycleResult {
            status: Status::Processing,
            heart_rate: self.rate.rate(),
            peak,
            signal: filtered.into_iter().enumerate().collect(),
            display_range,
            monitoring: true,
        }
    }

    /// Clear every piece of retained state, including the gate's memory
    pub fn reset(&mut self) {
        self.gate.reset();
        self.clear_signal_state();
        self.last_status = None;
    }

    pub fn heart_rate(&self) -> f32 {
        self.rate.rate()
    }

    pub fn display_range(&self) -> DisplayRange {
        self.scaler.range()
    }

    pub fn window_len(&self) -> usize {
        self.window.len()
    }

    pub fn window_capacity(&self) -> usize {
        self.window.capacity()
    }

    pub fn previous_average(&self) -> Option<f32> {
        self.gate.previous_average()
    }

    fn reject(&mut self, status: Status, reading: Reflectance) -> CycleResult {
        log::debug!(
            "Frame rejected ({}): avg {:.2}, sd {:.2}",
            status,
            reading.red_average,
            reading.red_std_dev
        );
        self.clear_signal_state();
        self.note_status(status);
        self.idle_result(status)
    }

    fn clear_signal_state(&mut self) {
        self.window.clear();
        self.rate.reset();
        self.scaler.reset();
        self.low_pass.reset();
    }

    fn idle_result(&self, status: Status) -> CycleResult {
        CycleResult {
            status,
            heart_rate: self.rate.rate(),
            peak: None,
            signal: Vec::new(),
            display_range: self.scaler.range(),
            monitoring: true,
        }
    }

    fn note_status(&mut self, status: Status) {
        let changed = self
            .last_status
            .is_none_or(|prev| discriminant(&prev) != discriminant(&status));
        if changed {
            match status {
                Status::NeedsCoverage | Status::MotionDetected => {
                    log::warn!("Signal lost: {}, recalibrating", status)
                }
                Status::Processing => log::info!(
                    "Window full ({} samples), estimating rate",
                    self.window.capacity()
                ),
                _ => log::info!("Status: {}", status),
            }
        }
        self.last_status = Some(status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn small_config() -> PulseConfig {
        let mut config = PulseConfig::default();
        config.capture.resolution = Resolution::new(4, 4);
        config
    }

    #[test]
    fn test_calibration_progress() {
        let config = small_config();
        let mut p = PulseProcessor::new(&config).unwrap();
        let capacity = config.window_capacity();

        let first = p.process_reading(Reflectance::new(100.0, 2.0));
        assert_eq!(first.status, Status::Calibrating(0));
        assert!(first.signal.is_empty());

        for _ in 1..capacity / 2 {
            p.process_reading(Reflectance::new(100.0, 2.0));
        }
        assert_eq!(p.window_len(), capacity / 2);
        let half = p.process_reading(Reflectance::new(100.0, 2.0));
        assert_eq!(half.status, Status::Calibrating(50));
    }

    #[test]
    fn test_processing_outputs_signal() {
        let config = small_config();
        let mut p = PulseProcessor::new(&config).unwrap();
        let capacity = config.window_capacity();

        let mut last = None;
        for i in 0..capacity {
            let v = 100.0 + 2.0 * (2.0 * PI * 1.25 * i as f32 / 30.0).sin();
            last = Some(p.process_reading(Reflectance::new(v, 2.0)));
        }
        let result = last.unwrap();
        assert_eq!(result.status, Status::Processing);
        assert_eq!(result.signal.len(), capacity);
        assert_eq!(result.signal[0].0, 0);
        assert_eq!(result.signal[capacity - 1].0, capacity - 1);
        assert!(matches!(result.display_range, DisplayRange::Bounded { .. }));
        assert!(result.peak.is_some());
        assert!(result.heart_rate > 0.0);
    }

    #[test]
    fn test_reset_clears_everything() {
        let config = small_config();
        let mut p = PulseProcessor::new(&config).unwrap();
        p.process_reading(Reflectance::new(100.0, 2.0));
        p.reset();
        assert_eq!(p.window_len(), 0);
        assert_eq!(p.previous_average(), None);
        assert_eq!(p.heart_rate(), 0.0);
        assert_eq!(p.display_range(), DisplayRange::Auto);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = small_config();
        config.analysis.max_bpm = 10.0;
        assert!(PulseProcessor::new(&config).is_err());
    }

    #[test]
    fn test_displayed_bpm_rounding() {
        let mut result = CycleResult {
            status: Status::Processing,
            heart_rate: 0.0,
            peak: None,
            signal: Vec::new(),
            display_range: DisplayRange::Auto,
            monitoring: true,
        };
        assert_eq!(result.displayed_bpm(), None);
        result.heart_rate = 71.6;
        assert_eq!(result.displayed_bpm(), Some(72));
    }

    #[test]
    fn test_frame_path_matches_reading_path() {
        let config = small_config();
        let mut by_frame = PulseProcessor::new(&config).unwrap();
        let mut by_reading = PulseProcessor::new(&config).unwrap();

        let frame = RgbaFrame::filled(config.capture.resolution, [90, 30, 30, 255]);
        let a = by_frame.process_frame(&frame);
        let b = by_reading.process_reading(Reflectance::new(90.0, 0.0));
        assert_eq!(a, b);
    }
}
