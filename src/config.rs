//! Configuration for the pulsecam pipeline.
//!
//! Every tunable of the per-frame pipeline lives here. Defaults describe a
//! 30 fps, 320x240 capture with an 8 second analysis window. A TOML file only
//! needs to name the values it overrides:
//!
//! ```ignore
//! [capture]
//! nominal_frame_rate = 25
//!
//! [quality]
//! motion_threshold = 8.0
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::constants::{DEFAULT_DISPLAY_PAD, DISPLAY_PAD_FRACTION};
use crate::error::{PulseError, Result};

/// Frame dimensions in pixels
///
/// # Parsing formats
/// - `320x240` or `320X240`
///
/// # Example
/// ```
/// use pulsecam::config::Resolution;
///
/// let res: Resolution = "640x480".parse().unwrap();
/// assert_eq!(res.pixel_count(), 640 * 480);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Size in bytes of one RGBA frame at this resolution
    pub fn frame_bytes(&self) -> usize {
        self.pixel_count() * 4
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self::new(320, 240)
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for Resolution {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        let (w, h) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("invalid resolution: {}", s))?;
        let width: u32 = w
            .trim()
            .parse()
            .map_err(|_| format!("invalid width: {}", s))?;
        let height: u32 = h
            .trim()
            .parse()
            .map_err(|_| format!("invalid height: {}", s))?;
        if width == 0 || height == 0 {
            return Err("resolution must be non-zero".to_string());
        }
        Ok(Self::new(width, height))
    }
}

/// System-wide pipeline configuration
///
/// Use `PulseConfig::default()` for sensible defaults, or
/// [`PulseConfig::from_toml_file`] to override a subset of them.
///
/// # Example
/// ```
/// use pulsecam::config::PulseConfig;
///
/// let mut config = PulseConfig::default();
/// config.analysis.window_seconds = 10.0;
/// assert_eq!(config.window_capacity(), 300);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PulseConfig {
    /// Frame geometry and nominal capture rate
    pub capture: CaptureConfig,
    /// Window span, heart-rate band and filter coefficients
    pub analysis: AnalysisConfig,
    /// Coverage and motion rejection thresholds
    pub quality: QualityConfig,
    /// Waveform display scaling
    pub display: DisplayConfig,
}

/// Capture configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Frame dimensions
    pub resolution: Resolution,
    /// Nominal frames per second; also the sample rate of the PPG signal
    pub nominal_frame_rate: u32,
}

/// Spectral analysis configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Span of the sliding sample window in seconds
    pub window_seconds: f32,
    /// Lowest heart rate searched for, in BPM
    pub min_bpm: f32,
    /// Highest heart rate searched for, in BPM
    pub max_bpm: f32,
    /// Smoothing factor of the single-pole low-pass (0-1, larger = less smoothing)
    pub low_pass_alpha: f32,
    /// Weight of each new instantaneous BPM estimate in the displayed rate
    pub rate_smoothing: f32,
}

/// Frame rejection thresholds
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QualityConfig {
    /// Largest accepted frame-to-frame change of the red average
    pub motion_threshold: f32,
    /// Largest accepted per-frame red standard deviation
    pub coverage_std_dev_threshold: f32,
}

/// Display range configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Fraction of the signal span added on each side of the range
    pub pad_fraction: f32,
    /// Padding used when the signal is flat
    pub default_pad: f32,
    /// Weight kept by the previous bound on each update (0-1)
    pub smoothing: f32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            resolution: Resolution::default(),
            nominal_frame_rate: 30,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            window_seconds: 8.0,
            min_bpm: 45.0,
            max_bpm: 180.0,
            low_pass_alpha: 0.25,
            rate_smoothing: 0.1,
        }
    }
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            motion_threshold: 12.0,
            coverage_std_dev_threshold: 30.0,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            pad_fraction: DISPLAY_PAD_FRACTION,
            default_pad: DEFAULT_DISPLAY_PAD,
            smoothing: 0.98,
        }
    }
}

impl PulseConfig {
    /// Parse a (possibly partial) TOML document on top of the defaults
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s).map_err(|e| PulseError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML configuration file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&text)
    }

    /// Sample rate of the PPG signal in Hz
    pub fn sample_rate(&self) -> f32 {
        self.capture.nominal_frame_rate as f32
    }

    /// Number of samples held by the sliding window
    pub fn window_capacity(&self) -> usize {
        (self.sample_rate() * self.analysis.window_seconds).round() as usize
    }

    /// Check that the configuration describes a usable pipeline
    pub fn validate(&self) -> Result<()> {
        let res = self.capture.resolution;
        if res.width == 0 || res.height == 0 {
            return Err(PulseError::Config(format!(
                "resolution must be non-zero, got {}",
                res
            )));
        }
        if self.capture.nominal_frame_rate == 0 {
            return Err(PulseError::Config(
                "nominal_frame_rate must be positive".into(),
            ));
        }

        let a = &self.analysis;
        if a.window_seconds <= 0.0 {
            return Err(PulseError::Config("window_seconds must be positive".into()));
        }
        if self.window_capacity() < crate::constants::MIN_DETREND_LEN {
            return Err(PulseError::Config(format!(
                "window holds {} samples, at least {} are needed",
                self.window_capacity(),
                crate::constants::MIN_DETREND_LEN
            )));
        }
        if a.min_bpm <= 0.0 || a.min_bpm >= a.max_bpm {
            return Err(PulseError::Config(format!(
                "BPM band must satisfy 0 < min < max, got {}-{}",
                a.min_bpm, a.max_bpm
            )));
        }
        let nyquist_bpm = self.sample_rate() / 2.0 * 60.0;
        if a.max_bpm > nyquist_bpm {
            return Err(PulseError::Config(format!(
                "max_bpm {} exceeds Nyquist limit {} at {} fps",
                a.max_bpm, nyquist_bpm, self.capture.nominal_frame_rate
            )));
        }
        if a.window_seconds * a.min_bpm / 60.0 < 1.0 {
            return Err(PulseError::Config(format!(
                "window of {}s cannot hold one beat at {} BPM",
                a.window_seconds, a.min_bpm
            )));
        }
        if !(a.low_pass_alpha > 0.0 && a.low_pass_alpha <= 1.0) {
            return Err(PulseError::Config(format!(
                "low_pass_alpha must be in (0, 1], got {}",
                a.low_pass_alpha
            )));
        }
        if !(a.rate_smoothing > 0.0 && a.rate_smoothing <= 1.0) {
            return Err(PulseError::Config(format!(
                "rate_smoothing must be in (0, 1], got {}",
                a.rate_smoothing
            )));
        }

        let q = &self.quality;
        if q.motion_threshold <= 0.0 || q.coverage_std_dev_threshold <= 0.0 {
            return Err(PulseError::Config(
                "quality thresholds must be positive".into(),
            ));
        }

        let d = &self.display;
        if !(0.0..1.0).contains(&d.smoothing) {
            return Err(PulseError::Config(format!(
                "display smoothing must be in [0, 1), got {}",
                d.smoothing
            )));
        }
        if d.pad_fraction < 0.0 || d.default_pad <= 0.0 {
            return Err(PulseError::Config(
                "display padding must be non-negative".into(),
            ));
        }

        Ok(())
    }
}
