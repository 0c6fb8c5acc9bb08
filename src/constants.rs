//! Numeric constants for signal processing stability
//!
//! Thresholds and fallback values shared by the pipeline stages.

/// Minimum spectral magnitude for a bin to count as a peak.
/// A flat (fully detrended) window produces an all-zero spectrum; anything at or
/// below this is treated as "no peak this cycle".
pub const MIN_PEAK_MAGNITUDE: f32 = 1e-9;

/// Vertical padding used by the display scaler when the signal span is zero.
pub const DEFAULT_DISPLAY_PAD: f32 = 1.0;

/// Fraction of the signal span added above and below the plotted range.
pub const DISPLAY_PAD_FRACTION: f32 = 0.1;

/// Minimum number of samples the detrender will operate on.
pub const MIN_DETREND_LEN: usize = 3;
