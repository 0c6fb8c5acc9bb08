use serde::Serialize;

use crate::config::DisplayConfig;

/// Vertical range for plotting the processed waveform
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum DisplayRange {
    /// Not initialised; the next computed range is adopted as-is
    Auto,
    Bounded { min: f32, max: f32 },
}

impl DisplayRange {
    pub fn bounds(&self) -> Option<(f32, f32)> {
        match *self {
            DisplayRange::Auto => None,
            DisplayRange::Bounded { min, max } => Some((min, max)),
        }
    }
}

/// Adaptive display range tracker
///
/// Each update pads the signal extent by `pad_fraction` of its span (or by
/// `default_pad` when the signal is flat). The first range after a reset is
/// adopted outright; later ones are blended into each bound with
/// `bound = smoothing * bound + (1 - smoothing) * computed`.
pub struct DisplayScaler {
    range: DisplayRange,
    pad_fraction: f32,
    default_pad: f32,
    smoothing: f32,
}

impl DisplayScaler {
    pub fn new(config: &DisplayConfig) -> Self {
        Self {
            range: DisplayRange::Auto,
            pad_fraction: config.pad_fraction,
            default_pad: config.default_pad,
            smoothing: config.smoothing,
        }
    }

    /// Padded extent of a signal, or `None` for an empty one
    pub fn padded_extent(&self, signal: &[f32]) -> Option<(f32, f32)> {
        let (min, max) = signal.iter().fold(None, |acc, &x| match acc {
            None => Some((x, x)),
            Some((lo, hi)) => Some((f32::min(lo, x), f32::max(hi, x))),
        })?;
        let span = max - min;
        let pad = if span > 0.0 {
            span * self.pad_fraction
        } else {
            self.default_pad
        };
        Some((min - pad, max + pad))
    }

    pub fn update(&mut self, signal: &[f32]) -> DisplayRange {
        let Some((lo, hi)) = self.padded_extent(signal) else {
            return self.range;
        };

        self.range = match self.range {
            DisplayRange::Auto => DisplayRange::Bounded { min: lo, max: hi },
            DisplayRange::Bounded { min, max } => {
                let keep = self.smoothing;
                DisplayRange::Bounded {
                    min: min * keep + lo * (1.0 - keep),
                    max: max * keep + hi * (1.0 - keep),
                }
            }
        };
        self.range
    }

    pub fn range(&self) -> DisplayRange {
        self.range
    }

    pub fn reset(&mut self) {
        self.range = DisplayRange::Auto;
    }
}
