use crate::config::QualityConfig;

use super::Reflectance;

/// Verdict of the quality gate for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Frame is usable; its red average goes into the window
    Accept,
    /// Pixel dispersion too high: the lens sees a scene, not a fingertip
    NeedsCoverage,
    /// Brightness jumped too far since the previous accepted frame
    MotionDetected,
}

/// Coverage and motion rejection
///
/// Both checks are strict: a value exactly at its threshold is accepted.
/// The coverage check runs first and never touches the remembered average;
/// the motion check does update it, so a hand that settles at a new brightness
/// is re-baselined instead of being rejected on every following frame.
pub struct QualityGate {
    motion_threshold: f32,
    coverage_threshold: f32,
    previous_average: Option<f32>,
}

impl QualityGate {
    pub fn new(config: &QualityConfig) -> Self {
        Self {
            motion_threshold: config.motion_threshold,
            coverage_threshold: config.coverage_std_dev_threshold,
            previous_average: None,
        }
    }

    pub fn evaluate(&mut self, reading: Reflectance) -> GateDecision {
        if reading.red_std_dev > self.coverage_threshold {
            return GateDecision::NeedsCoverage;
        }

        let previous = self.previous_average.replace(reading.red_average);
        match previous {
            Some(prev) if (reading.red_average - prev).abs() > self.motion_threshold => {
                GateDecision::MotionDetected
            }
            _ => GateDecision::Accept,
        }
    }

    /// Red average of the last frame that passed the coverage check
    pub fn previous_average(&self) -> Option<f32> {
        self.previous_average
    }

    pub fn reset(&mut self) {
        self.previous_average = None;
    }
}
