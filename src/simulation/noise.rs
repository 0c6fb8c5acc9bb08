use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use serde::Deserialize;

use crate::error::{PulseError, Result};

/// Impairments applied to a clean PPG trace
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    pub seed: Option<u64>,
    /// Gaussian noise added to each sample, in red-level units
    pub sample_noise_std: f32,
    /// Linear baseline drift in red-level units per second (illumination change)
    pub drift_per_sec: f32,
}

impl NoiseConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_sample_noise(mut self, std_dev: f32) -> Self {
        self.sample_noise_std = std_dev;
        self
    }

    pub fn with_drift(mut self, per_sec: f32) -> Self {
        self.drift_per_sec = per_sec;
        self
    }
}

pub fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => rand::make_rng(),
    }
}

/// Per-pixel Gaussian sensor noise
pub struct PixelNoise {
    normal: Option<Normal<f32>>,
}

impl PixelNoise {
    pub fn new(std_dev: f32) -> Result<Self> {
        if !std_dev.is_finite() || std_dev < 0.0 {
            return Err(PulseError::Config(format!(
                "pixel noise std dev must be finite and non-negative, got {}",
                std_dev
            )));
        }
        if std_dev == 0.0 {
            return Ok(Self { normal: None });
        }
        let normal = Normal::new(0.0, std_dev)
            .map_err(|e| PulseError::Config(format!("pixel noise: {}", e)))?;
        Ok(Self {
            normal: Some(normal),
        })
    }

    pub fn is_silent(&self) -> bool {
        self.normal.is_none()
    }

    pub fn sample(&self, rng: &mut ChaCha8Rng) -> f32 {
        self.normal.as_ref().map_or(0.0, |n| n.sample(rng))
    }
}

/// Apply drift and sample noise to a trace
pub fn apply_noise(clean: &[f32], config: &NoiseConfig, sample_rate: f32) -> Result<Vec<f32>> {
    let mut rng = create_rng(config.seed);
    let noise = PixelNoise::new(config.sample_noise_std)?;

    Ok(clean
        .iter()
        .enumerate()
        .map(|(i, &x)| {
            let t = i as f32 / sample_rate;
            x + config.drift_per_sec * t + noise.sample(&mut rng)
        })
        .collect())
}
