pub mod detrend;
pub mod display_scaler;
pub mod filter;
pub mod low_pass;
pub mod quality_gate;
pub mod rate_smoother;
pub mod reflectance;
pub mod sample_window;
pub mod spectrum;

pub use detrend::Detrender;
pub use display_scaler::{DisplayRange, DisplayScaler};
pub use filter::Filter;
pub use low_pass::LowPassFilter;
pub use quality_gate::{GateDecision, QualityGate};
pub use rate_smoother::RateSmoother;
pub use reflectance::{Reflectance, extract_reflectance};
pub use sample_window::SampleWindow;
pub use spectrum::{SpectralEstimator, SpectralPeak, hann_window, magnitude_spectrum};
