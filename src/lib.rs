pub mod capture;
pub mod config;
pub mod constants;
pub mod error;
pub mod output;
pub mod processing;
pub mod session;
pub mod signal_processing;

#[cfg(feature = "simulation")]
pub mod simulation;

pub use config::PulseConfig;
pub use error::{PulseError, Result};
pub use processing::{CycleResult, PulseProcessor, Status};
pub use session::{MonitoringSession, Tick};
