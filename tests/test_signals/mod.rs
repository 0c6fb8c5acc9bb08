pub mod generate;

#[allow(unused_imports)]
pub use generate::{constant_readings, feed, pulse_readings, run_session};
