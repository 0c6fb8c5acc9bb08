mod csv;
mod json;
mod text;

use chrono::Utc;
use serde::Serialize;

use crate::processing::CycleResult;
use crate::signal_processing::DisplayRange;

pub use self::csv::CsvFormatter;
pub use self::json::JsonFormatter;
pub use self::text::TextFormatter;

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

/// One printable line of pipeline output
#[derive(Debug, Clone, Serialize)]
pub struct RateOutput {
    pub frame: usize,
    pub status: String,
    /// Rounded rate, absent while unavailable
    pub bpm: Option<u32>,
    /// Smoothed rate at full precision
    pub rate: f32,
    /// This cycle's instantaneous estimate
    pub instant_bpm: Option<f32>,
    pub range: DisplayRange,
}

impl RateOutput {
    pub fn from_cycle(frame: usize, cycle: &CycleResult) -> Self {
        Self {
            frame,
            status: cycle.status.to_string(),
            bpm: cycle.displayed_bpm(),
            rate: cycle.heart_rate,
            instant_bpm: cycle.peak.map(|p| p.bpm()),
            range: cycle.display_range,
        }
    }
}

pub trait Formatter: Send {
    fn format(&self, output: &RateOutput) -> String;

    fn header(&self) -> Option<&'static str> {
        None
    }
}

pub fn create_formatter(format: OutputFormat, verbose: bool) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter::new(verbose)),
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Csv => Box::new(CsvFormatter),
    }
}

pub fn iso8601_timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}
