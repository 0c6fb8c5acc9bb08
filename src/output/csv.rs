use super::{Formatter, RateOutput, iso8601_timestamp};

pub struct CsvFormatter;

impl Formatter for CsvFormatter {
    fn format(&self, output: &RateOutput) -> String {
        let bpm = output.bpm.map_or(String::new(), |b| b.to_string());
        let instant = output
            .instant_bpm
            .map_or(String::new(), |b| format!("{:.2}", b));
        let (range_min, range_max) = output
            .range
            .bounds()
            .map_or((String::new(), String::new()), |(lo, hi)| {
                (format!("{:.4}", lo), format!("{:.4}", hi))
            });
        format!(
            "{},{},{},{},{:.3},{},{},{}",
            iso8601_timestamp(),
            output.frame,
            output.status,
            bpm,
            output.rate,
            instant,
            range_min,
            range_max
        )
    }

    fn header(&self) -> Option<&'static str> {
        Some("ts,frame,status,bpm,rate,instant_bpm,range_min,range_max")
    }
}
