use super::{Formatter, RateOutput};

pub struct TextFormatter {
    verbose: bool,
}

impl TextFormatter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl Formatter for TextFormatter {
    fn format(&self, output: &RateOutput) -> String {
        let bpm = output
            .bpm
            .map_or("--".to_string(), |b| format!("{:>3}", b));
        if self.verbose {
            let instant = output
                .instant_bpm
                .map_or("-".to_string(), |b| format!("{:.1}", b));
            let range = output
                .range
                .bounds()
                .map_or("auto".to_string(), |(lo, hi)| format!("{:.2}..{:.2}", lo, hi));
            format!(
                "[{:>6}] Pulse: {} BPM ({:.2}) [{}, instant: {}, range: {}]",
                output.frame, bpm, output.rate, output.status, instant, range
            )
        } else {
            format!("[{:>6}] Pulse: {} BPM  {}", output.frame, bpm, output.status)
        }
    }
}
