use pulsecam::capture::FrameSource;
use pulsecam::config::PulseConfig;
use pulsecam::signal_processing::Reflectance;
use pulsecam::simulation::{generate_ppg_trace, generate_readings};
use pulsecam::{CycleResult, MonitoringSession, PulseProcessor, Tick};

/// Per-frame statistics of a steady pulse
pub fn pulse_readings(
    bpm: f32,
    fps: f32,
    count: usize,
    baseline: f32,
    amplitude: f32,
    red_std_dev: f32,
) -> Vec<Reflectance> {
    let trace = generate_ppg_trace(bpm, fps, count, baseline, amplitude);
    generate_readings(&trace, red_std_dev)
}

/// Per-frame statistics of a perfectly still, pulseless fingertip
pub fn constant_readings(count: usize, red_average: f32, red_std_dev: f32) -> Vec<Reflectance> {
    vec![Reflectance::new(red_average, red_std_dev); count]
}

/// Run readings through a processor, collecting every cycle
pub fn feed(processor: &mut PulseProcessor, readings: &[Reflectance]) -> Vec<CycleResult> {
    readings
        .iter()
        .map(|&r| processor.process_reading(r))
        .collect()
}

/// Drive a session over a source until it ends
#[allow(dead_code)]
pub fn run_session(config: &PulseConfig, source: Box<dyn FrameSource>) -> Vec<CycleResult> {
    let mut session = MonitoringSession::new(config).expect("valid config");
    session.start(source).expect("source opens");

    let mut cycles = Vec::new();
    loop {
        match session.tick() {
            Tick::Cycle(cycle) => cycles.push(cycle),
            Tick::NoFrame => continue,
            Tick::EndOfStream | Tick::Inactive => break,
        }
    }
    session.stop();
    cycles
}
