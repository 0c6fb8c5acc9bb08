mod test_signals;

use pulsecam::capture::{ChannelSource, RgbaFrame};
use pulsecam::config::{PulseConfig, Resolution};
use pulsecam::simulation::{
    NoiseConfig, PixelNoise, SyntheticSource, apply_noise, create_rng, generate_ppg_trace,
    synthesize_frame,
};
use pulsecam::{CycleResult, MonitoringSession, Status, Tick};
use test_signals::run_session;

fn small_config() -> PulseConfig {
    let mut config = PulseConfig::default();
    config.capture.resolution = Resolution::new(32, 24);
    config
}

fn synthetic_run(config: &PulseConfig, trace: Vec<f32>, pixel_noise: f32) -> Vec<CycleResult> {
    let source =
        SyntheticSource::new(config.capture.resolution, trace, pixel_noise, Some(42)).unwrap();
    run_session(config, Box::new(source))
}

#[test]
fn test_frames_to_rate_on_bin() {
    let config = small_config();
    let fps = config.sample_rate();
    let frames = config.window_capacity() + 90;

    for bpm in [60.0f32, 75.0, 90.0, 120.0] {
        let trace = generate_ppg_trace(bpm, fps, frames, 150.0, 2.0);
        let cycles = synthetic_run(&config, trace, 0.0);

        assert_eq!(cycles.len(), frames);
        let last = cycles.last().unwrap();
        assert_eq!(last.status, Status::Processing);
        assert!(
            (last.heart_rate - bpm).abs() < 2.0,
            "expected ~{} BPM, got {}",
            bpm,
            last.heart_rate
        );
    }
}

#[test]
fn test_off_bin_rate_lands_on_nearest_bins() {
    let config = small_config();
    let fps = config.sample_rate();
    let frames = config.window_capacity() + 120;

    // 72 BPM sits between the 67.5 and 75 BPM bins of a 240-sample window
    let trace = generate_ppg_trace(72.0, fps, frames, 150.0, 2.0);
    let cycles = synthetic_run(&config, trace, 0.0);
    let last = cycles.last().unwrap();
    assert!(
        (last.heart_rate - 72.0).abs() < 5.0,
        "got {}",
        last.heart_rate
    );
}

#[test]
fn test_pixel_noise_tolerated() {
    let mut config = small_config();
    config.capture.resolution = Resolution::new(64, 48);
    let fps = config.sample_rate();
    let frames = config.window_capacity() + 120;

    let trace = generate_ppg_trace(90.0, fps, frames, 140.0, 2.0);
    let cycles = synthetic_run(&config, trace, 5.0);

    assert!(cycles.iter().all(|c| !c.status.is_rejection()));
    let last = cycles.last().unwrap();
    assert!((last.heart_rate - 90.0).abs() < 3.0, "got {}", last.heart_rate);
}

#[test]
fn test_baseline_drift_removed() {
    let config = small_config();
    let fps = config.sample_rate();
    let frames = config.window_capacity() + 120;

    let clean = generate_ppg_trace(75.0, fps, frames, 120.0, 2.0);
    let noise = NoiseConfig::default().with_seed(9).with_drift(2.0);
    let trace = apply_noise(&clean, &noise, fps).unwrap();
    let cycles = synthetic_run(&config, trace, 0.0);

    let last = cycles.last().unwrap();
    assert!((last.heart_rate - 75.0).abs() < 2.0, "got {}", last.heart_rate);
}

#[test]
fn test_uncovered_lens_recovers() {
    let config = small_config();
    let fps = config.sample_rate();
    let capacity = config.window_capacity();
    let frames = 300 + capacity + 150;

    let trace = generate_ppg_trace(75.0, fps, frames, 150.0, 2.0);
    let source = SyntheticSource::new(config.capture.resolution, trace, 0.0, Some(1))
        .unwrap()
        .with_uncovered(300..306);
    let cycles = run_session(&config, Box::new(source));

    assert!(cycles[299].heart_rate > 0.0);
    for cycle in &cycles[300..306] {
        assert_eq!(cycle.status, Status::NeedsCoverage);
        assert_eq!(cycle.heart_rate, 0.0);
    }
    assert_eq!(cycles[306].status, Status::Calibrating(0));
    assert_eq!(cycles[306 + capacity - 1].status, Status::Processing);

    let last = cycles.last().unwrap();
    assert_eq!(last.status, Status::Processing);
    assert!((last.heart_rate - 75.0).abs() < 2.0, "got {}", last.heart_rate);
}

#[test]
fn test_threaded_capture_through_channel() {
    let config = small_config();
    let res = config.capture.resolution;
    let fps = config.sample_rate();
    let frames = config.window_capacity() + 60;
    let (tx, source) = ChannelSource::bounded(res, 16);

    let producer = std::thread::spawn(move || {
        let mut rng = create_rng(Some(5));
        let noise = PixelNoise::new(0.0).unwrap();
        for level in generate_ppg_trace(75.0, fps, frames, 150.0, 2.0) {
            let frame: RgbaFrame = synthesize_frame(res, level, &noise, &mut rng);
            if tx.send(frame).is_err() {
                break;
            }
        }
    });

    let mut session = MonitoringSession::new(&config).unwrap();
    session.start(Box::new(source)).unwrap();

    let mut cycles = Vec::new();
    loop {
        match session.tick() {
            Tick::Cycle(cycle) => cycles.push(cycle),
            Tick::NoFrame => std::thread::yield_now(),
            Tick::EndOfStream | Tick::Inactive => break,
        }
    }
    producer.join().unwrap();

    assert_eq!(cycles.len(), frames);
    assert!(cycles.last().unwrap().heart_rate > 70.0);

    session.stop();
    let snapshot = session.snapshot();
    assert!(!snapshot.monitoring);
    assert_eq!(snapshot.status, Status::Ready);
    assert_eq!(snapshot.heart_rate, 0.0);
}
