use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use rolling_stats::Stats;

use pulsecam::capture::RawFileSource;
use pulsecam::config::{PulseConfig, Resolution};
use pulsecam::output::{OutputFormat, RateOutput, create_formatter};
use pulsecam::{MonitoringSession, Status, Tick};

#[derive(Parser, Debug)]
#[command(name = "pulsecam")]
#[command(about = "Estimate pulse rate from fingertip-on-camera video", long_about = None)]
struct Args {
    /// Raw RGBA frame file (frames stored back to back)
    input: PathBuf,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Frame resolution, e.g. "320x240" (overrides config)
    #[arg(short, long)]
    resolution: Option<Resolution>,

    /// Nominal frame rate in fps (overrides config)
    #[arg(long)]
    fps: Option<u32>,

    /// Output format: text, json, csv
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Print every Nth cycle
    #[arg(short = 'e', long, default_value_t = 1)]
    every: usize,

    /// Pace frames at the nominal frame rate instead of as fast as possible
    #[arg(long)]
    realtime: bool,

    /// Increase output verbosity
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

struct RunSummary {
    frames: usize,
    coverage_faults: usize,
    motion_faults: usize,
    rate: Stats<f32>,
    final_rate: f32,
}

impl RunSummary {
    fn new() -> Self {
        Self {
            frames: 0,
            coverage_faults: 0,
            motion_faults: 0,
            rate: Stats::new(),
            final_rate: 0.0,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let mut config = match &args.config {
        Some(path) => PulseConfig::from_toml_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => PulseConfig::default(),
    };
    if let Some(resolution) = args.resolution {
        config.capture.resolution = resolution;
    }
    if let Some(fps) = args.fps {
        config.capture.nominal_frame_rate = fps;
    }
    config.validate().context("Invalid configuration")?;

    eprintln!("=== pulsecam ===");
    eprintln!("Resolution: {}", config.capture.resolution);
    eprintln!(
        "Frame rate: {} fps, window: {} s ({} samples)",
        config.capture.nominal_frame_rate,
        config.analysis.window_seconds,
        config.window_capacity()
    );
    eprintln!(
        "BPM band: {}-{}",
        config.analysis.min_bpm, config.analysis.max_bpm
    );
    eprintln!();

    let summary = run(&args, &config)?;
    print_summary(&summary);
    Ok(())
}

fn run(args: &Args, config: &PulseConfig) -> anyhow::Result<RunSummary> {
    let mut session = MonitoringSession::new(config)?;
    let source = RawFileSource::new(&args.input, config.capture.resolution);
    session
        .start(Box::new(source))
        .with_context(|| format!("Cannot open {}", args.input.display()))?;

    let formatter = create_formatter(args.format, args.verbose > 0);
    if let Some(header) = formatter.header() {
        println!("{}", header);
    }

    let frame_interval = Duration::from_secs_f32(1.0 / config.sample_rate());
    let every = args.every.max(1);
    let mut summary = RunSummary::new();

    loop {
        let started = Instant::now();
        let cycle = match session.tick() {
            Tick::Cycle(cycle) => cycle,
            Tick::NoFrame => continue,
            Tick::EndOfStream | Tick::Inactive => break,
        };

        summary.frames += 1;
        match cycle.status {
            Status::NeedsCoverage => summary.coverage_faults += 1,
            Status::MotionDetected => summary.motion_faults += 1,
            Status::Processing if cycle.heart_rate > 0.0 => summary.rate.update(cycle.heart_rate),
            _ => {}
        }
        summary.final_rate = cycle.heart_rate;

        if summary.frames % every == 0 {
            println!(
                "{}",
                formatter.format(&RateOutput::from_cycle(summary.frames, &cycle))
            );
        }

        if args.realtime {
            if let Some(remaining) = frame_interval.checked_sub(started.elapsed()) {
                std::thread::sleep(remaining);
            }
        }
    }

    session.stop();
    Ok(summary)
}

fn print_summary(summary: &RunSummary) {
    eprintln!();
    eprintln!("Frames processed: {}", summary.frames);
    eprintln!(
        "Rejected: {} coverage, {} motion",
        summary.coverage_faults, summary.motion_faults
    );
    if summary.rate.count == 0 {
        eprintln!("No pulse rate estimated");
        return;
    }
    eprintln!("Final rate: {:.0} BPM", summary.final_rate);
    eprintln!(
        "Smoothed rate over {} cycles: mean {:.1}, std dev {:.1}, range {:.1}-{:.1} BPM",
        summary.rate.count,
        summary.rate.mean,
        summary.rate.std_dev,
        summary.rate.min,
        summary.rate.max
    );
}
