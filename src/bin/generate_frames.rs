use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::ops::Range;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use serde::Serialize;

use pulsecam::capture::{FramePoll, FrameSource};
use pulsecam::config::Resolution;
use pulsecam::simulation::{NoiseConfig, SyntheticSource, apply_noise, generate_ppg_trace};

#[derive(Parser, Debug)]
#[command(name = "generate_frames")]
#[command(about = "Generate synthetic fingertip video as raw RGBA frames")]
struct Args {
    /// Output file
    #[arg(short, long, default_value = "data/synthetic/pulse.rgba")]
    output: PathBuf,

    /// Pulse rate in BPM
    #[arg(short, long, default_value_t = 72.0)]
    bpm: f32,

    /// Duration in seconds
    #[arg(short, long, default_value_t = 20.0)]
    duration: f32,

    /// Frame rate in fps
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Frame resolution
    #[arg(short, long, default_value = "320x240")]
    resolution: Resolution,

    /// Mean red level of the covered lens
    #[arg(long, default_value_t = 150.0)]
    baseline: f32,

    /// Pulse amplitude in red-level units
    #[arg(long, default_value_t = 2.0)]
    amplitude: f32,

    /// Per-pixel Gaussian noise standard deviation
    #[arg(long, default_value_t = 0.0)]
    pixel_noise: f32,

    /// TOML noise configuration file (sample noise, drift, seed)
    #[arg(short, long)]
    noise_config: Option<PathBuf>,

    /// Base seed for reproducibility (overrides noise config)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Frames to replace with an uncovered lens, e.g. "300-330"
    #[arg(long)]
    uncovered: Option<String>,

    /// Write a JSON manifest next to the output
    #[arg(long)]
    manifest: bool,
}

#[derive(Debug, Serialize)]
struct Manifest {
    file: String,
    frames: usize,
    resolution: String,
    fps: u32,
    bpm: f32,
    baseline: f32,
    amplitude: f32,
    pixel_noise: f32,
    sample_noise: f32,
    drift_per_sec: f32,
    seed: Option<u64>,
    uncovered: Option<(usize, usize)>,
}

fn parse_range(s: &str) -> Result<Range<usize>> {
    let (start, end) = s
        .split_once('-')
        .with_context(|| format!("Invalid frame range: {}", s))?;
    let start: usize = start.trim().parse().context("Invalid range start")?;
    let end: usize = end.trim().parse().context("Invalid range end")?;
    if end <= start {
        bail!("Empty frame range: {}", s);
    }
    Ok(start..end)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut noise = match &args.noise_config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            toml::from_str::<NoiseConfig>(&text).context("Failed to parse noise config")?
        }
        None => NoiseConfig::default(),
    };
    if let Some(seed) = args.seed {
        noise.seed = Some(seed);
    }

    let sample_rate = args.fps as f32;
    let frames = (args.duration * sample_rate).round() as usize;
    let clean = generate_ppg_trace(args.bpm, sample_rate, frames, args.baseline, args.amplitude);
    let trace = apply_noise(&clean, &noise, sample_rate)?;

    let uncovered = args.uncovered.as_deref().map(parse_range).transpose()?;
    let mut source = SyntheticSource::new(args.resolution, trace, args.pixel_noise, noise.seed)?;
    if let Some(range) = uncovered.clone() {
        source = source.with_uncovered(range);
    }

    if let Some(parent) = args.output.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let file = File::create(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;
    let mut writer = BufWriter::new(file);

    source.open()?;
    let mut written = 0;
    while let FramePoll::Frame(frame) = source.next_frame()? {
        writer.write_all(frame.as_bytes())?;
        written += 1;
    }
    writer.flush()?;

    eprintln!(
        "Wrote {} frames ({} @ {} fps, {} BPM) to {}",
        written,
        args.resolution,
        args.fps,
        args.bpm,
        args.output.display()
    );

    if args.manifest {
        let manifest = Manifest {
            file: args.output.display().to_string(),
            frames: written,
            resolution: args.resolution.to_string(),
            fps: args.fps,
            bpm: args.bpm,
            baseline: args.baseline,
            amplitude: args.amplitude,
            pixel_noise: args.pixel_noise,
            sample_noise: noise.sample_noise_std,
            drift_per_sec: noise.drift_per_sec,
            seed: noise.seed,
            uncovered: uncovered.map(|r| (r.start, r.end)),
        };
        let path = args.output.with_extension("json");
        let json =
            serde_json::to_string_pretty(&manifest).context("Failed to serialize manifest")?;
        fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        eprintln!("Manifest: {}", path.display());
    }

    Ok(())
}
