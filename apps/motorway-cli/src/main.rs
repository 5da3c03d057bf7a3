use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use motorway_audio::{AudioSink, SynthSink, TracingAudioSink, engine_tone};
use motorway_common::DriveConfig;
use motorway_input::{Control, InputSnapshot};
use motorway_kernel::World;
use motorway_render::{ChaseCamera, DebugTextRenderer, Renderer, build_frame};
use motorway_stream::TickTimer;
use motorway_tools::{AgentInfo, DriveSummary, WorldInspector};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

/// Fixed simulation step, matching a 60 Hz display.
const TICK: Duration = Duration::from_micros(16_667);
const SAMPLE_RATE: u32 = 48_000;

#[derive(Parser)]
#[command(name = "motorway-cli", about = "Headless runner for the motorway simulation")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and the effective configuration summary
    Info {
        /// YAML config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Drive a scripted session and report where it ended up
    Drive {
        /// Number of running ticks to simulate
        #[arg(short, long, default_value = "3600")]
        ticks: u64,
        /// RNG seed; overrides the config file
        #[arg(short, long)]
        seed: Option<u64>,
        /// YAML config file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Input pattern to drive with
        #[arg(long, value_enum, default_value_t = Script::Cruise)]
        script: Script,
        /// Print a text frame every N ticks
        #[arg(long)]
        render_every: Option<u64>,
        /// Emit the final report as JSON
        #[arg(long)]
        json: bool,
        /// List every live agent at the end of the drive
        #[arg(long)]
        agents: bool,
        /// Write the engine sound as raw mono f32 little-endian PCM at 48 kHz
        #[arg(long)]
        pcm: Option<PathBuf>,
    },
    /// Run the same drive several times and compare state hashes
    Determinism {
        #[arg(short, long, default_value = "2000")]
        ticks: u64,
        #[arg(short, long, default_value = "42")]
        seed: u64,
        #[arg(short, long, default_value = "3")]
        runs: usize,
    },
    /// Print the configuration as YAML
    Config {
        /// Config file to validate and echo; defaults are printed when absent
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Script {
    /// Full throttle straight ahead
    Cruise,
    /// Full throttle with periodic lane changes
    Weave,
    /// Accelerate, coast, then brake, repeatedly
    StopStart,
}

impl Script {
    fn input(self, tick: u64) -> InputSnapshot {
        match self {
            Script::Cruise => InputSnapshot::forward(),
            Script::Weave => match tick % 240 {
                0..=14 => InputSnapshot::forward().with(Control::Left),
                120..=134 => InputSnapshot::forward().with(Control::Right),
                _ => InputSnapshot::forward(),
            },
            Script::StopStart => match tick % 600 {
                0..=299 => InputSnapshot::forward(),
                300..=449 => InputSnapshot::IDLE,
                _ => InputSnapshot::IDLE.with(Control::Backward),
            },
        }
    }
}

#[derive(Serialize)]
struct DriveReport {
    seed: u64,
    script: String,
    summary: DriveSummary,
    segments_spawned: u64,
    segments_evicted: u64,
    traffic_spawned: u64,
    traffic_culled: u64,
    props_culled: u64,
    invalid_dropped: u64,
    tick_avg_us: u128,
    tick_p99_us: u128,
    tick_max_us: u128,
    /// Closest agent ahead in the player's lane.
    next_in_lane: Option<AgentInfo>,
    /// Peak engine sample, when the sound was synthesized.
    audio_peak: Option<f32>,
}

fn load_config(path: Option<&Path>) -> anyhow::Result<DriveConfig> {
    match path {
        Some(path) => DriveConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display())),
        None => Ok(DriveConfig::default()),
    }
}

fn drive(
    mut config: DriveConfig,
    seed: Option<u64>,
    ticks: u64,
    script: Script,
    render_every: Option<u64>,
    mut synth: Option<&mut SynthSink>,
) -> anyhow::Result<(World, DriveReport)> {
    if seed.is_some() {
        config.seed = seed;
    }
    let seed = config.seed_or_default();
    let mut world = World::new(config)?;
    world.step(&InputSnapshot::start(), TICK);

    let camera = ChaseCamera::default();
    let mut renderer = DebugTextRenderer::new();
    let mut audio = TracingAudioSink::default();
    let mut timer = TickTimer::new(1_024);
    let mut report = DriveReport {
        seed,
        script: format!("{script:?}"),
        summary: WorldInspector::summary(&world),
        segments_spawned: 0,
        segments_evicted: 0,
        traffic_spawned: 0,
        traffic_culled: 0,
        props_culled: 0,
        invalid_dropped: 0,
        tick_avg_us: 0,
        tick_p99_us: 0,
        tick_max_us: 0,
        next_in_lane: None,
        audio_peak: None,
    };

    for tick in 0..ticks {
        let started = Instant::now();
        let tick_report = world.step(&script.input(tick), TICK);
        timer.record(started.elapsed());

        report.segments_spawned += u64::from(tick_report.extended.is_some());
        report.segments_evicted += u64::from(tick_report.evicted.is_some());
        report.traffic_spawned += tick_report.traffic_spawned as u64;
        report.traffic_culled += tick_report.traffic_culled as u64;
        report.props_culled += tick_report.props_culled as u64;
        report.invalid_dropped += tick_report.invalid_dropped as u64;

        let config = world.config();
        let tone = engine_tone(
            world.player().speed,
            world.is_running(),
            &config.player,
            &config.audio,
        );
        audio.apply(tone);
        if let Some(synth) = synth.as_deref_mut() {
            synth.apply(tone);
        }

        if render_every.is_some_and(|n| n > 0 && (tick + 1) % n == 0) {
            print!("{}", renderer.render(&build_frame(&world, &camera)));
        }
        // The event log is only inspected through the tick reports here.
        world.drain_events();
    }

    report.summary = WorldInspector::summary(&world);
    report.tick_avg_us = timer.average().as_micros();
    report.tick_p99_us = timer.percentile(99.0).as_micros();
    report.tick_max_us = timer.max().as_micros();
    report.next_in_lane = WorldInspector::next_in_lane(&world, lane_half_width(&world));
    report.audio_peak = synth.map(|s| s.peak());
    tracing::info!(
        seed,
        ticks,
        z = report.summary.position[2],
        collisions = report.summary.collisions,
        "drive finished"
    );
    Ok((world, report))
}

/// Lanes sit a quarter road width apart.
fn lane_half_width(world: &World) -> f32 {
    world.config().road.road_width / 8.0
}

fn write_pcm(path: &Path, samples: &[f32]) -> anyhow::Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut out = BufWriter::new(file);
    for sample in samples {
        out.write_all(&sample.to_le_bytes())?;
    }
    out.flush()?;
    tracing::info!(path = %path.display(), samples = samples.len(), "engine sound written");
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info { config } => {
            let config = load_config(config.as_deref())?;
            println!("motorway-cli v{}", env!("CARGO_PKG_VERSION"));
            println!(
                "road: segment_length={} width={} window={}",
                config.road.segment_length, config.road.road_width, config.road.window_size
            );
            println!(
                "player: max_speed={} ({} km/h) style={}",
                config.player.max_speed,
                config.player.max_speed * motorway_kernel::KMH_PER_UNIT,
                config.player.style.name()
            );
            println!(
                "traffic: spawn_probability={} speed_factor={}",
                config.traffic.spawn_probability, config.traffic.speed_factor
            );
            println!("seed: {:#x}", config.seed_or_default());
        }
        Commands::Drive {
            ticks,
            seed,
            config,
            script,
            render_every,
            json,
            agents,
            pcm,
        } => {
            let config = load_config(config.as_deref())?;
            let mut synth = pcm.as_ref().map(|_| SynthSink::new(SAMPLE_RATE, TICK));
            let (world, report) =
                drive(config, seed, ticks, script, render_every, synth.as_mut())?;
            if let (Some(path), Some(synth)) = (&pcm, &synth) {
                write_pcm(path, synth.samples())?;
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", report.summary);
                println!(
                    "segments: +{} -{}  traffic: +{} -{}  props culled: {}  invalid: {}",
                    report.segments_spawned,
                    report.segments_evicted,
                    report.traffic_spawned,
                    report.traffic_culled,
                    report.props_culled,
                    report.invalid_dropped
                );
                println!(
                    "tick time: avg {}us  p99 {}us  max {}us",
                    report.tick_avg_us, report.tick_p99_us, report.tick_max_us
                );
                if let Some(next) = &report.next_in_lane {
                    println!("next in lane: {next}");
                }
                if let Some(peak) = report.audio_peak {
                    println!("engine peak: {peak:.3}");
                }
                println!("state hash: {:#018x}", report.summary.state_hash);
            }
            if agents {
                for id in WorldInspector::list_agents(&world) {
                    if let Some(info) = WorldInspector::inspect_agent(&world, id) {
                        println!("  {info}");
                    }
                }
            }
        }
        Commands::Determinism { ticks, seed, runs } => {
            let config = DriveConfig {
                seed: Some(seed),
                ..DriveConfig::default()
            };
            let script: Vec<InputSnapshot> = std::iter::once(InputSnapshot::start())
                .chain((0..ticks).map(|t| Script::Weave.input(t)))
                .collect();

            let mut hashes = Vec::with_capacity(runs);
            for run in 0..runs.max(1) {
                let world = World::replay(config.clone(), &script, TICK)?;
                let hash = world.state_hash();
                println!("run {run}: tick={} hash={hash:#018x}", world.tick());
                hashes.push(hash);
            }
            let consistent = hashes.windows(2).all(|w| w[0] == w[1]);
            println!("Match: {}", if consistent { "OK" } else { "MISMATCH" });
            if !consistent {
                tracing::error!(seed, ticks, "replays diverged");
                anyhow::bail!("state hashes diverged across {runs} runs");
            }
        }
        Commands::Config { config } => {
            let config = load_config(config.as_deref())?;
            print!("{}", config.to_yaml()?);
        }
    }

    Ok(())
}
