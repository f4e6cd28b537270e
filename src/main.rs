use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

use retarget_dtw::{Dtw, Euclidean, FrameDistance, Traceback};
use retarget_io::{
    Clip, ClipReader, ExperimentName, JointPair, ResultWriter, RetargetOutput, TimelineMode,
    pair_joints, retarget, traceback_name,
};

#[derive(Parser)]
#[command(name = "mocap-retarget")]
#[command(about = "Align motion-capture clips onto a shared timeline with Dynamic Time Warping")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose (debug-level) logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Number of threads for parallel computation (defaults to all cores)
    #[arg(long, global = true)]
    threads: Option<usize>,
}

/// Input clips and joint correspondence shared by every subcommand.
#[derive(Args, Debug, Clone)]
struct ClipArgs {
    /// Path to the source clip CSV (joint,<components>...)
    #[arg(long)]
    source: PathBuf,

    /// Path to the target clip CSV (joint,<components>...)
    #[arg(long)]
    target: PathBuf,

    /// Joint pair source:target (repeatable; defaults to pairing by name)
    #[arg(long = "pair")]
    pairs: Vec<JointPair>,

    /// Frame distance: "l1" (Manhattan) or "l2" (Euclidean)
    #[arg(long, default_value = "l1")]
    metric: String,
}

#[derive(Subcommand)]
enum Command {
    /// Align the source clip to the target clip and write both resampled clips
    Align {
        #[command(flatten)]
        clips: ClipArgs,

        /// Align only this pair and apply its path to every joint of both clips
        #[arg(long, conflicts_with = "pairs")]
        driver: Option<JointPair>,

        /// Traceback boundary handling: "contiguous" or "reference"
        #[arg(long, default_value = "contiguous")]
        traceback: String,

        /// Experiment name for output files (must match [a-zA-Z0-9_-]+)
        #[arg(long)]
        experiment: String,

        /// Output directory for result files
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
    },

    /// Print the normalized DTW cost of each joint pair without aligning
    Score {
        #[command(flatten)]
        clips: ClipArgs,
    },
}

#[derive(Serialize)]
struct AlignOutput {
    experiment: String,
    metric: String,
    timeline: &'static str,
    traceback: &'static str,
    source_frames: Option<usize>,
    target_frames: Option<usize>,
    files: Vec<String>,
    joints: Vec<JointOutput>,
}

#[derive(Serialize)]
struct JointOutput {
    pair: String,
    normalized_cost: f64,
    total_cost: f64,
    path_len: usize,
}

#[derive(Serialize)]
struct ScoreOutput {
    metric: String,
    joints: Vec<ScoreEntry>,
}

#[derive(Serialize)]
struct ScoreEntry {
    pair: String,
    source_frames: usize,
    target_frames: usize,
    normalized_cost: f64,
}

#[derive(Debug, Clone, Copy)]
enum Metric {
    Manhattan,
    Euclidean,
}

fn parse_metric(s: &str) -> Result<Metric> {
    match s {
        "l1" | "manhattan" => Ok(Metric::Manhattan),
        "l2" | "euclidean" => Ok(Metric::Euclidean),
        other => anyhow::bail!("unknown metric: {other} (expected l1 or l2)"),
    }
}

fn parse_traceback(s: &str) -> Result<Traceback> {
    match s {
        "contiguous" => Ok(Traceback::Contiguous),
        "reference" => Ok(Traceback::Reference),
        other => anyhow::bail!("unknown traceback: {other} (expected contiguous or reference)"),
    }
}

fn read_clips(args: &ClipArgs) -> Result<(Clip, Clip)> {
    let source = ClipReader::new(&args.source)
        .read()
        .context("failed to read source clip")?;
    let target = ClipReader::new(&args.target)
        .read()
        .context("failed to read target clip")?;
    info!(
        source_joints = source.n_joints(),
        target_joints = target.n_joints(),
        "clips loaded"
    );
    Ok((source, target))
}

fn run_align<D: FrameDistance>(
    dtw: &Dtw<D>,
    source: &Clip,
    target: &Clip,
    mode: &TimelineMode,
    writer: &ResultWriter,
) -> Result<(RetargetOutput, Vec<String>)> {
    let output = retarget(dtw, source, target, mode).context("retargeting failed")?;
    let files = writer
        .write_all(&output)?
        .iter()
        .map(|p| p.display().to_string())
        .collect();
    Ok((output, files))
}

fn run_score<D: FrameDistance>(
    dtw: &Dtw<D>,
    source: &Clip,
    target: &Clip,
    pairs: &[JointPair],
) -> Result<Vec<ScoreEntry>> {
    pairs
        .par_iter()
        .map(|pair| -> Result<ScoreEntry> {
            let x = source
                .channel(pair.source().as_str())
                .with_context(|| format!("source joint {} not found", pair.source()))?;
            let y = target
                .channel(pair.target().as_str())
                .with_context(|| format!("target joint {} not found", pair.target()))?;
            let cost = dtw
                .distance(x.as_view(), y.as_view())
                .with_context(|| format!("scoring {pair} failed"))?;
            Ok(ScoreEntry {
                pair: pair.to_string(),
                source_frames: x.len(),
                target_frames: y.len(),
                normalized_cost: cost.value(),
            })
        })
        .collect()
}

fn init_logging(verbose: bool, quiet: bool) {
    let filter = match (verbose, quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn open_writer(output_dir: &Path, experiment: &str) -> Result<ResultWriter> {
    let experiment_name = ExperimentName::new(experiment.to_string())?;
    Ok(ResultWriter::new(output_dir, experiment_name)?)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    // Configure Rayon thread pool
    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure thread pool")?;
        info!(threads, "thread pool configured");
    }

    match cli.command {
        Command::Align {
            clips,
            driver,
            traceback,
            experiment,
            output_dir,
        } => {
            let metric = parse_metric(&clips.metric)?;
            let traceback = parse_traceback(&traceback)?;
            let writer = open_writer(&output_dir, &experiment)?;

            let (source, target) = read_clips(&clips)?;
            let mode = match driver {
                Some(driver) => {
                    pair_joints(&source, &target, std::slice::from_ref(&driver))
                        .context("invalid driver pair")?;
                    TimelineMode::Driver(driver)
                }
                None => TimelineMode::PerJoint(
                    pair_joints(&source, &target, &clips.pairs)
                        .context("failed to pair joints")?,
                ),
            };

            let dtw = Dtw::new().with_traceback(traceback);
            let (output, files) = match metric {
                Metric::Manhattan => run_align(&dtw, &source, &target, &mode, &writer)?,
                Metric::Euclidean => {
                    run_align(&dtw.with_metric(Euclidean), &source, &target, &mode, &writer)?
                }
            };

            let summary = AlignOutput {
                experiment,
                metric: clips.metric,
                timeline: if output.driver.is_some() { "driver" } else { "per_joint" },
                traceback: traceback_name(output.traceback),
                source_frames: output.source.uniform_frame_count(),
                target_frames: output.target.uniform_frame_count(),
                files,
                joints: output
                    .reports
                    .iter()
                    .map(|r| JointOutput {
                        pair: r.pair.to_string(),
                        normalized_cost: r.cost.value(),
                        total_cost: r.total_cost,
                        path_len: r.path.len(),
                    })
                    .collect(),
            };
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }

        Command::Score { clips } => {
            let metric = parse_metric(&clips.metric)?;
            let (source, target) = read_clips(&clips)?;
            let pairs =
                pair_joints(&source, &target, &clips.pairs).context("failed to pair joints")?;

            let dtw = Dtw::new();
            let joints = match metric {
                Metric::Manhattan => run_score(&dtw, &source, &target, &pairs)?,
                Metric::Euclidean => {
                    run_score(&dtw.with_metric(Euclidean), &source, &target, &pairs)?
                }
            };
            info!(n_pairs = joints.len(), "scoring complete");

            let output = ScoreOutput {
                metric: clips.metric,
                joints,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
