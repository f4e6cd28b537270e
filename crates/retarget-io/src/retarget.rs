//! Clip-level retargeting: align paired joints and resample their channels.

use rayon::prelude::*;
use retarget_dtw::{Dtw, FrameDistance, NormalizedCost, Sequence, Traceback, WarpPath, resample};
use tracing::{debug, info, instrument};

use crate::IoError;
use crate::domain::{Clip, JointName};
use crate::pairing::JointPair;

/// How the output timeline is chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimelineMode {
    /// Align every pair independently. Each output joint follows its own
    /// warping path, so frame counts may differ between joints. Only paired
    /// joints appear in the output clips.
    PerJoint(Vec<JointPair>),

    /// Align one driver pair and apply its path to every channel: `path_x`
    /// to all source joints, `path_y` to all target joints. Every joint of
    /// both output clips ends with the same frame count.
    Driver(JointPair),
}

/// Outcome of aligning one joint pair.
#[derive(Debug, Clone, PartialEq)]
pub struct JointReport {
    /// The aligned pair.
    pub pair: JointPair,
    /// Length-normalized DTW cost.
    pub cost: NormalizedCost,
    /// Final accumulated cost before normalization.
    pub total_cost: f64,
    /// Warping path between the two channels.
    pub path: WarpPath,
}

/// Both resampled clips plus one report per alignment performed.
#[derive(Debug, Clone)]
pub struct RetargetOutput {
    /// Source clip on the shared timeline.
    pub source: Clip,
    /// Target clip on the shared timeline.
    pub target: Clip,
    /// Per-pair alignment reports, in pair order.
    pub reports: Vec<JointReport>,
    /// The driver pair, if [`TimelineMode::Driver`] was used.
    pub driver: Option<JointPair>,
    /// Traceback mode the alignments were computed with.
    pub traceback: Traceback,
}

/// Align a source clip to a target clip.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::MissingJoint`] | A pair names a joint absent from its clip |
/// | [`IoError::Alignment`] | DTW fails for a pair, or a channel is too short for the driver path |
#[instrument(skip_all, fields(n_source = source.n_joints(), n_target = target.n_joints()))]
pub fn retarget<D: FrameDistance>(
    dtw: &Dtw<D>,
    source: &Clip,
    target: &Clip,
    mode: &TimelineMode,
) -> Result<RetargetOutput, IoError> {
    match mode {
        TimelineMode::PerJoint(pairs) => per_joint(dtw, source, target, pairs),
        TimelineMode::Driver(driver) => driven(dtw, source, target, driver),
    }
}

fn per_joint<D: FrameDistance>(
    dtw: &Dtw<D>,
    source: &Clip,
    target: &Clip,
    pairs: &[JointPair],
) -> Result<RetargetOutput, IoError> {
    let aligned: Vec<(JointReport, Sequence, Sequence)> = pairs
        .par_iter()
        .map(|pair| -> Result<_, IoError> {
            let (report, x, y) = align_pair(dtw, source, target, pair)?;
            let (xa, ya) = resample_pair_for(pair, x, y, &report.path)?;
            Ok((report, xa, ya))
        })
        .collect::<Result<_, IoError>>()?;

    let mut source_channels = Vec::with_capacity(aligned.len());
    let mut target_channels = Vec::with_capacity(aligned.len());
    let mut reports = Vec::with_capacity(aligned.len());
    for (report, xa, ya) in aligned {
        source_channels.push((report.pair.source().clone(), xa));
        target_channels.push((report.pair.target().clone(), ya));
        reports.push(report);
    }

    info!(n_pairs = reports.len(), "per-joint retargeting complete");
    Ok(RetargetOutput {
        source: Clip::new(source.components().to_vec(), source_channels)?,
        target: Clip::new(target.components().to_vec(), target_channels)?,
        reports,
        driver: None,
        traceback: dtw.traceback(),
    })
}

fn driven<D: FrameDistance>(
    dtw: &Dtw<D>,
    source: &Clip,
    target: &Clip,
    driver: &JointPair,
) -> Result<RetargetOutput, IoError> {
    let (report, _, _) = align_pair(dtw, source, target, driver)?;
    let path_x = report.path.path_x();
    let path_y = report.path.path_y();

    let source_out = resample_clip(source, &path_x)?;
    let target_out = resample_clip(target, &path_y)?;

    info!(
        driver = %driver,
        n_frames = report.path.len(),
        "driver retargeting complete"
    );
    Ok(RetargetOutput {
        source: source_out,
        target: target_out,
        reports: vec![report],
        driver: Some(driver.clone()),
        traceback: dtw.traceback(),
    })
}

fn lookup<'c>(
    clip: &'c Clip,
    side: &'static str,
    joint: &JointName,
) -> Result<&'c Sequence, IoError> {
    clip.channel(joint.as_str()).ok_or_else(|| IoError::MissingJoint {
        clip: side,
        joint: joint.to_string(),
    })
}

fn align_pair<'c, D: FrameDistance>(
    dtw: &Dtw<D>,
    source: &'c Clip,
    target: &'c Clip,
    pair: &JointPair,
) -> Result<(JointReport, &'c Sequence, &'c Sequence), IoError> {
    let x = lookup(source, "source", pair.source())?;
    let y = lookup(target, "target", pair.target())?;

    let alignment = dtw
        .align(x.as_view(), y.as_view())
        .map_err(|source| IoError::Alignment {
            joint: pair.to_string(),
            source,
        })?;
    let total_cost = alignment.total_cost();
    let (cost, _, path) = alignment.into_parts();
    debug!(pair = %pair, cost = cost.value(), path_len = path.len(), "pair aligned");

    let report = JointReport {
        pair: pair.clone(),
        cost,
        total_cost,
        path,
    };
    Ok((report, x, y))
}

fn resample_pair_for(
    pair: &JointPair,
    x: &Sequence,
    y: &Sequence,
    path: &WarpPath,
) -> Result<(Sequence, Sequence), IoError> {
    retarget_dtw::resample_pair(x.as_view(), y.as_view(), path).map_err(|source| {
        IoError::Alignment {
            joint: pair.to_string(),
            source,
        }
    })
}

fn resample_clip(clip: &Clip, indices: &[usize]) -> Result<Clip, IoError> {
    let channels = clip
        .joints()
        .par_iter()
        .zip(clip.channels().par_iter())
        .map(|(joint, channel)| {
            resample(channel.as_view(), indices)
                .map(|resampled| (joint.clone(), resampled))
                .map_err(|source| IoError::Alignment {
                    joint: joint.to_string(),
                    source,
                })
        })
        .collect::<Result<Vec<_>, IoError>>()?;
    Clip::new(clip.components().to_vec(), channels)
}
