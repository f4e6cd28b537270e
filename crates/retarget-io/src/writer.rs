//! Clip CSV and alignment JSON writer.

use std::fs;
use std::path::{Path, PathBuf};

use retarget_dtw::Traceback;
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::IoError;
use crate::domain::{Clip, ExperimentName};
use crate::retarget::RetargetOutput;

/// Writes retargeting results.
///
/// Creates the output directory on construction if it does not exist.
/// Output files are named `{experiment}_source.csv`,
/// `{experiment}_target.csv`, and `{experiment}_alignment.json`.
pub struct ResultWriter {
    output_dir: PathBuf,
    experiment: ExperimentName,
}

impl ResultWriter {
    /// Create a new writer targeting the given directory and experiment name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::OutputDirCreate`] if the directory cannot be created.
    #[instrument(skip_all, fields(dir = %output_dir.display(), experiment = %experiment))]
    pub fn new(output_dir: &Path, experiment: ExperimentName) -> Result<Self, IoError> {
        fs::create_dir_all(output_dir).map_err(|e| IoError::OutputDirCreate {
            path: output_dir.to_path_buf(),
            source: e,
        })?;
        debug!("output directory ready");
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            experiment,
        })
    }

    /// Write both resampled clips and the alignment report.
    ///
    /// Returns the paths written, in the order source, target, alignment.
    ///
    /// # Errors
    ///
    /// Same conditions as [`ResultWriter::write_clip`] and
    /// [`ResultWriter::write_alignment`].
    pub fn write_all(&self, output: &RetargetOutput) -> Result<[PathBuf; 3], IoError> {
        let source = self.write_clip("source", &output.source)?;
        let target = self.write_clip("target", &output.target)?;
        let alignment = self.write_alignment(output)?;
        Ok([source, target, alignment])
    }

    /// Write a clip to `{experiment}_{role}.csv` in the format
    /// [`ClipReader`](crate::ClipReader) reads: header `joint,<components>`,
    /// then every frame of each joint in clip order.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`IoError::CsvWrite`] | The file cannot be created or a record cannot be written |
    /// | [`IoError::WriteFile`] | Flushing the file fails |
    #[instrument(skip(self, clip), fields(n_joints = clip.n_joints()))]
    pub fn write_clip(&self, role: &str, clip: &Clip) -> Result<PathBuf, IoError> {
        let path = self
            .output_dir
            .join(format!("{}_{role}.csv", self.experiment.as_str()));
        let csv_error = |e| IoError::CsvWrite {
            path: path.clone(),
            source: e,
        };

        let mut wtr = csv::Writer::from_path(&path).map_err(csv_error)?;
        wtr.write_record(std::iter::once("joint").chain(clip.components().iter().map(String::as_str)))
            .map_err(csv_error)?;

        let mut n_rows = 0usize;
        for (joint, channel) in clip.iter() {
            for frame in channel.frames() {
                let mut record = Vec::with_capacity(frame.len() + 1);
                record.push(joint.to_string());
                record.extend(frame.iter().map(f64::to_string));
                wtr.write_record(&record).map_err(csv_error)?;
                n_rows += 1;
            }
        }
        wtr.flush().map_err(|e| IoError::WriteFile {
            path: path.clone(),
            source: e,
        })?;

        info!(path = %path.display(), n_rows, "clip written");
        Ok(path)
    }

    /// Write per-joint costs and warping paths to `{experiment}_alignment.json`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`IoError::Serialize`] | The report cannot be serialized |
    /// | [`IoError::WriteFile`] | The file cannot be written |
    #[instrument(skip_all, fields(n_reports = output.reports.len()))]
    pub fn write_alignment(&self, output: &RetargetOutput) -> Result<PathBuf, IoError> {
        let path = self
            .output_dir
            .join(format!("{}_alignment.json", self.experiment.as_str()));

        let joints: Vec<JointEntry> = output
            .reports
            .iter()
            .map(|report| JointEntry {
                source: report.pair.source().as_str(),
                target: report.pair.target().as_str(),
                normalized_cost: report.cost.value(),
                total_cost: report.total_cost,
                path_len: report.path.len(),
                path_x: report.path.path_x(),
                path_y: report.path.path_y(),
            })
            .collect();

        let driver = output.driver.as_ref().map(ToString::to_string);
        let artifact = AlignmentArtifact {
            experiment: self.experiment.as_str(),
            timeline: if driver.is_some() { "driver" } else { "per_joint" },
            driver: driver.as_deref(),
            traceback: traceback_name(output.traceback),
            source_frames: output.source.uniform_frame_count(),
            target_frames: output.target.uniform_frame_count(),
            joints,
        };

        let json = serde_json::to_string_pretty(&artifact).map_err(|e| IoError::Serialize {
            path: path.clone(),
            source: e,
        })?;
        fs::write(&path, &json).map_err(|e| IoError::WriteFile {
            path: path.clone(),
            source: e,
        })?;

        info!(path = %path.display(), "alignment report written");
        Ok(path)
    }
}

/// Stable lowercase name of a traceback mode, as accepted on the command line.
#[must_use]
pub fn traceback_name(traceback: Traceback) -> &'static str {
    match traceback {
        Traceback::Contiguous => "contiguous",
        Traceback::Reference => "reference",
    }
}

// --- Shadow structs for JSON serialization ---

#[derive(Serialize)]
struct AlignmentArtifact<'a> {
    experiment: &'a str,
    timeline: &'static str,
    driver: Option<&'a str>,
    traceback: &'static str,
    source_frames: Option<usize>,
    target_frames: Option<usize>,
    joints: Vec<JointEntry<'a>>,
}

#[derive(Serialize)]
struct JointEntry<'a> {
    source: &'a str,
    target: &'a str,
    normalized_cost: f64,
    total_cost: f64,
    path_len: usize,
    path_x: Vec<usize>,
    path_y: Vec<usize>,
}
