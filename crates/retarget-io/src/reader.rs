//! CSV clip reader with full input validation.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use retarget_dtw::Sequence;
use tracing::{debug, info, instrument};

use crate::IoError;
use crate::domain::{Clip, JointName};

/// Reads a motion clip from a long-format CSV file.
///
/// Expected CSV format:
/// - Header row required: `joint,<c1>,...,<cK>` with K >= 1 component columns
///   (for example `joint,rx,ry,rz`)
/// - One row per frame per joint; a joint's frames are taken in row order
/// - Rows of different joints may interleave
///
/// Joints are returned in order of first appearance.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::CsvParse`] | Malformed CSV record |
/// | [`IoError::NoComponents`] | Header has no column after `joint` |
/// | [`IoError::EmptyDataset`] | Zero data rows after header |
/// | [`IoError::InconsistentRowLength`] | Row has different column count than header |
/// | [`IoError::EmptyJointName`] | Joint cell is blank |
/// | [`IoError::NonFiniteValue`] | Cell is NaN, Inf, or unparseable float |
pub struct ClipReader {
    path: PathBuf,
}

impl ClipReader {
    /// Create a new reader for the given CSV file path.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Read and validate the CSV file, returning a [`Clip`].
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn read(&self) -> Result<Clip, IoError> {
        let file = std::fs::File::open(&self.path).map_err(|e| IoError::FileNotFound {
            path: self.path.clone(),
            source: e,
        })?;

        // flexible(true) so that our own InconsistentRowLength check fires
        // instead of a low-level CsvParse error.
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(file);

        let header = rdr.headers().map_err(|e| self.parse_error(e))?;
        let expected_cols = header.len();
        if expected_cols < 2 {
            return Err(IoError::NoComponents {
                path: self.path.clone(),
            });
        }
        let components: Vec<String> = header.iter().skip(1).map(str::to_string).collect();
        let dim = components.len();
        debug!(dim, ?components, "read CSV header");

        let mut index: HashMap<String, usize> = HashMap::new();
        let mut names: Vec<String> = Vec::new();
        let mut buffers: Vec<Vec<f64>> = Vec::new();
        let mut n_rows = 0usize;

        for (row_index, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| self.parse_error(e))?;
            let joint = record.get(0).unwrap_or("");

            if record.len() != expected_cols {
                return Err(IoError::InconsistentRowLength {
                    path: self.path.clone(),
                    row_index,
                    joint: joint.to_string(),
                    expected: expected_cols,
                    got: record.len(),
                });
            }
            if joint.is_empty() {
                return Err(IoError::EmptyJointName {
                    path: self.path.clone(),
                    row_index,
                });
            }

            let slot = match index.get(joint) {
                Some(&slot) => slot,
                None => {
                    let slot = names.len();
                    index.insert(joint.to_string(), slot);
                    names.push(joint.to_string());
                    buffers.push(Vec::new());
                    slot
                }
            };

            for col_index in 1..record.len() {
                let raw = record.get(col_index).unwrap_or("");
                let value = raw
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| IoError::NonFiniteValue {
                        path: self.path.clone(),
                        row_index,
                        col_index: col_index - 1,
                        raw: raw.to_string(),
                    })?;
                buffers[slot].push(value);
            }
            n_rows += 1;
        }

        if n_rows == 0 {
            return Err(IoError::EmptyDataset {
                path: self.path.clone(),
            });
        }

        let mut channels = Vec::with_capacity(names.len());
        for (name, data) in names.into_iter().zip(buffers) {
            let channel = Sequence::from_flat(dim, data).map_err(|source| {
                IoError::InvalidChannel {
                    joint: name.clone(),
                    source,
                }
            })?;
            channels.push((JointName::new(name)?, channel));
        }

        let clip = Clip::new(components, channels)?;
        info!(n_joints = clip.n_joints(), n_rows, "clip loaded");
        Ok(clip)
    }

    fn parse_error(&self, e: csv::Error) -> IoError {
        IoError::CsvParse {
            path: self.path.clone(),
            offset: e.position().map_or(0, |p| p.byte()),
            source: e,
        }
    }
}
