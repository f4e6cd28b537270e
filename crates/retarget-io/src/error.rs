//! I/O error types for retarget-io.

use std::path::PathBuf;

use retarget_dtw::DtwError;

/// Errors from clip parsing, joint pairing, retargeting, and result serialization.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when the input file does not exist or is unreadable.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when the CSV parser encounters a malformed record.
    #[error("CSV parse error in {path} at byte offset {offset}")]
    CsvParse {
        /// Path to the CSV file.
        path: PathBuf,
        /// Byte offset where the error occurred.
        offset: u64,
        /// Underlying CSV error.
        source: csv::Error,
    },

    /// Returned when the CSV file contains a header but zero data rows.
    #[error("empty clip (no data rows) in {path}")]
    EmptyDataset {
        /// Path to the CSV file.
        path: PathBuf,
    },

    /// Returned when the header names no component columns after `joint`.
    #[error("no component columns in {path}: header must be joint,<c1>,...,<cK>")]
    NoComponents {
        /// Path to the CSV file.
        path: PathBuf,
    },

    /// Returned when a data row has a different number of columns than the header.
    #[error("inconsistent row length in {path}: row {row_index} (joint {joint}) has {got} columns, expected {expected}")]
    InconsistentRowLength {
        /// Path to the CSV file.
        path: PathBuf,
        /// Zero-based row index (excluding header).
        row_index: usize,
        /// Joint name of the offending row.
        joint: String,
        /// Expected number of columns (from header).
        expected: usize,
        /// Actual number of columns in this row.
        got: usize,
    },

    /// Returned when the joint column of a row is blank.
    #[error("empty joint name in {path}: row {row_index}")]
    EmptyJointName {
        /// Path to the CSV file.
        path: PathBuf,
        /// Zero-based row index (excluding header).
        row_index: usize,
    },

    /// Returned when a cell value is NaN, Inf, or otherwise not a finite float.
    #[error("non-finite value in {path}: row {row_index}, column {col_index}, raw value \"{raw}\"")]
    NonFiniteValue {
        /// Path to the CSV file.
        path: PathBuf,
        /// Zero-based row index (excluding header).
        row_index: usize,
        /// Zero-based column index (excluding the joint column).
        col_index: usize,
        /// The raw string value that failed to parse.
        raw: String,
    },

    /// Returned when a joint name is empty or whitespace.
    #[error("invalid joint name \"{name}\"")]
    InvalidJointName {
        /// The rejected name.
        name: String,
    },

    /// Returned when a joint pair is not of the form `source:target`.
    #[error("invalid joint pair \"{raw}\": expected source:target")]
    InvalidJointPair {
        /// The raw string that failed to parse.
        raw: String,
    },

    /// Returned when a joint appears twice in a clip or in a pair list.
    #[error("joint \"{joint}\" appears more than once")]
    DuplicateJoint {
        /// The repeated joint name.
        joint: String,
    },

    /// Returned when a channel's frame width differs from the clip's component count.
    #[error("joint \"{joint}\" has {got} components, clip declares {expected}")]
    ChannelDimension {
        /// Joint name of the offending channel.
        joint: String,
        /// Number of component columns of the clip.
        expected: usize,
        /// Frame dimension of the channel.
        got: usize,
    },

    /// Returned when a requested joint does not exist in a clip.
    #[error("joint \"{joint}\" not found in {clip} clip")]
    MissingJoint {
        /// Which clip was searched (`source` or `target`).
        clip: &'static str,
        /// The missing joint name.
        joint: String,
    },

    /// Returned when name-based pairing finds no joint present in both clips.
    #[error("source and target clips share no joint names")]
    NoCommonJoints,

    /// Returned when a channel sequence cannot be built from parsed values.
    #[error("invalid channel for joint \"{joint}\"")]
    InvalidChannel {
        /// Joint name of the channel.
        joint: String,
        /// Underlying validation error.
        source: DtwError,
    },

    /// Returned when aligning or resampling a joint pair fails.
    #[error("alignment failed for {joint}")]
    Alignment {
        /// The pair (`source:target`) or channel being processed.
        joint: String,
        /// Underlying DTW error.
        source: DtwError,
    },

    /// Returned when the experiment name contains characters outside `[a-zA-Z0-9_-]`.
    #[error("invalid experiment name \"{name}\": must match [a-zA-Z0-9_-]+")]
    InvalidExperimentName {
        /// The invalid name.
        name: String,
    },

    /// Returned when the output directory cannot be created.
    #[error("cannot create output directory {path}")]
    OutputDirCreate {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when a result file cannot be written.
    #[error("cannot write file {path}")]
    WriteFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when the CSV writer fails on an output clip.
    #[error("cannot write CSV {path}")]
    CsvWrite {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying CSV error.
        source: csv::Error,
    },

    /// Returned when a JSON artifact cannot be serialized.
    #[error("cannot serialize {path}")]
    Serialize {
        /// Path of the artifact.
        path: PathBuf,
        /// Underlying serde_json error.
        source: serde_json::Error,
    },
}
