//! Error types for sequence validation and DTW alignment.

/// Errors from sequence construction, alignment, and resampling.
///
/// Every variant is an invalid-input condition. Alignment never retries or
/// substitutes a default path; the first problem found is returned.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum DtwError {
    /// Returned when a sequence (or an index list used to resample one) has no elements.
    #[error("sequence must be non-empty")]
    EmptySequence,

    /// Returned when frames are declared with zero components.
    #[error("frame dimension must be at least 1")]
    ZeroDimension,

    /// Returned when a frame has a different number of components than the first frame.
    #[error("frame {frame} has {got} components, expected {expected}")]
    RaggedFrame {
        /// Position of the offending frame.
        frame: usize,
        /// Dimension of the first frame.
        expected: usize,
        /// Dimension of the offending frame.
        got: usize,
    },

    /// Returned when a component is NaN, infinity, or negative infinity.
    #[error("non-finite value at frame {frame}, component {component}")]
    NonFiniteValue {
        /// Position of the frame containing the value.
        frame: usize,
        /// Component index within the frame.
        component: usize,
    },

    /// Returned when the two sequences being aligned have different frame dimensions.
    #[error("cannot align sequences of dimension {x_dim} and {y_dim}")]
    DimensionMismatch {
        /// Frame dimension of the first sequence.
        x_dim: usize,
        /// Frame dimension of the second sequence.
        y_dim: usize,
    },

    /// Returned when the frame metric produces NaN or a negative value.
    #[error("metric returned {value} for frames ({i}, {j}); distances must be non-negative")]
    InvalidDistance {
        /// Frame index in the first sequence.
        i: usize,
        /// Frame index in the second sequence.
        j: usize,
        /// The rejected distance.
        value: f64,
    },

    /// Returned when a resampling index points past the end of the sequence.
    #[error("index {index} at position {position} is out of range for sequence of length {len}")]
    IndexOutOfRange {
        /// Position within the index list.
        position: usize,
        /// The offending index.
        index: usize,
        /// Length of the sequence being resampled.
        len: usize,
    },
}
