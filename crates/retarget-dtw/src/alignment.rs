//! The result of aligning two sequences.

use crate::cost::CostMatrix;
use crate::distance::NormalizedCost;
use crate::error::DtwError;
use crate::path::WarpPath;
use crate::resample::resample_pair;
use crate::sequence::{Sequence, SequenceView};

/// Normalized cost, accumulated cost matrix, and optimal warping path for one
/// pair of sequences.
#[derive(Debug, Clone, PartialEq)]
pub struct Alignment {
    pub(crate) cost: NormalizedCost,
    pub(crate) matrix: CostMatrix,
    pub(crate) path: WarpPath,
}

impl Alignment {
    /// Return the length-normalized cost (`total_cost / (N1 + N2)`).
    #[must_use]
    pub fn cost(&self) -> NormalizedCost {
        self.cost
    }

    /// Return the final accumulated cost, before normalization.
    #[must_use]
    pub fn total_cost(&self) -> f64 {
        self.matrix.last()
    }

    /// Return the accumulated cost matrix (`N1 × N2`).
    #[must_use]
    pub fn matrix(&self) -> &CostMatrix {
        &self.matrix
    }

    /// Return the warping path.
    #[must_use]
    pub fn path(&self) -> &WarpPath {
        &self.path
    }

    /// Re-index both input sequences along the path.
    ///
    /// `x` and `y` must be the sequences this alignment was computed from.
    ///
    /// # Errors
    ///
    /// Returns [`DtwError::IndexOutOfRange`] if either sequence is shorter than
    /// the one the alignment was computed from.
    pub fn resample(
        &self,
        x: SequenceView<'_>,
        y: SequenceView<'_>,
    ) -> Result<(Sequence, Sequence), DtwError> {
        resample_pair(x, y, &self.path)
    }

    /// Consume and return `(cost, matrix, path)`.
    #[must_use]
    pub fn into_parts(self) -> (NormalizedCost, CostMatrix, WarpPath) {
        (self.cost, self.matrix, self.path)
    }
}
