//! DTW alignment entry points.

use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::alignment::Alignment;
use crate::cost::{CostMatrixBuilder, check_dims, check_distance};
use crate::distance::NormalizedCost;
use crate::error::DtwError;
use crate::metric::{FrameDistance, Manhattan};
use crate::resample::resample_pair;
use crate::sequence::{Sequence, SequenceView};
use crate::traceback::Traceback;

/// Immutable DTW configuration: frame metric, traceback mode, and whether the
/// pointwise pass may run in parallel. Thread-safe; copyable when the metric is.
///
/// # Defaults
///
/// | Parameter   | Default                  |
/// |-------------|--------------------------|
/// | `metric`    | [`Manhattan`] (L1)       |
/// | `traceback` | [`Traceback::Contiguous`] |
/// | `parallel`  | `true`                   |
#[derive(Debug, Clone, Copy)]
pub struct Dtw<D = Manhattan> {
    builder: CostMatrixBuilder<D>,
    traceback: Traceback,
}

impl Dtw<Manhattan> {
    /// Create a DTW calculator with the L1 metric and contiguous traceback.
    #[must_use]
    pub fn new() -> Self {
        Self {
            builder: CostMatrixBuilder::new(Manhattan),
            traceback: Traceback::default(),
        }
    }
}

impl Default for Dtw<Manhattan> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: FrameDistance> Dtw<D> {
    /// Replace the frame metric.
    #[must_use]
    pub fn with_metric<M: FrameDistance>(self, metric: M) -> Dtw<M> {
        Dtw {
            builder: CostMatrixBuilder::new(metric).with_parallel(self.builder.is_parallel()),
            traceback: self.traceback,
        }
    }

    /// Set the traceback mode.
    #[must_use]
    pub fn with_traceback(mut self, traceback: Traceback) -> Self {
        self.traceback = traceback;
        self
    }

    /// Enable or disable the parallel pointwise pass.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.builder = self.builder.with_parallel(parallel);
        self
    }

    /// Return the traceback mode.
    #[must_use]
    pub fn traceback(&self) -> Traceback {
        self.traceback
    }

    /// Return the underlying cost-matrix builder.
    #[must_use]
    pub fn builder(&self) -> &CostMatrixBuilder<D> {
        &self.builder
    }

    /// Align two sequences: accumulated cost matrix, normalized cost, and path.
    ///
    /// Runs in O(N1 * N2) time and space.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::DimensionMismatch`] | `x` and `y` frames differ in dimension |
    /// | [`DtwError::InvalidDistance`] | The metric returned NaN or a negative value |
    #[instrument(skip_all, fields(n1 = x.len(), n2 = y.len(), traceback = ?self.traceback))]
    pub fn align(&self, x: SequenceView<'_>, y: SequenceView<'_>) -> Result<Alignment, DtwError> {
        let matrix = self.builder.build(x, y)?;
        let path = self.traceback.walk(&matrix);
        let cost = NormalizedCost::from_total(matrix.last(), x.len(), y.len());
        debug!(total = matrix.last(), path_len = path.len(), "alignment complete");
        Ok(Alignment { cost, matrix, path })
    }

    /// Compute only the normalized cost.
    ///
    /// Uses a rolling two-row buffer instead of the full matrix: O(N1 * N2)
    /// time, O(N2) space. Index 0 of each row is the `+inf` left sentinel and
    /// the initial row is the sentinel row `[0, inf, inf, ...]`. The result is
    /// bit-identical to `align(x, y)?.cost()`.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Dtw::align`].
    #[instrument(skip_all, fields(n1 = x.len(), n2 = y.len()))]
    pub fn distance(
        &self,
        x: SequenceView<'_>,
        y: SequenceView<'_>,
    ) -> Result<NormalizedCost, DtwError> {
        check_dims(x, y)?;
        let metric = self.builder.metric();
        let m = y.len();

        let mut prev = vec![f64::INFINITY; m + 1];
        let mut curr = vec![f64::INFINITY; m + 1];
        prev[0] = 0.0;

        for (i, xi) in x.frames().enumerate() {
            curr[0] = f64::INFINITY;
            for (j, yj) in y.frames().enumerate() {
                let local = check_distance(i, j, metric.distance(xi, yj))?;
                curr[j + 1] = local + prev[j].min(prev[j + 1]).min(curr[j]);
            }
            std::mem::swap(&mut prev, &mut curr);
        }

        // After the final swap, `prev` holds the last completed row.
        Ok(NormalizedCost::from_total(prev[m], x.len(), y.len()))
    }

    /// Align two sequences and re-index both onto the shared timeline.
    ///
    /// Returns two sequences of equal length, frame-aligned.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Dtw::align`].
    pub fn apply(
        &self,
        x: SequenceView<'_>,
        y: SequenceView<'_>,
    ) -> Result<(Sequence, Sequence), DtwError> {
        let alignment = self.align(x, y)?;
        resample_pair(x, y, alignment.path())
    }

    /// Align many independent pairs in parallel.
    ///
    /// Results are returned in input order; a failing pair does not affect
    /// the others.
    #[must_use]
    #[instrument(skip_all, fields(n_pairs = pairs.len()))]
    pub fn align_many(
        &self,
        pairs: &[(SequenceView<'_>, SequenceView<'_>)],
    ) -> Vec<Result<Alignment, DtwError>> {
        pairs.par_iter().map(|&(x, y)| self.align(x, y)).collect()
    }
}
