//! Pointwise and accumulated cost matrices.

use std::ops::Index;

use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::error::DtwError;
use crate::metric::{FrameDistance, Manhattan};
use crate::sequence::SequenceView;

/// Grids with fewer cells than this fill their pointwise pass sequentially.
pub const PARALLEL_MIN_CELLS: usize = 16_384;

/// Dense row-major `rows × cols` matrix of alignment costs.
///
/// Row `i` corresponds to frame `i` of the first sequence and column `j` to
/// frame `j` of the second.
#[derive(Debug, Clone, PartialEq)]
pub struct CostMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl CostMatrix {
    /// Create a matrix from row-major data.
    pub(crate) fn from_raw(rows: usize, cols: usize, data: Vec<f64>) -> Self {
        debug_assert_eq!(data.len(), rows * cols);
        Self { rows, cols, data }
    }

    /// Return the number of rows (frames in the first sequence).
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Return the number of columns (frames in the second sequence).
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Return the cost at `(i, j)`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= rows()` or `j >= cols()`.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        assert!(i < self.rows, "row index {i} out of bounds for {} rows", self.rows);
        assert!(j < self.cols, "column index {j} out of bounds for {} columns", self.cols);
        self.data[i * self.cols + j]
    }

    /// Return row `i` as a slice.
    ///
    /// # Panics
    ///
    /// Panics if `i >= rows()`.
    #[must_use]
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Return the bottom-right cell. For an accumulated matrix this is the
    /// minimum total alignment cost.
    #[must_use]
    pub fn last(&self) -> f64 {
        self.data[self.data.len() - 1]
    }

    /// Return all cells in row-major order.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Copy the matrix out as one vector per row.
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.data.chunks_exact(self.cols).map(<[f64]>::to_vec).collect()
    }
}

impl Index<(usize, usize)> for CostMatrix {
    type Output = f64;

    fn index(&self, (i, j): (usize, usize)) -> &Self::Output {
        assert!(i < self.rows && j < self.cols, "index ({i}, {j}) out of bounds");
        &self.data[i * self.cols + j]
    }
}

/// Builds DTW cost matrices between two sequences.
///
/// Construction uses an `(N1 + 1) × (N2 + 1)` grid whose first row and column
/// are `+inf` sentinels (with `[0][0] = 0`), so the recurrence needs no
/// special case on the borders. The sentinel border is dropped before the
/// matrix is returned.
#[derive(Debug, Clone, Copy)]
pub struct CostMatrixBuilder<D = Manhattan> {
    metric: D,
    parallel: bool,
}

impl Default for CostMatrixBuilder<Manhattan> {
    fn default() -> Self {
        Self::new(Manhattan)
    }
}

impl<D: FrameDistance> CostMatrixBuilder<D> {
    /// Create a builder using `metric` as the local cost.
    #[must_use]
    pub fn new(metric: D) -> Self {
        Self {
            metric,
            parallel: true,
        }
    }

    /// Enable or disable the parallel pointwise pass. Enabled by default;
    /// grids below [`PARALLEL_MIN_CELLS`] always run sequentially.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Return true if the pointwise pass may run in parallel.
    #[must_use]
    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    /// Return the frame metric.
    #[must_use]
    pub fn metric(&self) -> &D {
        &self.metric
    }

    /// Compute the pointwise distance matrix `dist(x[i], y[j])`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::DimensionMismatch`] | `x` and `y` frames differ in dimension |
    /// | [`DtwError::InvalidDistance`] | The metric returned NaN or a negative value |
    #[instrument(skip_all, fields(n1 = x.len(), n2 = y.len()))]
    pub fn pointwise(
        &self,
        x: SequenceView<'_>,
        y: SequenceView<'_>,
    ) -> Result<CostMatrix, DtwError> {
        let grid = self.pointwise_grid(x, y)?;
        Ok(grid.trim())
    }

    /// Compute the accumulated cost matrix.
    ///
    /// Cell `(i, j)` of the result holds the minimum cumulative cost of
    /// aligning `x[0..=i]` with `y[0..=j]`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::DimensionMismatch`] | `x` and `y` frames differ in dimension |
    /// | [`DtwError::InvalidDistance`] | The metric returned NaN or a negative value |
    #[instrument(skip_all, fields(n1 = x.len(), n2 = y.len()))]
    pub fn build(&self, x: SequenceView<'_>, y: SequenceView<'_>) -> Result<CostMatrix, DtwError> {
        let mut grid = self.pointwise_grid(x, y)?;
        grid.accumulate();
        Ok(grid.trim())
    }

    fn pointwise_grid(
        &self,
        x: SequenceView<'_>,
        y: SequenceView<'_>,
    ) -> Result<SentinelGrid, DtwError> {
        check_dims(x, y)?;
        let mut grid = SentinelGrid::allocate(x.len(), y.len());
        let parallel = self.parallel && x.len() * y.len() >= PARALLEL_MIN_CELLS;
        debug!(parallel, "filling pointwise distances");
        grid.fill_pointwise(x, y, &self.metric, parallel);
        grid.validate()?;
        Ok(grid)
    }
}

/// Reject a pair of sequences whose frames cannot be compared.
pub(crate) fn check_dims(x: SequenceView<'_>, y: SequenceView<'_>) -> Result<(), DtwError> {
    if x.dim() != y.dim() {
        return Err(DtwError::DimensionMismatch {
            x_dim: x.dim(),
            y_dim: y.dim(),
        });
    }
    Ok(())
}

/// Reject a metric output that is NaN or negative.
#[inline]
pub(crate) fn check_distance(i: usize, j: usize, value: f64) -> Result<f64, DtwError> {
    if value >= 0.0 {
        Ok(value)
    } else {
        Err(DtwError::InvalidDistance { i, j, value })
    }
}

/// The `(N1 + 1) × (N2 + 1)` working grid with a sentinel border.
struct SentinelGrid {
    rows: usize,
    cols: usize,
    width: usize,
    data: Vec<f64>,
}

impl SentinelGrid {
    fn allocate(rows: usize, cols: usize) -> Self {
        let width = cols + 1;
        let mut data = vec![0.0; (rows + 1) * width];
        data[1..width].fill(f64::INFINITY);
        for i in 1..=rows {
            data[i * width] = f64::INFINITY;
        }
        Self {
            rows,
            cols,
            width,
            data,
        }
    }

    fn fill_pointwise<D: FrameDistance>(
        &mut self,
        x: SequenceView<'_>,
        y: SequenceView<'_>,
        metric: &D,
        parallel: bool,
    ) {
        let fill_row = |(i, row): (usize, &mut [f64])| {
            let xi = x.frame(i);
            for (cell, yj) in row[1..].iter_mut().zip(y.frames()) {
                *cell = metric.distance(xi, yj);
            }
        };
        let body = &mut self.data[self.width..];
        if parallel {
            body.par_chunks_mut(self.width).enumerate().for_each(fill_row);
        } else {
            body.chunks_mut(self.width).enumerate().for_each(fill_row);
        }
    }

    fn validate(&self) -> Result<(), DtwError> {
        for i in 0..self.rows {
            for j in 0..self.cols {
                check_distance(i, j, self.data[(i + 1) * self.width + j + 1])?;
            }
        }
        Ok(())
    }

    /// Runs only after the pointwise pass has filled every cell.
    fn accumulate(&mut self) {
        let w = self.width;
        for i in 0..self.rows {
            for j in 0..self.cols {
                let diag = self.data[i * w + j];
                let up = self.data[i * w + j + 1];
                let left = self.data[(i + 1) * w + j];
                self.data[(i + 1) * w + j + 1] += diag.min(up).min(left);
            }
        }
    }

    fn trim(&self) -> CostMatrix {
        let mut data = Vec::with_capacity(self.rows * self.cols);
        for row in self.data.chunks_exact(self.width).skip(1) {
            data.extend_from_slice(&row[1..]);
        }
        CostMatrix::from_raw(self.rows, self.cols, data)
    }
}
