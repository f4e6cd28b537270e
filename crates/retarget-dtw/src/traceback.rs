//! Warping path recovery from an accumulated cost matrix.

use tracing::instrument;

use crate::cost::CostMatrix;
use crate::path::{WarpPath, WarpStep};

/// How the traceback finishes once it reaches the first row or column.
///
/// Both modes walk back from `(N1 - 1, N2 - 1)` choosing the cheapest of the
/// diagonal, vertical, and horizontal predecessors, with ties resolved in that
/// order. They differ only after one index reaches zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Traceback {
    /// Step the remaining non-zero index down one frame at a time until
    /// `(0, 0)`. The path has no gaps and no repeated pairs.
    #[default]
    Contiguous,

    /// Jump straight to `(0, 0)` from wherever the walk stopped, as the
    /// classic Python `dtw` traceback does. Output is byte-compatible with
    /// that implementation: a gap appears when one index is still non-zero,
    /// and `(0, 0)` is duplicated when the walk already ended there.
    Reference,
}

impl Traceback {
    /// Recover the warping path from an accumulated cost matrix.
    #[must_use]
    #[instrument(skip(cost), fields(rows = cost.rows(), cols = cost.cols()))]
    pub fn walk(self, cost: &CostMatrix) -> WarpPath {
        let mut i = cost.rows() - 1;
        let mut j = cost.cols() - 1;
        let mut steps = vec![WarpStep { x: i, y: j }];

        while i > 0 && j > 0 {
            let diag = cost.get(i - 1, j - 1);
            let up = cost.get(i - 1, j);
            let left = cost.get(i, j - 1);

            if diag <= up && diag <= left {
                i -= 1;
                j -= 1;
            } else if up <= left {
                i -= 1;
            } else {
                j -= 1;
            }
            steps.push(WarpStep { x: i, y: j });
        }

        match self {
            Self::Contiguous => {
                while i > 0 {
                    i -= 1;
                    steps.push(WarpStep { x: i, y: 0 });
                }
                while j > 0 {
                    j -= 1;
                    steps.push(WarpStep { x: 0, y: j });
                }
            }
            Self::Reference => steps.push(WarpStep { x: 0, y: 0 }),
        }

        steps.reverse();
        WarpPath::new(steps)
    }
}

/// Recover the warping path with the default [`Traceback::Contiguous`] mode.
#[must_use]
pub fn backtrack(cost: &CostMatrix) -> WarpPath {
    Traceback::default().walk(cost)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(rows: &[&[f64]]) -> CostMatrix {
        let cols = rows[0].len();
        CostMatrix::from_raw(rows.len(), cols, rows.concat())
    }

    #[test]
    fn diagonal_wins_three_way_tie() {
        let m = matrix(&[&[1.0, 1.0], &[1.0, 2.0]]);
        let p = backtrack(&m);
        assert_eq!(p.path_x(), vec![0, 1]);
        assert_eq!(p.path_y(), vec![0, 1]);
    }

    #[test]
    fn vertical_beats_horizontal_on_tie() {
        let m = matrix(&[&[5.0, 1.0], &[1.0, 0.0]]);
        let p = backtrack(&m);
        assert_eq!(p.path_x(), vec![0, 0, 1]);
        assert_eq!(p.path_y(), vec![0, 1, 1]);
    }

    #[test]
    fn horizontal_when_strictly_cheapest() {
        let m = matrix(&[&[5.0, 4.0], &[1.0, 0.0]]);
        let p = backtrack(&m);
        assert_eq!(p.path_x(), vec![0, 1, 1]);
        assert_eq!(p.path_y(), vec![0, 0, 1]);
    }

    #[test]
    fn contiguous_walks_remaining_row() {
        // Single row: the loop never runs.
        let m = matrix(&[&[1.0, 1.0, 2.0, 4.0, 7.0]]);
        let p = Traceback::Contiguous.walk(&m);
        assert_eq!(p.path_x(), vec![0; 5]);
        assert_eq!(p.path_y(), vec![0, 1, 2, 3, 4]);
        assert!(p.is_contiguous());
    }

    #[test]
    fn contiguous_walks_remaining_column() {
        let m = matrix(&[&[0.0], &[1.0], &[3.0]]);
        let p = Traceback::Contiguous.walk(&m);
        assert_eq!(p.path_x(), vec![0, 1, 2]);
        assert_eq!(p.path_y(), vec![0, 0, 0]);
    }

    #[test]
    fn reference_leaves_gap_on_single_row() {
        let m = matrix(&[&[1.0, 1.0, 2.0, 4.0, 7.0]]);
        let p = Traceback::Reference.walk(&m);
        assert_eq!(p.path_x(), vec![0, 0]);
        assert_eq!(p.path_y(), vec![0, 4]);
        assert!(!p.is_contiguous());
    }

    #[test]
    fn reference_duplicates_origin_after_diagonal() {
        let m = matrix(&[&[0.0, 1.0], &[1.0, 0.0]]);
        let p = Traceback::Reference.walk(&m);
        assert_eq!(p.path_x(), vec![0, 0, 1]);
        assert_eq!(p.path_y(), vec![0, 0, 1]);

        let p = Traceback::Contiguous.walk(&m);
        assert_eq!(p.path_x(), vec![0, 1]);
        assert_eq!(p.path_y(), vec![0, 1]);
    }

    #[test]
    fn single_cell_matrix() {
        let m = matrix(&[&[3.0]]);
        assert_eq!(Traceback::Contiguous.walk(&m).len(), 1);
        assert_eq!(Traceback::Reference.walk(&m).len(), 2);
    }

    #[test]
    fn all_infinite_costs_still_terminate() {
        let inf = f64::INFINITY;
        let m = matrix(&[&[inf, inf, inf], &[inf, inf, inf]]);
        let p = backtrack(&m);
        assert_eq!(p.path_x(), vec![0, 0, 1]);
        assert_eq!(p.path_y(), vec![0, 1, 2]);
    }

    #[test]
    fn default_is_contiguous() {
        assert_eq!(Traceback::default(), Traceback::Contiguous);
    }
}
