//! Warping path types for DTW alignment.

/// A single step in a warping path, matching frame `x` of the first sequence
/// to frame `y` of the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WarpStep {
    /// Frame index in the first sequence.
    pub x: usize,
    /// Frame index in the second sequence.
    pub y: usize,
}

/// An ordered sequence of warping steps from `(0, 0)` to `(N1 - 1, N2 - 1)`.
///
/// Both index sequences are non-decreasing. Paths produced by
/// [`Traceback::Contiguous`](crate::Traceback::Contiguous) advance at least one
/// index by exactly one per step and never repeat a pair; paths produced by
/// [`Traceback::Reference`](crate::Traceback::Reference) may not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarpPath(Vec<WarpStep>);

impl WarpPath {
    /// Create a path from steps in forward order.
    pub(crate) fn new(steps: Vec<WarpStep>) -> Self {
        Self(steps)
    }

    /// Return the steps as a slice.
    #[must_use]
    pub fn steps(&self) -> &[WarpStep] {
        &self.0
    }

    /// Return the number of steps (the aligned length `L`).
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return true if the path contains no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Return the first-sequence indices, one per step.
    #[must_use]
    pub fn path_x(&self) -> Vec<usize> {
        self.0.iter().map(|s| s.x).collect()
    }

    /// Return the second-sequence indices, one per step.
    #[must_use]
    pub fn path_y(&self) -> Vec<usize> {
        self.0.iter().map(|s| s.y).collect()
    }

    /// Return true if every step advances at least one index by exactly one,
    /// neither index by more than one, and no index decreases.
    #[must_use]
    pub fn is_contiguous(&self) -> bool {
        self.0.windows(2).all(|w| {
            let (a, b) = (w[0], w[1]);
            if b.x < a.x || b.y < a.y {
                return false;
            }
            let (dx, dy) = (b.x - a.x, b.y - a.y);
            dx <= 1 && dy <= 1 && dx + dy >= 1
        })
    }
}

impl<'a> IntoIterator for &'a WarpPath {
    type Item = &'a WarpStep;
    type IntoIter = std::slice::Iter<'a, WarpStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
