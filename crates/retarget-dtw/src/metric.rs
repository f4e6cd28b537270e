//! Frame-to-frame distance functions used as the DTW local cost.

/// A pure, deterministic distance between two frames of equal dimension.
///
/// Implementations must return a non-negative value and satisfy
/// `distance(a, a) == 0`. The metric is not required to be a true metric
/// (the triangle inequality is never relied on). The cost-matrix builder
/// rejects NaN and negative outputs.
///
/// Any `Fn(&[f64], &[f64]) -> f64 + Sync` closure is a `FrameDistance`:
///
/// ```
/// use retarget_dtw::{Dtw, Sequence};
///
/// let squared = |a: &[f64], b: &[f64]| -> f64 {
///     a.iter().zip(b).map(|(p, q)| (p - q).powi(2)).sum()
/// };
/// let x = Sequence::from_scalars(vec![0.0, 1.0, 2.0]).unwrap();
/// let y = Sequence::from_scalars(vec![0.0, 2.0]).unwrap();
/// let alignment = Dtw::new().with_metric(squared).align(x.as_view(), y.as_view()).unwrap();
/// assert_eq!(alignment.path().path_x(), vec![0, 1, 2]);
/// ```
pub trait FrameDistance: Sync {
    /// Return the distance between frames `a` and `b`.
    fn distance(&self, a: &[f64], b: &[f64]) -> f64;
}

/// L1 (taxicab) norm of the component-wise difference. The default metric.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Manhattan;

impl FrameDistance for Manhattan {
    #[inline]
    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        a.iter().zip(b).map(|(p, q)| (p - q).abs()).sum()
    }
}

/// L2 (Euclidean) norm of the component-wise difference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Euclidean;

impl FrameDistance for Euclidean {
    #[inline]
    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        a.iter()
            .zip(b)
            .map(|(p, q)| (p - q).powi(2))
            .sum::<f64>()
            .sqrt()
    }
}

impl<F> FrameDistance for F
where
    F: Fn(&[f64], &[f64]) -> f64 + Sync,
{
    #[inline]
    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        self(a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manhattan_sums_absolute_differences() {
        assert_eq!(Manhattan.distance(&[0.0, 0.0, 0.0], &[1.0, -2.0, 3.0]), 6.0);
    }

    #[test]
    fn euclidean_is_l2() {
        assert!((Euclidean.distance(&[0.0, 0.0], &[3.0, 4.0]) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn identical_frames_are_zero() {
        let a = [0.3, -1.2, 2.5];
        assert_eq!(Manhattan.distance(&a, &a), 0.0);
        assert_eq!(Euclidean.distance(&a, &a), 0.0);
    }

    #[test]
    fn closure_is_a_metric() {
        let first_component = |a: &[f64], b: &[f64]| (a[0] - b[0]).abs();
        assert_eq!(first_component.distance(&[1.0, 9.0], &[4.0, -9.0]), 3.0);
    }
}
