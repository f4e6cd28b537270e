//! Length-normalized alignment cost newtype.

use std::cmp::Ordering;
use std::fmt;

/// A length-normalized DTW alignment cost.
///
/// Equal to the final accumulated cost divided by `N1 + N2`, so scores from
/// sequence pairs of different lengths are comparable.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct NormalizedCost(f64);

impl NormalizedCost {
    /// Normalize a total accumulated cost by the combined sequence length.
    pub(crate) fn from_total(total: f64, n1: usize, n2: usize) -> Self {
        Self(total / (n1 + n2) as f64)
    }

    /// Return the raw normalized value.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Total ordering comparison using [`f64::total_cmp`].
    #[must_use]
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for NormalizedCost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_by_combined_length() {
        let c = NormalizedCost::from_total(3.0, 3, 2);
        assert!((c.value() - 0.6).abs() < 1e-12);
    }

    #[test]
    fn display_format() {
        let c = NormalizedCost::from_total(7.0, 1, 5);
        assert_eq!(format!("{c}"), "1.166667");
    }

    #[test]
    fn total_cmp_ordering() {
        let a = NormalizedCost::from_total(1.0, 1, 1);
        let b = NormalizedCost::from_total(2.0, 1, 1);
        assert_eq!(a.total_cmp(&b), Ordering::Less);
        assert_eq!(b.total_cmp(&a), Ordering::Greater);
        assert_eq!(a.total_cmp(&a), Ordering::Equal);
    }
}
