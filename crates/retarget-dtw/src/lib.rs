//! Dynamic Time Warping alignment of multi-dimensional frame sequences.
//!
//! Pure math library, zero I/O. Aligns two independently captured sequences
//! (for example per-frame joint rotations from two motion-capture clips with
//! different frame counts) and re-indexes them onto one shared timeline.
//!
//! ```
//! use retarget_dtw::{Dtw, Sequence};
//!
//! let x = Sequence::new(vec![vec![0.0; 3], vec![1.0; 3], vec![2.0; 3]]).unwrap();
//! let y = Sequence::new(vec![vec![0.0; 3], vec![2.0; 3]]).unwrap();
//!
//! let alignment = Dtw::new().align(x.as_view(), y.as_view()).unwrap();
//! assert_eq!(alignment.total_cost(), 3.0);
//! assert_eq!(alignment.path().path_x(), vec![0, 1, 2]);
//! assert_eq!(alignment.path().path_y(), vec![0, 0, 1]);
//!
//! let (xa, ya) = alignment.resample(x.as_view(), y.as_view()).unwrap();
//! assert_eq!(xa.len(), ya.len());
//! ```

mod alignment;
mod cost;
mod distance;
mod dtw;
mod error;
mod metric;
mod path;
mod resample;
mod sequence;
mod traceback;

pub use alignment::Alignment;
pub use cost::{CostMatrix, CostMatrixBuilder, PARALLEL_MIN_CELLS};
pub use distance::NormalizedCost;
pub use dtw::Dtw;
pub use error::DtwError;
pub use metric::{Euclidean, FrameDistance, Manhattan};
pub use path::{WarpPath, WarpStep};
pub use resample::{resample, resample_pair};
pub use sequence::{Sequence, SequenceView};
pub use traceback::{Traceback, backtrack};
