//! Re-indexing sequences along a warping path.
//!
//! Resampling is nearest-neighbour selection, not interpolation. A repeated
//! index repeats a frame, which is how one sequence waits for the other.

use crate::error::DtwError;
use crate::path::WarpPath;
use crate::sequence::{Sequence, SequenceView};

/// Build a new sequence with `out[k] = seq[indices[k]]`.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`DtwError::EmptySequence`] | `indices` is empty |
/// | [`DtwError::IndexOutOfRange`] | An index is `>= seq.len()` |
pub fn resample(seq: SequenceView<'_>, indices: &[usize]) -> Result<Sequence, DtwError> {
    if indices.is_empty() {
        return Err(DtwError::EmptySequence);
    }
    let len = seq.len();
    let mut data = Vec::with_capacity(indices.len() * seq.dim());
    for (position, &index) in indices.iter().enumerate() {
        if index >= len {
            return Err(DtwError::IndexOutOfRange {
                position,
                index,
                len,
            });
        }
        data.extend_from_slice(seq.frame(index));
    }
    Ok(Sequence::from_flat_unchecked(seq.dim(), data))
}

/// Resample `x` by the path's first indices and `y` by its second.
///
/// Both outputs have `path.len()` frames and are frame-aligned.
///
/// # Errors
///
/// Same conditions as [`resample`], for either sequence.
pub fn resample_pair(
    x: SequenceView<'_>,
    y: SequenceView<'_>,
    path: &WarpPath,
) -> Result<(Sequence, Sequence), DtwError> {
    let x_out = resample(x, &path.path_x())?;
    let y_out = resample(y, &path.path_y())?;
    Ok((x_out, y_out))
}
