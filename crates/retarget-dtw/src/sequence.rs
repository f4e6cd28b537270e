//! Frame sequence types with validation guarantees.

use std::ops::Index;

use crate::error::DtwError;

/// Owned, validated frame sequence.
///
/// Guaranteed non-empty, with every frame of the same dimension and every
/// component finite. Frames are stored row-major in a single buffer, so frame
/// `i` occupies `data[i * dim..(i + 1) * dim]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Sequence {
    dim: usize,
    data: Vec<f64>,
}

impl Sequence {
    /// Create a sequence from a list of frames.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::EmptySequence`] | `frames` is empty |
    /// | [`DtwError::ZeroDimension`] | The first frame has no components |
    /// | [`DtwError::RaggedFrame`] | A frame's length differs from the first frame's |
    /// | [`DtwError::NonFiniteValue`] | Any component is NaN or infinite |
    pub fn new(frames: Vec<Vec<f64>>) -> Result<Self, DtwError> {
        let dim = frames.first().map(Vec::len).ok_or(DtwError::EmptySequence)?;
        if dim == 0 {
            return Err(DtwError::ZeroDimension);
        }
        let mut data = Vec::with_capacity(frames.len() * dim);
        for (frame, values) in frames.into_iter().enumerate() {
            if values.len() != dim {
                return Err(DtwError::RaggedFrame {
                    frame,
                    expected: dim,
                    got: values.len(),
                });
            }
            data.extend(values);
        }
        Self::from_flat(dim, data)
    }

    /// Create a sequence from a flat row-major buffer of `dim`-component frames.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::ZeroDimension`] | `dim` is zero |
    /// | [`DtwError::EmptySequence`] | `data` is empty |
    /// | [`DtwError::RaggedFrame`] | `data.len()` is not a multiple of `dim` |
    /// | [`DtwError::NonFiniteValue`] | Any component is NaN or infinite |
    pub fn from_flat(dim: usize, data: Vec<f64>) -> Result<Self, DtwError> {
        validate(dim, &data)?;
        Ok(Self { dim, data })
    }

    /// Create a one-dimensional sequence, one scalar per frame.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Sequence::from_flat`] with `dim = 1`.
    pub fn from_scalars(values: Vec<f64>) -> Result<Self, DtwError> {
        Self::from_flat(1, values)
    }

    /// Build a sequence from frames already known to be valid.
    pub(crate) fn from_flat_unchecked(dim: usize, data: Vec<f64>) -> Self {
        debug_assert!(dim > 0 && !data.is_empty() && data.len() % dim == 0);
        Self { dim, data }
    }

    /// Borrow this sequence as a zero-copy view.
    #[must_use]
    pub fn as_view(&self) -> SequenceView<'_> {
        SequenceView {
            dim: self.dim,
            data: &self.data,
        }
    }

    /// Return the number of frames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len() / self.dim
    }

    /// Return true if the sequence has no frames.
    ///
    /// Always `false` for a constructed [`Sequence`]; provided to satisfy the
    /// `len_without_is_empty` convention.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Return the number of components per frame.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Return frame `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= len()`.
    #[must_use]
    pub fn frame(&self, i: usize) -> &[f64] {
        self.as_view().frame(i)
    }

    /// Iterate over frames in order.
    pub fn frames(&self) -> impl ExactSizeIterator<Item = &[f64]> + '_ {
        self.data.chunks_exact(self.dim)
    }

    /// Copy the frames out as one vector per frame.
    #[must_use]
    pub fn to_frames(&self) -> Vec<Vec<f64>> {
        self.frames().map(<[f64]>::to_vec).collect()
    }

    /// Consume and return the flat row-major buffer.
    #[must_use]
    pub fn into_flat(self) -> Vec<f64> {
        self.data
    }
}

impl TryFrom<Vec<Vec<f64>>> for Sequence {
    type Error = DtwError;

    fn try_from(frames: Vec<Vec<f64>>) -> Result<Self, Self::Error> {
        Self::new(frames)
    }
}

impl Index<usize> for Sequence {
    type Output = [f64];

    fn index(&self, index: usize) -> &Self::Output {
        self.frame(index)
    }
}

/// Borrowed, validated view into a frame sequence.
#[derive(Debug, Clone, Copy)]
pub struct SequenceView<'a> {
    dim: usize,
    data: &'a [f64],
}

impl<'a> SequenceView<'a> {
    /// Create a view over a flat row-major buffer, validating it the same way
    /// as [`Sequence::from_flat`].
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::ZeroDimension`] | `dim` is zero |
    /// | [`DtwError::EmptySequence`] | `data` is empty |
    /// | [`DtwError::RaggedFrame`] | `data.len()` is not a multiple of `dim` |
    /// | [`DtwError::NonFiniteValue`] | Any component is NaN or infinite |
    pub fn new(dim: usize, data: &'a [f64]) -> Result<Self, DtwError> {
        validate(dim, data)?;
        Ok(Self { dim, data })
    }

    /// Return the number of frames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len() / self.dim
    }

    /// Return true if the view has no frames. Always `false` for a validated view.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Return the number of components per frame.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Return frame `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= len()`.
    #[must_use]
    pub fn frame(&self, i: usize) -> &'a [f64] {
        let data: &'a [f64] = self.data;
        &data[i * self.dim..(i + 1) * self.dim]
    }

    /// Iterate over frames in order.
    pub fn frames(&self) -> impl ExactSizeIterator<Item = &'a [f64]> + 'a {
        let data: &'a [f64] = self.data;
        data.chunks_exact(self.dim)
    }

    /// Return the underlying flat buffer.
    #[must_use]
    pub fn as_flat(&self) -> &'a [f64] {
        self.data
    }

    /// Copy into an owned [`Sequence`].
    #[must_use]
    pub fn to_sequence(&self) -> Sequence {
        Sequence::from_flat_unchecked(self.dim, self.data.to_vec())
    }
}

impl<'a> From<&'a Sequence> for SequenceView<'a> {
    fn from(seq: &'a Sequence) -> Self {
        seq.as_view()
    }
}

fn validate(dim: usize, data: &[f64]) -> Result<(), DtwError> {
    if dim == 0 {
        return Err(DtwError::ZeroDimension);
    }
    if data.is_empty() {
        return Err(DtwError::EmptySequence);
    }
    if data.len() % dim != 0 {
        let frame = data.len() / dim;
        return Err(DtwError::RaggedFrame {
            frame,
            expected: dim,
            got: data.len() % dim,
        });
    }
    if let Some(pos) = data.iter().position(|v| !v.is_finite()) {
        return Err(DtwError::NonFiniteValue {
            frame: pos / dim,
            component: pos % dim,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_frames() {
        assert_eq!(Sequence::new(vec![]), Err(DtwError::EmptySequence));
    }

    #[test]
    fn rejects_zero_dimension() {
        assert_eq!(Sequence::new(vec![vec![]]), Err(DtwError::ZeroDimension));
        assert_eq!(Sequence::from_flat(0, vec![1.0]), Err(DtwError::ZeroDimension));
    }

    #[test]
    fn rejects_ragged_frame() {
        let result = Sequence::new(vec![vec![0.0, 0.0, 0.0], vec![1.0, 1.0]]);
        assert_eq!(
            result,
            Err(DtwError::RaggedFrame {
                frame: 1,
                expected: 3,
                got: 2
            })
        );
    }

    #[test]
    fn rejects_ragged_flat_buffer() {
        let result = Sequence::from_flat(3, vec![0.0, 1.0, 2.0, 3.0]);
        assert!(matches!(result, Err(DtwError::RaggedFrame { frame: 1, .. })));
    }

    #[test]
    fn rejects_nan_with_position() {
        let result = Sequence::new(vec![vec![0.0, 0.0], vec![1.0, f64::NAN]]);
        assert_eq!(
            result,
            Err(DtwError::NonFiniteValue {
                frame: 1,
                component: 1
            })
        );
    }

    #[test]
    fn rejects_infinity() {
        let result = Sequence::from_scalars(vec![1.0, f64::NEG_INFINITY]);
        assert!(matches!(result, Err(DtwError::NonFiniteValue { frame: 1, component: 0 })));
    }

    #[test]
    fn accepts_rotation_triples() {
        let seq = Sequence::new(vec![vec![0.0, 0.1, 0.2], vec![1.0, 1.1, 1.2]]).unwrap();
        assert_eq!(seq.len(), 2);
        assert_eq!(seq.dim(), 3);
        assert_eq!(seq.frame(1), &[1.0, 1.1, 1.2]);
        assert_eq!(&seq[0], &[0.0, 0.1, 0.2]);
    }

    #[test]
    fn scalars_are_one_dimensional() {
        let seq = Sequence::from_scalars(vec![3.0, 4.0, 5.0]).unwrap();
        assert_eq!(seq.dim(), 1);
        assert_eq!(seq.len(), 3);
        assert_eq!(seq.frame(2), &[5.0]);
    }

    #[test]
    fn frames_iterate_in_order() {
        let seq = Sequence::from_flat(2, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        let frames: Vec<&[f64]> = seq.frames().collect();
        assert_eq!(frames, vec![&[0.0, 1.0][..], &[2.0, 3.0], &[4.0, 5.0]]);
        assert_eq!(seq.to_frames()[2], vec![4.0, 5.0]);
    }

    #[test]
    fn view_validates_and_copies() {
        let data = [1.0, 2.0, 3.0, 4.0];
        let view = SequenceView::new(2, &data).unwrap();
        assert_eq!(view.len(), 2);
        assert_eq!(view.frame(1), &[3.0, 4.0]);
        assert_eq!(view.to_sequence().into_flat(), data.to_vec());

        assert!(matches!(SequenceView::new(2, &[]), Err(DtwError::EmptySequence)));
    }

    #[test]
    fn try_from_frames() {
        let seq: Result<Sequence, _> = vec![vec![1.0], vec![2.0]].try_into();
        assert!(seq.is_ok());
    }
}
