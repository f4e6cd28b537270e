//! Accuracy regression tests for retarget-dtw.
//!
//! Literal expectations were worked out by hand from the recurrence and are
//! hardcoded to catch regressions in the cost matrix, the traceback tie-break,
//! and the boundary behavior of both traceback modes.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use retarget_dtw::{
    CostMatrixBuilder, Dtw, DtwError, FrameDistance, Manhattan, Sequence, Traceback, resample,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn triples(values: &[f64]) -> Sequence {
    Sequence::new(values.iter().map(|&v| vec![v, v, v]).collect()).expect("valid test sequence")
}

fn scalars(values: &[f64]) -> Sequence {
    Sequence::from_scalars(values.to_vec()).expect("valid test sequence")
}

fn random_rotations(rng: &mut ChaCha8Rng, len: usize) -> Sequence {
    let frames: Vec<Vec<f64>> = (0..len)
        .map(|_| (0..3).map(|_| rng.gen_range(-3.0..3.0)).collect())
        .collect();
    Sequence::new(frames).expect("valid random sequence")
}

fn assert_monotone_endpoints(path_x: &[usize], path_y: &[usize], n1: usize, n2: usize) {
    assert_eq!(path_x.len(), path_y.len());
    assert_eq!((path_x[0], path_y[0]), (0, 0));
    assert_eq!((*path_x.last().unwrap(), *path_y.last().unwrap()), (n1 - 1, n2 - 1));
    assert!(path_x.windows(2).all(|w| w[0] <= w[1]), "path_x decreases: {path_x:?}");
    assert!(path_y.windows(2).all(|w| w[0] <= w[1]), "path_y decreases: {path_y:?}");
}

// ---------------------------------------------------------------------------
// a) rotation triple scenario
// ---------------------------------------------------------------------------

#[test]
fn rotation_triples_scenario() {
    let x = triples(&[0.0, 1.0, 2.0]);
    let y = triples(&[0.0, 2.0]);

    let pointwise = CostMatrixBuilder::default()
        .pointwise(x.as_view(), y.as_view())
        .unwrap();
    assert_eq!(
        pointwise.to_rows(),
        vec![vec![0.0, 6.0], vec![3.0, 3.0], vec![6.0, 0.0]]
    );

    for mode in [Traceback::Contiguous, Traceback::Reference] {
        let alignment = Dtw::new()
            .with_traceback(mode)
            .align(x.as_view(), y.as_view())
            .unwrap();
        assert_eq!(
            alignment.matrix().to_rows(),
            vec![vec![0.0, 6.0], vec![3.0, 3.0], vec![9.0, 3.0]]
        );
        assert_eq!(alignment.total_cost(), 3.0);
        assert!((alignment.cost().value() - 0.6).abs() < 1e-12);
        assert_eq!(alignment.path().path_x(), vec![0, 1, 2], "{mode:?}");
        assert_eq!(alignment.path().path_y(), vec![0, 0, 1], "{mode:?}");
    }
}

// ---------------------------------------------------------------------------
// b) identical sequences
// ---------------------------------------------------------------------------

#[test]
fn identical_sequences_align_on_diagonal() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    for len in [1usize, 2, 5, 17] {
        let x = random_rotations(&mut rng, len);
        let alignment = Dtw::new().align(x.as_view(), x.as_view()).unwrap();
        let diagonal: Vec<usize> = (0..len).collect();
        assert_eq!(alignment.cost().value(), 0.0);
        assert_eq!(alignment.path().path_x(), diagonal);
        assert_eq!(alignment.path().path_y(), diagonal);
    }
}

/// The reference traceback prepends `(0, 0)` unconditionally, so a walk that
/// already reached the origin repeats it.
#[test]
fn reference_traceback_repeats_origin_on_identical_sequences() {
    let x = scalars(&[0.0, 1.0, 2.0]);
    let alignment = Dtw::new()
        .with_traceback(Traceback::Reference)
        .align(x.as_view(), x.as_view())
        .unwrap();
    assert_eq!(alignment.path().path_x(), vec![0, 0, 1, 2]);
    assert_eq!(alignment.path().path_y(), vec![0, 0, 1, 2]);
}

// ---------------------------------------------------------------------------
// c) degenerate single-frame sequences
// ---------------------------------------------------------------------------

#[test]
fn single_frame_against_five() {
    let x = scalars(&[1.0]);
    let y = scalars(&[0.0, 1.0, 2.0, 3.0, 4.0]);

    let alignment = Dtw::new().align(x.as_view(), y.as_view()).unwrap();
    assert_eq!(alignment.path().path_x(), vec![0; 5]);
    assert_eq!(alignment.path().path_y(), vec![0, 1, 2, 3, 4]);
    assert_eq!(alignment.total_cost(), 7.0);

    let (xa, ya) = alignment.resample(x.as_view(), y.as_view()).unwrap();
    assert_eq!(xa.into_flat(), vec![1.0; 5]);
    assert_eq!(ya.into_flat(), vec![0.0, 1.0, 2.0, 3.0, 4.0]);
}

#[test]
fn single_frame_reference_traceback_has_gap() {
    let x = scalars(&[1.0]);
    let y = scalars(&[0.0, 1.0, 2.0, 3.0, 4.0]);
    let alignment = Dtw::new()
        .with_traceback(Traceback::Reference)
        .align(x.as_view(), y.as_view())
        .unwrap();
    assert_eq!(alignment.path().path_x(), vec![0, 0]);
    assert_eq!(alignment.path().path_y(), vec![0, 4]);
}

#[test]
fn five_frames_against_single() {
    let x = scalars(&[0.0, 1.0, 2.0, 3.0, 4.0]);
    let y = scalars(&[1.0]);
    let alignment = Dtw::new().align(x.as_view(), y.as_view()).unwrap();
    assert_eq!(alignment.path().path_x(), vec![0, 1, 2, 3, 4]);
    assert_eq!(alignment.path().path_y(), vec![0; 5]);
}

// ---------------------------------------------------------------------------
// d) zero metric: every path is optimal
// ---------------------------------------------------------------------------

#[test]
fn zero_metric_prefers_diagonal() {
    let zero = |_: &[f64], _: &[f64]| 0.0;
    let x = scalars(&[5.0, 1.0, 9.0]);
    let y = scalars(&[2.0, 8.0, 3.0, 7.0, 4.0]);

    let contiguous = Dtw::new()
        .with_metric(zero)
        .align(x.as_view(), y.as_view())
        .unwrap();
    assert_eq!(contiguous.total_cost(), 0.0);
    assert_eq!(contiguous.path().path_x(), vec![0, 0, 0, 1, 2]);
    assert_eq!(contiguous.path().path_y(), vec![0, 1, 2, 3, 4]);

    let reference = Dtw::new()
        .with_metric(zero)
        .with_traceback(Traceback::Reference)
        .align(x.as_view(), y.as_view())
        .unwrap();
    assert_eq!(reference.path().path_x(), vec![0, 0, 1, 2]);
    assert_eq!(reference.path().path_y(), vec![0, 2, 3, 4]);
}

// ---------------------------------------------------------------------------
// e) structural invariants over random inputs
// ---------------------------------------------------------------------------

#[test]
fn random_paths_are_structurally_valid() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let dtw = Dtw::new();
    for _ in 0..40 {
        let n1 = rng.gen_range(1..30);
        let n2 = rng.gen_range(1..30);
        let x = random_rotations(&mut rng, n1);
        let y = random_rotations(&mut rng, n2);

        let alignment = dtw.align(x.as_view(), y.as_view()).unwrap();
        let path = alignment.path();
        assert_monotone_endpoints(&path.path_x(), &path.path_y(), n1, n2);
        assert!(path.is_contiguous());
        assert!(path.len() >= n1.max(n2));
        assert!(path.len() <= n1 + n2 - 1);

        let (xa, ya) = alignment.resample(x.as_view(), y.as_view()).unwrap();
        assert_eq!(xa.len(), ya.len());
        assert_eq!(xa.len(), path.len());
    }
}

#[test]
fn reference_paths_keep_endpoints_and_order() {
    let mut rng = ChaCha8Rng::seed_from_u64(1234);
    let dtw = Dtw::new().with_traceback(Traceback::Reference);
    for _ in 0..40 {
        let n1 = rng.gen_range(1..20);
        let n2 = rng.gen_range(1..20);
        let x = random_rotations(&mut rng, n1);
        let y = random_rotations(&mut rng, n2);
        let path = dtw.align(x.as_view(), y.as_view()).unwrap().path().clone();
        assert_monotone_endpoints(&path.path_x(), &path.path_y(), n1, n2);
    }
}

#[test]
fn path_cost_equals_final_cell() {
    // Summing the pointwise cost along the contiguous path reproduces the
    // accumulated total.
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    let x = random_rotations(&mut rng, 23);
    let y = random_rotations(&mut rng, 31);

    let alignment = Dtw::new().align(x.as_view(), y.as_view()).unwrap();
    let along_path: f64 = alignment
        .path()
        .steps()
        .iter()
        .map(|s| Manhattan.distance(x.frame(s.x), y.frame(s.y)))
        .sum();
    assert!((along_path - alignment.total_cost()).abs() < 1e-9);
}

// ---------------------------------------------------------------------------
// f) duplicating the last frame
// ---------------------------------------------------------------------------

/// Appending a copy of x's last frame never lowers the optimal cost and raises
/// it by at most the cost of matching that frame against y's last frame.
#[test]
fn duplicated_last_frame_bounds() {
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    let dtw = Dtw::new();
    for _ in 0..25 {
        let n1 = rng.gen_range(1..15);
        let n2 = rng.gen_range(1..15);
        let x = random_rotations(&mut rng, n1);
        let y = random_rotations(&mut rng, n2);

        let mut frames = x.to_frames();
        frames.push(frames[n1 - 1].clone());
        let x_dup = Sequence::new(frames).unwrap();

        let base = dtw.align(x.as_view(), y.as_view()).unwrap().total_cost();
        let grown = dtw.align(x_dup.as_view(), y.as_view()).unwrap().total_cost();
        let tail = Manhattan.distance(x.frame(n1 - 1), y.frame(n2 - 1));

        assert!(grown >= base - 1e-9, "cost decreased: {base} -> {grown}");
        assert!(grown <= base + tail + 1e-9, "cost grew by more than {tail}");
    }
}

#[test]
fn duplicated_matching_frame_is_free() {
    let x = scalars(&[0.0, 1.0, 2.0]);
    let x_dup = scalars(&[0.0, 1.0, 2.0, 2.0]);
    let y = scalars(&[0.0, 2.0]);
    let dtw = Dtw::new();
    let base = dtw.align(x.as_view(), y.as_view()).unwrap().total_cost();
    let grown = dtw.align(x_dup.as_view(), y.as_view()).unwrap().total_cost();
    assert_eq!(base, grown);
}

// ---------------------------------------------------------------------------
// g) rolling distance matches the full matrix
// ---------------------------------------------------------------------------

#[test]
fn rolling_distance_matches_full_matrix() {
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let dtw = Dtw::new();
    for _ in 0..20 {
        let n1 = rng.gen_range(1..40);
        let n2 = rng.gen_range(1..40);
        let x = random_rotations(&mut rng, n1);
        let y = random_rotations(&mut rng, n2);
        let full = dtw.align(x.as_view(), y.as_view()).unwrap().cost();
        let rolling = dtw.distance(x.as_view(), y.as_view()).unwrap();
        assert_eq!(full.value().to_bits(), rolling.value().to_bits());
    }
}

// ---------------------------------------------------------------------------
// h) input validation
// ---------------------------------------------------------------------------

#[test]
fn invalid_inputs_fail_fast() {
    assert_eq!(Sequence::new(vec![]), Err(DtwError::EmptySequence));
    assert!(matches!(
        Sequence::new(vec![vec![0.0, f64::NAN, 0.0]]),
        Err(DtwError::NonFiniteValue { frame: 0, component: 1 })
    ));

    let x = triples(&[0.0, 1.0]);
    let y = scalars(&[0.0, 1.0]);
    assert!(matches!(
        Dtw::new().align(x.as_view(), y.as_view()),
        Err(DtwError::DimensionMismatch { x_dim: 3, y_dim: 1 })
    ));

    assert!(matches!(
        resample(y.as_view(), &[0, 5]),
        Err(DtwError::IndexOutOfRange { index: 5, .. })
    ));
}
