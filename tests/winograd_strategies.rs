//! Hypothesis-style checks that every Winograd strategy computes the same
//! product as a naive triple loop.

use parallels::prelude::*;

const TOL: f64 = 1e-9;

fn strategies() -> Vec<WinogradStrategy> {
    let mut all = vec![WinogradStrategy::Sequential, WinogradStrategy::Pipeline];
    all.extend([1, 2, 3, 8].map(|workers| WinogradStrategy::DataParallel { workers }));
    all
}

fn matrix(rows: Vec<Vec<f64>>) -> Matrix {
    Matrix::from_rows(rows).unwrap()
}

// H0: some strategy disagrees with the naive product on rectangular input
// Falsification: random shapes, even and odd inner dimensions
#[test]
fn h0_1_strategies_match_naive_product() {
    let mut rng = SimRng::new(2024);
    for (m, n, p) in [(1, 2, 1), (4, 4, 4), (5, 7, 3), (9, 6, 11), (16, 13, 2)] {
        let a = Matrix::random(m, n, -5.0, 5.0, &mut rng);
        let b = Matrix::random(n, p, -5.0, 5.0, &mut rng);
        let expected = a.multiply(&b).unwrap();

        for strategy in strategies() {
            let got = WinogradEngine::new(strategy).product(&a, &b).unwrap();
            assert!(
                got.approx_eq(&expected, TOL * 100.0),
                "{} on {m}x{n} * {n}x{p}: max diff {:?}",
                strategy.name(),
                got.max_abs_diff(&expected)
            );
        }
    }
}

// H0: the scaled-identity scenario is not reproduced by every strategy
#[test]
fn h0_2_identity_scaled_scenario() {
    let a = matrix(vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
    let b = matrix(vec![vec![2.0, 0.0], vec![0.0, 2.0]]);
    let expected = matrix(vec![vec![2.0, 0.0], vec![0.0, 2.0]]);

    for strategy in strategies() {
        let got = WinogradEngine::new(strategy).product(&a, &b).unwrap();
        assert!(got.approx_eq(&expected, TOL), "{}", strategy.name());
    }
}

// H0: the odd-inner-dimension correction is skipped or applied twice
// Falsification: 3x3 * 3x2 with integer entries, exact expected values
#[test]
fn h0_3_odd_inner_dimension_corrected_once() {
    let a = matrix(vec![
        vec![1.0, 2.0, 3.0],
        vec![4.0, 5.0, 6.0],
        vec![7.0, 8.0, 9.0],
    ]);
    let b = matrix(vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]);
    let expected = matrix(vec![
        vec![22.0, 28.0],
        vec![49.0, 64.0],
        vec![76.0, 100.0],
    ]);

    let sequential = WinogradEngine::new(WinogradStrategy::Sequential)
        .product(&a, &b)
        .unwrap();
    let pipeline = WinogradEngine::new(WinogradStrategy::Pipeline)
        .product(&a, &b)
        .unwrap();

    assert!(sequential.approx_eq(&expected, TOL));
    assert!(pipeline.approx_eq(&sequential, TOL));
}

// H0: inner dimension 1 is not the plain outer product
#[test]
fn h0_4_inner_dimension_one_is_outer_product() {
    let a = matrix(vec![vec![2.0], vec![-3.0]]);
    let b = matrix(vec![vec![4.0, 5.0, 6.0]]);
    let expected = matrix(vec![vec![8.0, 10.0, 12.0], vec![-12.0, -15.0, -18.0]]);

    for strategy in strategies() {
        let got = WinogradEngine::new(strategy).product(&a, &b).unwrap();
        assert!(got.approx_eq(&expected, TOL), "{}", strategy.name());
    }
}

// H0: invalid input reaches a worker instead of failing up front
#[test]
fn h0_5_invalid_input_rejected_before_work() {
    let a = Matrix::zeros(2, 3);
    let b = Matrix::zeros(2, 3);

    for strategy in strategies() {
        let err = parallels::winograd::multiply(Some(&a), Some(&b), strategy).unwrap_err();
        assert!(matches!(err, ParError::DimensionMismatch { .. }));

        let err = parallels::winograd::multiply(None, Some(&b), strategy).unwrap_err();
        assert!(matches!(err, ParError::NullInput { .. }));
    }

    let err = parallels::winograd::multiply(
        Some(&a),
        Some(&Matrix::zeros(3, 2)),
        WinogradStrategy::DataParallel { workers: 0 },
    )
    .unwrap_err();
    assert!(matches!(err, ParError::InvalidParameter { .. }));
}

// H0: results vary between repeated concurrent runs
#[test]
fn h0_6_concurrent_strategies_repeatable() {
    let mut rng = SimRng::new(77);
    let a = Matrix::random(12, 9, -1.0, 1.0, &mut rng);
    let b = Matrix::random(9, 10, -1.0, 1.0, &mut rng);

    for strategy in [
        WinogradStrategy::Pipeline,
        WinogradStrategy::DataParallel { workers: 4 },
    ] {
        let engine = WinogradEngine::new(strategy);
        let first = engine.product(&a, &b).unwrap();
        for _ in 0..10 {
            assert_eq!(engine.product(&a, &b).unwrap(), first, "{}", strategy.name());
        }
    }
}
