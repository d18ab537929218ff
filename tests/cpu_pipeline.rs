/// CPU-backend pipeline tests
///
/// Exercises the generator, the timed executor, the driver, and the speedup
/// derivation without needing a GPU: the driver is generic over its two
/// backends, so the CPU backend stands in on both slots.
use matbench::{run_benchmark, timed_operation, ComputeBackend, CpuBackend, Matrix};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Tolerance for floating point comparisons
const FLOAT_TOLERANCE: f32 = 1e-4;

/// Reference `(A·B)·C + A`, single-threaded
fn reference_chain(a: &Matrix, b: &Matrix, c: &Matrix) -> Matrix {
    a.matmul(b)
        .and_then(|ab| ab.matmul(c))
        .and_then(|abc| abc.add(a))
        .expect("reference chain")
}

#[test]
fn generator_produces_three_square_matrices_in_unit_interval() {
    let backend = CpuBackend::new();
    let mut rng = StdRng::seed_from_u64(3);
    let (a, b, c) = backend.random_matrices(16, &mut rng).unwrap();
    for m in [&a, &b, &c] {
        assert_eq!(m.rows(), 16);
        assert_eq!(m.cols(), 16);
        assert!(m.as_slice().iter().all(|&v| (0.0..1.0).contains(&v)));
    }
    assert_ne!(a, b);
    assert_ne!(b, c);
}

#[test]
fn executor_matches_reference_chain() {
    let backend = CpuBackend::new();
    let mut rng = StdRng::seed_from_u64(9);
    let a = Matrix::random(9, &mut rng);
    let b = Matrix::random(9, &mut rng);
    let c = Matrix::random(9, &mut rng);

    let (result, elapsed) = timed_operation(&backend, &a, &b, &c).unwrap();
    let expected = reference_chain(&a, &b, &c);

    assert!(elapsed >= 0.0);
    assert!(expected.max_relative_error(&result) < FLOAT_TOLERANCE);
}

#[test]
fn all_ones_two_by_two_yields_fives() {
    let backend = CpuBackend::new();
    let ones = Matrix::filled(2, 2, 1.0);
    let (result, _) = timed_operation(&backend, &ones, &ones, &ones).unwrap();
    assert_eq!(result.as_slice(), &[5.0, 5.0, 5.0, 5.0]);
}

#[test]
fn driver_returns_index_aligned_series() {
    let backend = CpuBackend::new();
    let sizes = [2, 3, 4];
    let report = run_benchmark(&sizes, &backend, &backend, 42).unwrap();
    assert_eq!(report.sizes, sizes);
    assert_eq!(report.cpu_times.len(), sizes.len());
    assert_eq!(report.gpu_times.len(), sizes.len());
    assert!(report.cpu_times.iter().all(|&t| t >= 0.0));
    assert!(report.gpu_times.iter().all(|&t| t >= 0.0));
}

#[test]
fn empty_size_list_yields_empty_report() {
    let backend = CpuBackend::new();
    let report = run_benchmark(&[], &backend, &backend, 42).unwrap();
    assert!(report.is_empty());
    assert!(report.cpu_times.is_empty());
    assert!(report.gpu_times.is_empty());
    assert!(report.speedups().unwrap().is_empty());
}

#[test]
fn single_size_yields_one_positive_sample_per_backend() {
    let backend = CpuBackend::new();
    let report = run_benchmark(&[128], &backend, &backend, 42).unwrap();
    assert_eq!(report.len(), 1);
    assert!(report.cpu_times[0] > 0.0);
    assert!(report.gpu_times[0] > 0.0);

    let speedups = report.speedups().unwrap();
    assert_eq!(speedups.len(), 1);
    assert!((speedups[0] - report.cpu_times[0] / report.gpu_times[0]).abs() < f64::EPSILON);
}
