//! Host compute backend
//!
//! Matrices stay in host memory; matmul runs ikj-order with rows distributed
//! across the rayon pool.

use rayon::prelude::*;

use crate::backend::ComputeBackend;
use crate::error::{BenchError, BenchResult};
use crate::matrix::Matrix;

/// CPU-resident backend
#[derive(Debug, Default)]
pub struct CpuBackend;

impl CpuBackend {
    pub fn new() -> Self {
        Self
    }
}

impl ComputeBackend for CpuBackend {
    type Matrix = Matrix;

    fn name(&self) -> &'static str {
        "CPU"
    }

    fn upload(&self, matrix: &Matrix) -> BenchResult<Matrix> {
        Ok(matrix.clone())
    }

    fn matmul(&self, lhs: &Matrix, rhs: &Matrix) -> BenchResult<Matrix> {
        if lhs.cols() != rhs.rows() {
            return Err(BenchError::ShapeMismatch {
                left_rows: lhs.rows(),
                left_cols: lhs.cols(),
                right_rows: rhs.rows(),
                right_cols: rhs.cols(),
            });
        }
        let (inner, n) = (lhs.cols(), rhs.cols());
        let mut out = Matrix::zeros(lhs.rows(), n);
        let lhs_data = lhs.as_slice();
        let rhs_data = rhs.as_slice();
        out.as_mut_slice()
            .par_chunks_mut(n)
            .enumerate()
            .for_each(|(i, out_row)| {
                for (k, &lhs_ik) in lhs_data[i * inner..(i + 1) * inner].iter().enumerate() {
                    let rhs_row = &rhs_data[k * n..(k + 1) * n];
                    for (o, &r) in out_row.iter_mut().zip(rhs_row) {
                        *o += lhs_ik * r;
                    }
                }
            });
        Ok(out)
    }

    fn add(&self, lhs: &Matrix, rhs: &Matrix) -> BenchResult<Matrix> {
        lhs.add(rhs)
    }

    fn into_host(&self, matrix: Matrix) -> BenchResult<Matrix> {
        Ok(matrix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn parallel_matmul_matches_reference() {
        let mut rng = StdRng::seed_from_u64(11);
        let a = Matrix::random(33, &mut rng);
        let b = Matrix::random(33, &mut rng);
        let backend = CpuBackend::new();
        let parallel = backend.matmul(&a, &b).unwrap();
        let reference = a.matmul(&b).unwrap();
        assert!(parallel.max_relative_error(&reference) < 1e-5);
    }

    #[test]
    fn matmul_rejects_mismatched_shapes() {
        let backend = CpuBackend::new();
        let a = Matrix::zeros(4, 4);
        let b = Matrix::zeros(3, 3);
        assert!(backend.matmul(&a, &b).is_err());
    }
}
