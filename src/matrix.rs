//! Host-resident dense matrices
//!
//! Row-major `f32` storage. This is both the CPU backend's native
//! representation and the host-transfer target for GPU results, so the
//! reference matmul/add here double as the correctness oracle in tests.

use rand::Rng;

use crate::error::{BenchError, BenchResult};

/// Dense row-major matrix of 32-bit floats
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

impl Matrix {
    /// Create a zero-filled matrix
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Create a matrix with every entry set to `value`
    pub fn filled(rows: usize, cols: usize, value: f32) -> Self {
        Self {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }

    /// Wrap an existing row-major buffer, checking the shape
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f32>) -> BenchResult<Self> {
        if data.len() != rows * cols {
            return Err(BenchError::ShapeMismatch {
                left_rows: rows,
                left_cols: cols,
                right_rows: data.len(),
                right_cols: 1,
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Generate a square matrix with entries drawn uniformly from [0, 1)
    pub fn random<R: Rng>(size: usize, rng: &mut R) -> Self {
        let data = (0..size * size).map(|_| rng.gen::<f32>()).collect();
        Self {
            rows: size,
            cols: size,
            data,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.data[row * self.cols + col]
    }

    /// Row-major view of the underlying storage
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    fn check_matmul_shapes(&self, rhs: &Matrix) -> BenchResult<()> {
        if self.cols != rhs.rows {
            return Err(BenchError::ShapeMismatch {
                left_rows: self.rows,
                left_cols: self.cols,
                right_rows: rhs.rows,
                right_cols: rhs.cols,
            });
        }
        Ok(())
    }

    fn check_same_shape(&self, rhs: &Matrix) -> BenchResult<()> {
        if self.rows != rhs.rows || self.cols != rhs.cols {
            return Err(BenchError::ShapeMismatch {
                left_rows: self.rows,
                left_cols: self.cols,
                right_rows: rhs.rows,
                right_cols: rhs.cols,
            });
        }
        Ok(())
    }

    /// Reference matrix multiply (single-threaded, ikj order)
    pub fn matmul(&self, rhs: &Matrix) -> BenchResult<Matrix> {
        self.check_matmul_shapes(rhs)?;
        let mut out = Matrix::zeros(self.rows, rhs.cols);
        let n = rhs.cols;
        for i in 0..self.rows {
            let out_row = &mut out.data[i * n..(i + 1) * n];
            for (k, &lhs_ik) in self.data[i * self.cols..(i + 1) * self.cols].iter().enumerate() {
                let rhs_row = &rhs.data[k * n..(k + 1) * n];
                for (o, &r) in out_row.iter_mut().zip(rhs_row) {
                    *o += lhs_ik * r;
                }
            }
        }
        Ok(out)
    }

    /// Reference elementwise add
    pub fn add(&self, rhs: &Matrix) -> BenchResult<Matrix> {
        self.check_same_shape(rhs)?;
        let data = self
            .data
            .iter()
            .zip(&rhs.data)
            .map(|(a, b)| a + b)
            .collect();
        Ok(Matrix {
            rows: self.rows,
            cols: self.cols,
            data,
        })
    }

    /// Largest relative difference against `other`, for float comparisons
    pub fn max_relative_error(&self, other: &Matrix) -> f32 {
        self.data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| (a - b).abs() / a.abs().max(1.0))
            .fold(0.0, f32::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn random_entries_in_unit_interval() {
        let mut rng = StdRng::seed_from_u64(7);
        let m = Matrix::random(32, &mut rng);
        assert_eq!(m.rows(), 32);
        assert_eq!(m.cols(), 32);
        assert!(m.as_slice().iter().all(|&v| (0.0..1.0).contains(&v)));
    }

    #[test]
    fn random_matrices_are_independent() {
        let mut rng = StdRng::seed_from_u64(7);
        let a = Matrix::random(8, &mut rng);
        let b = Matrix::random(8, &mut rng);
        assert_ne!(a, b);
    }

    #[test]
    fn matmul_known_values() {
        let a = Matrix::from_vec(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let b = Matrix::from_vec(2, 2, vec![5.0, 6.0, 7.0, 8.0]).unwrap();
        let c = a.matmul(&b).unwrap();
        assert_eq!(c.as_slice(), &[19.0, 22.0, 43.0, 50.0]);
    }

    #[test]
    fn add_known_values() {
        let a = Matrix::from_vec(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let b = Matrix::filled(2, 2, 0.5);
        let c = a.add(&b).unwrap();
        assert_eq!(c.as_slice(), &[1.5, 2.5, 3.5, 4.5]);
    }

    #[test]
    fn matmul_shape_mismatch_is_an_error() {
        let a = Matrix::zeros(2, 3);
        let b = Matrix::zeros(2, 2);
        assert!(matches!(
            a.matmul(&b),
            Err(BenchError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn from_vec_rejects_wrong_length() {
        assert!(Matrix::from_vec(2, 2, vec![1.0; 3]).is_err());
    }
}
