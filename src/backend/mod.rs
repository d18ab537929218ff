//! Compute backends
//!
//! Backend selection is explicit: each implementation owns its matrix handle
//! type and exposes the same primitives, and the executor is handed the
//! backend up front instead of inferring it from where the data lives.

mod cpu;
mod gpu;

pub use cpu::CpuBackend;
pub use gpu::{GpuBackend, GpuMatrix};

use rand::Rng;

use crate::error::BenchResult;
use crate::matrix::Matrix;

/// A memory space plus the numeric primitives that operate in it
pub trait ComputeBackend {
    /// Handle to a matrix resident in this backend's memory space
    type Matrix;

    /// Human-readable backend label for progress output and charts
    fn name(&self) -> &'static str;

    /// Place a host matrix into this backend's memory space
    fn upload(&self, matrix: &Matrix) -> BenchResult<Self::Matrix>;

    /// Three independently-random square matrices, entries uniform in [0, 1),
    /// resident on this backend
    fn random_matrices<R: Rng>(
        &self,
        size: usize,
        rng: &mut R,
    ) -> BenchResult<(Self::Matrix, Self::Matrix, Self::Matrix)> {
        let a = self.upload(&Matrix::random(size, rng))?;
        let b = self.upload(&Matrix::random(size, rng))?;
        let c = self.upload(&Matrix::random(size, rng))?;
        Ok((a, b, c))
    }

    /// Matrix multiply in this backend's memory space
    fn matmul(&self, lhs: &Self::Matrix, rhs: &Self::Matrix) -> BenchResult<Self::Matrix>;

    /// Elementwise add in this backend's memory space
    fn add(&self, lhs: &Self::Matrix, rhs: &Self::Matrix) -> BenchResult<Self::Matrix>;

    /// Transfer a result into host memory. Free for host-resident backends.
    fn into_host(&self, matrix: Self::Matrix) -> BenchResult<Matrix>;
}
