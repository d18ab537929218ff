pub mod backend;
pub mod bench;
pub mod chart;
pub mod error;
pub mod matrix;
pub mod report;

pub use backend::{ComputeBackend, CpuBackend, GpuBackend, GpuMatrix};
pub use bench::{run_benchmark, timed_operation};
pub use error::{BenchError, BenchResult};
pub use matrix::Matrix;
pub use report::BenchReport;

/// Main benchmark configuration
#[derive(Debug, Clone)]
pub struct BenchConfig {
    /// Matrix dimensions to sweep, in order
    pub sizes: Vec<usize>,
    /// Seed for the matrix generator
    pub seed: u64,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            sizes: vec![128, 256, 512, 1024, 2048, 4096],
            seed: 0x5eed,
        }
    }
}
