//! Benchmark error handling
//!
//! One error enum covers both backends plus the derived-report failures, so
//! callers can propagate everything with `?` up to the binary boundary.

/// Errors raised by the benchmark harness
#[derive(Debug, thiserror::Error)]
pub enum BenchError {
    #[error("Backend not available: {backend}")]
    BackendUnavailable { backend: String },

    #[error("GPU initialization failed: {message}")]
    GpuInit { message: String },

    #[error("Shape mismatch: {left_rows}x{left_cols} vs {right_rows}x{right_cols}")]
    ShapeMismatch {
        left_rows: usize,
        left_cols: usize,
        right_rows: usize,
        right_cols: usize,
    },

    #[error("GPU buffer mapping failed: {message}")]
    BufferMap { message: String },

    #[error("GPU timing sample for size {size} is zero; speedup is undefined")]
    ZeroTiming { size: usize },
}

/// Type alias for benchmark operation results
pub type BenchResult<T> = Result<T, BenchError>;
