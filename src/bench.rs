//! Timed executor and benchmark driver
//!
//! One trial per (size, backend) pair, run strictly in sequence: the CPU
//! sample for a size is finished (host transfer included) before the GPU
//! sample starts, so no asynchronous device work overlaps a measurement.

use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::backend::ComputeBackend;
use crate::error::BenchResult;
use crate::matrix::Matrix;
use crate::report::BenchReport;

/// Compute `(A·B)·C + A` on `backend` and measure the wall-clock cost.
///
/// The association order is fixed: `A·B` first, then `·C`, then `+ A`. The
/// timed interval bounds the compute calls and the transfer of the result
/// into host memory, so a device backend is charged for result retrieval the
/// same way a caller would experience it.
pub fn timed_operation<B: ComputeBackend>(
    backend: &B,
    a: &B::Matrix,
    b: &B::Matrix,
    c: &B::Matrix,
) -> BenchResult<(Matrix, f64)> {
    let start = Instant::now();
    let ab = backend.matmul(a, b)?;
    let abc = backend.matmul(&ab, c)?;
    let result = backend.add(&abc, a)?;
    let host = backend.into_host(result)?;
    let elapsed = start.elapsed().as_secs_f64();
    Ok((host, elapsed))
}

/// Run the size sweep over both backends.
///
/// For each size, in order: generate CPU matrices and time the operation,
/// then generate GPU matrices and time the operation. Returns two timing
/// series index-aligned to `sizes`. An empty size list yields an empty
/// report.
pub fn run_benchmark<Cpu, Gpu>(
    sizes: &[usize],
    cpu: &Cpu,
    gpu: &Gpu,
    seed: u64,
) -> BenchResult<BenchReport>
where
    Cpu: ComputeBackend,
    Gpu: ComputeBackend,
{
    let mut rng = StdRng::seed_from_u64(seed);
    let mut cpu_times = Vec::with_capacity(sizes.len());
    let mut gpu_times = Vec::with_capacity(sizes.len());

    for &size in sizes {
        println!("Benchmarking size: {size}x{size}");

        let (a, b, c) = cpu.random_matrices(size, &mut rng)?;
        let (_, cpu_time) = timed_operation(cpu, &a, &b, &c)?;
        cpu_times.push(cpu_time);
        log::debug!("{} sample for {size}x{size}: {cpu_time:.6} s", cpu.name());

        let (a, b, c) = gpu.random_matrices(size, &mut rng)?;
        let (_, gpu_time) = timed_operation(gpu, &a, &b, &c)?;
        gpu_times.push(gpu_time);
        log::debug!("{} sample for {size}x{size}: {gpu_time:.6} s", gpu.name());

        println!("  CPU time: {cpu_time:.4} s | GPU time: {gpu_time:.4} s\n");
    }

    Ok(BenchReport {
        sizes: sizes.to_vec(),
        cpu_times,
        gpu_times,
    })
}
