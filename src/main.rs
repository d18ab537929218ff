/// Matrix benchmark executable
///
/// Runs the full size sweep of `(A·B)·C + A` on the CPU and GPU backends and
/// prints the summary table and charts. No arguments; `RUST_LOG` controls
/// diagnostic output.
use matbench::{chart, run_benchmark, BenchConfig, CpuBackend, GpuBackend};

fn run() -> anyhow::Result<()> {
    let config = BenchConfig::default();

    let cpu = CpuBackend::new();
    let gpu = GpuBackend::new()?;

    let report = run_benchmark(&config.sizes, &cpu, &gpu, config.seed)?;

    print!("{}", report.summary_table()?);
    println!();
    print!("{}", chart::render(&report)?);
    Ok(())
}

fn main() {
    env_logger::init();
    println!("CPU vs GPU chained matmul benchmark");

    if let Err(e) = run() {
        log::error!("Benchmark failed: {e}");
        std::process::exit(1);
    }
}
