//! Benchmark results and speedup derivation

use crate::error::{BenchError, BenchResult};

/// Timing series collected by the driver, index-aligned to `sizes`
#[derive(Debug, Clone, PartialEq)]
pub struct BenchReport {
    pub sizes: Vec<usize>,
    pub cpu_times: Vec<f64>,
    pub gpu_times: Vec<f64>,
}

impl BenchReport {
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// Per-size speedup, `cpu_time / gpu_time`.
    ///
    /// A zero GPU sample makes the ratio undefined; that is surfaced as
    /// [`BenchError::ZeroTiming`] rather than a silent NaN or infinity.
    pub fn speedups(&self) -> BenchResult<Vec<f64>> {
        self.sizes
            .iter()
            .zip(self.cpu_times.iter().zip(&self.gpu_times))
            .map(|(&size, (&cpu, &gpu))| {
                if gpu == 0.0 {
                    Err(BenchError::ZeroTiming { size })
                } else {
                    Ok(cpu / gpu)
                }
            })
            .collect()
    }

    /// Aligned numeric table of all samples and speedups
    pub fn summary_table(&self) -> BenchResult<String> {
        let speedups = self.speedups()?;
        let mut out = String::new();
        out.push_str(&format!(
            "{:<12} {:>12} {:>12} {:>10}\n",
            "Size", "CPU (s)", "GPU (s)", "Speedup"
        ));
        out.push_str(&format!("{}\n", "-".repeat(49)));
        for i in 0..self.len() {
            out.push_str(&format!(
                "{:<12} {:>12.4} {:>12.4} {:>9.1}x\n",
                format!("{0}x{0}", self.sizes[i]),
                self.cpu_times[i],
                self.gpu_times[i],
                speedups[i]
            ));
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> BenchReport {
        BenchReport {
            sizes: vec![128, 256],
            cpu_times: vec![0.4, 1.2],
            gpu_times: vec![0.2, 0.3],
        }
    }

    #[test]
    fn speedups_are_elementwise_ratios() {
        let speedups = report().speedups().unwrap();
        assert_eq!(speedups, vec![2.0, 4.0]);
    }

    #[test]
    fn zero_gpu_sample_is_an_explicit_error() {
        let mut r = report();
        r.gpu_times[1] = 0.0;
        assert!(matches!(
            r.speedups(),
            Err(BenchError::ZeroTiming { size: 256 })
        ));
    }

    #[test]
    fn empty_report_has_empty_speedups() {
        let r = BenchReport {
            sizes: vec![],
            cpu_times: vec![],
            gpu_times: vec![],
        };
        assert!(r.is_empty());
        assert!(r.speedups().unwrap().is_empty());
    }

    #[test]
    fn summary_table_contains_each_row() {
        let table = report().summary_table().unwrap();
        assert!(table.contains("128x128"));
        assert!(table.contains("256x256"));
        assert!(table.contains("4.0x"));
    }
}
