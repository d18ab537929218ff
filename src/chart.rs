//! Terminal chart rendering
//!
//! Renders the execution-time curves and the speedup curve as two stacked
//! character charts sharing the size axis, with per-point speedup annotations
//! and a combined legend. Pure function of the report; output goes to a
//! `String` so tests can assert on it.

use std::fmt::Write;

use crate::error::BenchResult;
use crate::report::BenchReport;

const CHART_WIDTH: usize = 60;
const CHART_HEIGHT: usize = 10;

const CPU_MARKER: char = '*';
const GPU_MARKER: char = 'o';
const OVERLAP_MARKER: char = '#';
const SPEEDUP_MARKER: char = 's';

/// Column for sample `i` of `count`, spread across the chart width
fn column(i: usize, count: usize, width: usize) -> usize {
    if count <= 1 {
        0
    } else {
        i * (width - 1) / (count - 1)
    }
}

fn place(grid: &mut [Vec<char>], row: usize, col: usize, marker: char) {
    let cell = &mut grid[row][col];
    *cell = match *cell {
        ' ' | '|' => marker,
        current if current == marker => marker,
        _ => OVERLAP_MARKER,
    };
}

/// Plot one series into the grid, joining vertical gaps between adjacent
/// points with '|'
fn plot_series(grid: &mut [Vec<char>], values: &[f64], max: f64, marker: char) {
    let height = grid.len();
    let max = if max <= 0.0 { 1.0 } else { max };
    let mut prev_row: Option<usize> = None;
    for (i, &v) in values.iter().enumerate() {
        let x = column(i, values.len(), CHART_WIDTH);
        let ratio = (v / max).clamp(0.0, 1.0);
        let y = ((height as f64 - 1.0) * ratio).round() as usize;
        let row = height - 1 - y;
        if let Some(prev) = prev_row {
            if prev != row {
                let (from, to) = if prev < row { (prev, row) } else { (row, prev) };
                for r in from..=to {
                    if grid[r][x] == ' ' {
                        grid[r][x] = '|';
                    }
                }
            }
        }
        place(grid, row, x, marker);
        prev_row = Some(row);
    }
}

/// Write `text` into the grid row starting at `col`. Joins may be overwritten,
/// series markers may not.
fn annotate(grid: &mut [Vec<char>], row: usize, col: usize, text: &str) {
    let width = grid[row].len();
    let start = col.min(width.saturating_sub(text.len()));
    if grid[row][start..(start + text.len()).min(width)]
        .iter()
        .any(|&c| c != ' ' && c != '|')
    {
        return;
    }
    for (offset, ch) in text.chars().enumerate() {
        if start + offset < width {
            grid[row][start + offset] = ch;
        }
    }
}

fn render_grid(out: &mut String, grid: &[Vec<char>], max: f64) {
    let height = grid.len();
    for (row, cells) in grid.iter().enumerate() {
        let axis_val = max * (height - 1 - row) as f64 / (height - 1) as f64;
        let label = if row == 0 || row == height - 1 || row == height / 2 {
            format!("{axis_val:>8.3}")
        } else {
            " ".repeat(8)
        };
        let line: String = cells.iter().collect();
        let _ = writeln!(out, "{label}|{line}");
    }
    let _ = writeln!(out, "        +{}", "-".repeat(CHART_WIDTH));
}

/// Size labels lined up under their chart columns
fn render_size_axis(out: &mut String, sizes: &[usize]) {
    let mut row = vec![' '; CHART_WIDTH + 8];
    for (i, size) in sizes.iter().enumerate() {
        let text = size.to_string();
        let col = column(i, sizes.len(), CHART_WIDTH);
        let start = col.min(row.len().saturating_sub(text.len()));
        if row[start..start + text.len()].iter().all(|&c| c == ' ') {
            for (offset, ch) in text.chars().enumerate() {
                row[start + offset] = ch;
            }
        }
    }
    let line: String = row.into_iter().collect();
    let _ = writeln!(out, "         {}", line.trim_end());
}

/// Render the full dual chart for a benchmark report
pub fn render(report: &BenchReport) -> BenchResult<String> {
    let mut out = String::new();
    let _ = writeln!(out, "CPU vs GPU Execution Time and Speedup");

    if report.is_empty() {
        let _ = writeln!(out, "(no samples)");
        return Ok(out);
    }

    let speedups = report.speedups()?;

    let time_max = report
        .cpu_times
        .iter()
        .chain(&report.gpu_times)
        .fold(0.0f64, |acc, &v| acc.max(v));
    let mut time_grid = vec![vec![' '; CHART_WIDTH]; CHART_HEIGHT];
    plot_series(&mut time_grid, &report.cpu_times, time_max, CPU_MARKER);
    plot_series(&mut time_grid, &report.gpu_times, time_max, GPU_MARKER);

    let _ = writeln!(out, "\nExecution time (seconds) vs matrix size:");
    render_grid(&mut out, &time_grid, time_max);
    render_size_axis(&mut out, &report.sizes);

    let speedup_max = speedups.iter().fold(0.0f64, |acc, &v| acc.max(v));
    let mut speedup_grid = vec![vec![' '; CHART_WIDTH]; CHART_HEIGHT];
    plot_series(&mut speedup_grid, &speedups, speedup_max, SPEEDUP_MARKER);

    // Annotate each point one row above its marker (below when at the top)
    for (i, &s) in speedups.iter().enumerate() {
        let x = column(i, speedups.len(), CHART_WIDTH);
        let row = speedup_grid
            .iter()
            .position(|r| r[x] == SPEEDUP_MARKER || r[x] == OVERLAP_MARKER)
            .unwrap_or(CHART_HEIGHT - 1);
        let target = if row == 0 { 1 } else { row - 1 };
        annotate(&mut speedup_grid, target, x, &format!("{s:.1}x"));
    }

    let _ = writeln!(out, "\nSpeedup (CPU/GPU) vs matrix size:");
    render_grid(&mut out, &speedup_grid, speedup_max);
    render_size_axis(&mut out, &report.sizes);

    let _ = writeln!(
        out,
        "\nLegend: '{CPU_MARKER}' CPU time, '{GPU_MARKER}' GPU time, \
         '{OVERLAP_MARKER}' overlap, '{SPEEDUP_MARKER}' speedup, '|' join"
    );
    Ok(out)
}
