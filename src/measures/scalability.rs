//! Scalability measures: Karp-Flatt-style parallel fraction and normalized
//! efficiency.

use crate::measures::common::{bivar_adjacent, map_grid, normalize_theta};

/// Serial-fraction estimate for the step from swarm size `n_prev` to `n_i`
/// with observed speedup `X = perf_i / perf_prev`:
/// `e = (1/X - 1/(N2/N1)) / (1 - 1/(N2/N1))`, reported as `theta = 1 - e`.
///
/// At `n_i <= 1` the limit is taken as `e = 1.0` (hard-coded L'Hopital
/// boundary), so `theta = 0.0`.
pub fn parallel_fraction_kernel(perf_i: f64, perf_prev: f64, n_i: usize, n_prev: usize) -> f64 {
    if n_i <= 1 {
        return 0.0;
    }
    let size_ratio = n_i as f64 / n_prev as f64;
    let x = if perf_prev == 0.0 {
        f64::INFINITY
    } else {
        perf_i / perf_prev
    };
    let e = (1.0 / x - 1.0 / size_ratio) / (1.0 - 1.0 / size_ratio);
    1.0 - e
}

/// Per-experiment efficiency `E(N) = P(N) / N`; no adjacent-pair dependency.
pub fn efficiency_kernel(perf: f64, n: usize) -> f64 {
    perf / n as f64
}

pub struct ParallelFractionUnivar;

impl ParallelFractionUnivar {
    /// `perf` holds the cumulative end-of-run performance per experiment.
    /// exp0 has no predecessor and reports 0.0.
    pub fn calculate(perf: &[f64], populations: &[usize], normalize: bool) -> Vec<f64> {
        (0..perf.len())
            .map(|i| {
                if i == 0 {
                    0.0
                } else {
                    let theta = parallel_fraction_kernel(
                        perf[i],
                        perf[i - 1],
                        populations[i],
                        populations[i - 1],
                    );
                    if normalize { normalize_theta(theta) } else { theta }
                }
            })
            .collect()
    }
}

pub struct ParallelFractionBivar;

impl ParallelFractionBivar {
    pub fn calculate(
        perf: &[Vec<f64>],
        populations: &[Vec<usize>],
        primary_axis: usize,
        normalize: bool,
    ) -> Vec<Vec<f64>> {
        let raw = bivar_adjacent(perf, populations, primary_axis, 0.0, parallel_fraction_kernel);
        if normalize {
            raw.iter()
                .map(|row| row.iter().map(|&t| normalize_theta(t)).collect())
                .collect()
        } else {
            raw
        }
    }
}

pub struct NormalizedEfficiencyUnivar;

impl NormalizedEfficiencyUnivar {
    pub fn calculate(perf: &[f64], populations: &[usize]) -> Vec<f64> {
        perf.iter()
            .zip(populations)
            .map(|(&p, &n)| efficiency_kernel(p, n))
            .collect()
    }
}

pub struct NormalizedEfficiencyBivar;

impl NormalizedEfficiencyBivar {
    pub fn calculate(perf: &[Vec<f64>], populations: &[Vec<usize>]) -> Vec<Vec<f64>> {
        map_grid(perf, |i, j| efficiency_kernel(perf[i][j], populations[i][j]))
    }
}
