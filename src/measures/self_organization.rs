//! Self-organization (emergence) measures.
//!
//! Four kernels, all comparing an observed value against a scaled reference:
//! marginal variants scale the *adjacent* experiment's value by the adjacent
//! population ratio, interactive variants scale *exp0's* value by the current
//! population. Loss-based kernels reward sub-linear growth of fractional
//! losses; gain-based kernels reward super-linear growth of performance, so
//! positive theta uniformly means "better than the scaled reference".

use crate::measures::common::{bivar_adjacent, map_grid, normalize_theta};

/// `theta = (N_i / N_{i-1}) * FL_{i-1} - FL_i`; 0.0 at `N_i <= 1`.
pub fn fl_marginal_kernel(fl_i: f64, fl_prev: f64, n_i: usize, n_prev: usize) -> f64 {
    if n_i <= 1 {
        return 0.0;
    }
    (n_i as f64 / n_prev as f64) * fl_prev - fl_i
}

/// `theta = N_i * FL_0 - FL_i`; 0.0 at `N_i <= 1`.
pub fn fl_interactive_kernel(fl_i: f64, fl_0: f64, n_i: usize) -> f64 {
    if n_i <= 1 {
        return 0.0;
    }
    n_i as f64 * fl_0 - fl_i
}

/// `theta = P_i - (N_i / N_{i-1}) * P_{i-1}`; 0.0 at `N_i <= 1`.
pub fn pg_marginal_kernel(perf_i: f64, perf_prev: f64, n_i: usize, n_prev: usize) -> f64 {
    if n_i <= 1 {
        return 0.0;
    }
    perf_i - (n_i as f64 / n_prev as f64) * perf_prev
}

/// `theta = P_i - N_i * P_0`; 0.0 at `N_i <= 1`.
pub fn pg_interactive_kernel(perf_i: f64, perf_0: f64, n_i: usize) -> f64 {
    if n_i <= 1 {
        return 0.0;
    }
    perf_i - n_i as f64 * perf_0
}

fn maybe_normalize(vals: Vec<f64>, normalize: bool) -> Vec<f64> {
    if normalize {
        vals.into_iter().map(normalize_theta).collect()
    } else {
        vals
    }
}

fn maybe_normalize_grid(vals: Vec<Vec<f64>>, normalize: bool) -> Vec<Vec<f64>> {
    if normalize {
        vals.into_iter()
            .map(|row| row.into_iter().map(normalize_theta).collect())
            .collect()
    } else {
        vals
    }
}

/// Marginal, loss-based self-organization across a univariate batch.
pub struct FlMarginalUnivar;

impl FlMarginalUnivar {
    pub fn calculate(fl: &[f64], populations: &[usize], normalize: bool) -> Vec<f64> {
        let theta = (0..fl.len())
            .map(|i| {
                if i == 0 {
                    0.0
                } else {
                    fl_marginal_kernel(fl[i], fl[i - 1], populations[i], populations[i - 1])
                }
            })
            .collect();
        maybe_normalize(theta, normalize)
    }
}

/// Interactive, loss-based self-organization across a univariate batch.
pub struct FlInteractiveUnivar;

impl FlInteractiveUnivar {
    pub fn calculate(fl: &[f64], populations: &[usize], normalize: bool) -> Vec<f64> {
        let theta = (0..fl.len())
            .map(|i| {
                if i == 0 {
                    0.0
                } else {
                    fl_interactive_kernel(fl[i], fl[0], populations[i])
                }
            })
            .collect();
        maybe_normalize(theta, normalize)
    }
}

/// Marginal, gain-based self-organization across a univariate batch.
pub struct PgMarginalUnivar;

impl PgMarginalUnivar {
    pub fn calculate(perf: &[f64], populations: &[usize], normalize: bool) -> Vec<f64> {
        let theta = (0..perf.len())
            .map(|i| {
                if i == 0 {
                    0.0
                } else {
                    pg_marginal_kernel(perf[i], perf[i - 1], populations[i], populations[i - 1])
                }
            })
            .collect();
        maybe_normalize(theta, normalize)
    }
}

/// Interactive, gain-based self-organization across a univariate batch.
pub struct PgInteractiveUnivar;

impl PgInteractiveUnivar {
    pub fn calculate(perf: &[f64], populations: &[usize], normalize: bool) -> Vec<f64> {
        let theta = (0..perf.len())
            .map(|i| {
                if i == 0 {
                    0.0
                } else {
                    pg_interactive_kernel(perf[i], perf[0], populations[i])
                }
            })
            .collect();
        maybe_normalize(theta, normalize)
    }
}

/// Marginal, loss-based self-organization over a bivariate grid.
pub struct FlMarginalBivar;

impl FlMarginalBivar {
    pub fn calculate(
        fl: &[Vec<f64>],
        populations: &[Vec<usize>],
        primary_axis: usize,
        normalize: bool,
    ) -> Vec<Vec<f64>> {
        let theta = bivar_adjacent(fl, populations, primary_axis, 0.0, fl_marginal_kernel);
        maybe_normalize_grid(theta, normalize)
    }
}

/// Interactive, loss-based self-organization over a bivariate grid.
pub struct FlInteractiveBivar;

impl FlInteractiveBivar {
    pub fn calculate(
        fl: &[Vec<f64>],
        populations: &[Vec<usize>],
        primary_axis: usize,
        normalize: bool,
    ) -> Vec<Vec<f64>> {
        let theta = map_grid(fl, |i, j| {
            let (pos, fl_0) = if primary_axis == 0 {
                (i, fl[0][j])
            } else {
                (j, fl[i][0])
            };
            if pos == 0 {
                0.0
            } else {
                fl_interactive_kernel(fl[i][j], fl_0, populations[i][j])
            }
        });
        maybe_normalize_grid(theta, normalize)
    }
}

/// Marginal, gain-based self-organization over a bivariate grid.
pub struct PgMarginalBivar;

impl PgMarginalBivar {
    pub fn calculate(
        perf: &[Vec<f64>],
        populations: &[Vec<usize>],
        primary_axis: usize,
        normalize: bool,
    ) -> Vec<Vec<f64>> {
        let theta = bivar_adjacent(perf, populations, primary_axis, 0.0, pg_marginal_kernel);
        maybe_normalize_grid(theta, normalize)
    }
}

/// Interactive, gain-based self-organization over a bivariate grid.
pub struct PgInteractiveBivar;

impl PgInteractiveBivar {
    pub fn calculate(
        perf: &[Vec<f64>],
        populations: &[Vec<usize>],
        primary_axis: usize,
        normalize: bool,
    ) -> Vec<Vec<f64>> {
        let theta = map_grid(perf, |i, j| {
            let (pos, perf_0) = if primary_axis == 0 {
                (i, perf[0][j])
            } else {
                (j, perf[i][0])
            };
            if pos == 0 {
                0.0
            } else {
                pg_interactive_kernel(perf[i][j], perf_0, populations[i][j])
            }
        });
        maybe_normalize_grid(theta, normalize)
    }
}
