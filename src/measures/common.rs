//! Shared numeric kernels: projective performance losses and the logistic
//! normalization used by the scalability/self-organization measures.
//!
//! Every kernel is a pure function of already-collected numbers. Division by
//! a zero performance never raises: loss magnitudes resolve to infinity and
//! fractional ratios to 1.0 (total loss). These sentinels are a modeling
//! choice and are relied on for numeric-regression compatibility.

/// Numerically stable logistic function.
pub fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Squash a raw theta into a bounded range symmetric around zero.
pub fn normalize_theta(theta: f64) -> f64 {
    sigmoid(theta) - sigmoid(-theta)
}

/// Performance lost to inter-agent interference at swarm size `n`, relative
/// to a hypothetical non-interacting baseline:
/// `P_lost(N) = P(N) * (t_lost(N) - N * t_lost(1)) / N`.
///
/// `tlost_1` is the time lost by the single-agent (exp0) configuration.
pub fn plost_kernel(perf_n: f64, n: usize, tlost_n: f64, tlost_1: f64) -> f64 {
    if perf_n == 0.0 {
        return f64::INFINITY;
    }
    perf_n * (tlost_n - n as f64 * tlost_1) / n as f64
}

/// Fractional loss `FL(N) = P_lost(N) / P(N)`; 1.0 when `P(N) == 0`.
pub fn fractional_loss_kernel(plost: f64, perf: f64) -> f64 {
    if perf == 0.0 { 1.0 } else { plost / perf }
}

/// Fractional losses across a univariate batch. `perf` and `tlost` are the
/// cumulative end-of-run values per experiment; exp0 is the reference and has
/// zero losses by definition.
pub struct FractionalLossesUnivar;

impl FractionalLossesUnivar {
    pub fn calculate(perf: &[f64], tlost: &[f64], populations: &[usize]) -> Vec<f64> {
        (0..perf.len())
            .map(|i| {
                if i == 0 {
                    0.0
                } else {
                    let plost = plost_kernel(perf[i], populations[i], tlost[i], tlost[0]);
                    fractional_loss_kernel(plost, perf[i])
                }
            })
            .collect()
    }
}

/// Fractional losses across a bivariate batch. The reference experiment is
/// the first cell along the population (primary) axis with the other axis
/// held fixed.
pub struct FractionalLossesBivar;

impl FractionalLossesBivar {
    pub fn calculate(
        perf: &[Vec<f64>],
        tlost: &[Vec<f64>],
        populations: &[Vec<usize>],
        primary_axis: usize,
    ) -> Vec<Vec<f64>> {
        map_grid(perf, |i, j| {
            let (pos, tlost_1) = if primary_axis == 0 {
                (i, tlost[0][j])
            } else {
                (j, tlost[i][0])
            };
            if pos == 0 {
                0.0
            } else {
                let plost = plost_kernel(perf[i][j], populations[i][j], tlost[i][j], tlost_1);
                fractional_loss_kernel(plost, perf[i][j])
            }
        })
    }
}

/// Apply a per-cell function over a grid, preserving shape.
pub(crate) fn map_grid(shape: &[Vec<f64>], f: impl Fn(usize, usize) -> f64) -> Vec<Vec<f64>> {
    shape
        .iter()
        .enumerate()
        .map(|(i, row)| (0..row.len()).map(|j| f(i, j)).collect())
        .collect()
}

/// Walk the adjacency `exp_i` vs `exp_{i-1}` along the primary axis of a
/// grid; positions at the start of that axis get `boundary`.
pub(crate) fn bivar_adjacent(
    vals: &[Vec<f64>],
    populations: &[Vec<usize>],
    primary_axis: usize,
    boundary: f64,
    kernel: impl Fn(f64, f64, usize, usize) -> f64,
) -> Vec<Vec<f64>> {
    map_grid(vals, |i, j| {
        let pos = if primary_axis == 0 { i } else { j };
        if pos == 0 {
            boundary
        } else if primary_axis == 0 {
            kernel(
                vals[i][j],
                vals[i - 1][j],
                populations[i][j],
                populations[i - 1][j],
            )
        } else {
            kernel(
                vals[i][j],
                vals[i][j - 1],
                populations[i][j],
                populations[i][j - 1],
            )
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sigmoid_stability() {
        assert!(sigmoid(1000.0) <= 1.0);
        assert!(sigmoid(-1000.0) >= 0.0);
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_normalize_theta_symmetric() {
        assert_eq!(normalize_theta(0.0), 0.0);
        assert!((normalize_theta(2.0) + normalize_theta(-2.0)).abs() < 1e-12);
        assert!(normalize_theta(50.0) < 1.0);
        assert!(normalize_theta(-50.0) > -1.0);
    }

    #[test]
    fn test_plost_zero_perf_sentinel() {
        assert_eq!(plost_kernel(0.0, 4, 10.0, 1.0), f64::INFINITY);
    }

    #[test]
    fn test_fractional_losses_univar_boundaries() {
        let perf = vec![10.0, 0.0, 40.0];
        let tlost = vec![1.0, 8.0, 20.0];
        let pops = vec![1, 2, 4];

        let fl = FractionalLossesUnivar::calculate(&perf, &tlost, &pops);
        assert_eq!(fl[0], 0.0);
        // Zero performance: total loss.
        assert_eq!(fl[1], 1.0);
        // P_lost = 40 * (20 - 4*1) / 4 = 160; FL = 160/40 = 4.
        assert_eq!(fl[2], 4.0);
    }

    #[test]
    fn test_fractional_losses_bivar_axis0() {
        let perf = vec![vec![10.0, 10.0], vec![20.0, 0.0]];
        let tlost = vec![vec![1.0, 2.0], vec![4.0, 8.0]];
        let pops = vec![vec![1, 1], vec![2, 2]];

        let fl = FractionalLossesBivar::calculate(&perf, &tlost, &pops, 0);
        assert_eq!(fl[0], vec![0.0, 0.0]);
        // P_lost = 20 * (4 - 2*1) / 2 = 20; FL = 1.0.
        assert_eq!(fl[1][0], 1.0);
        assert_eq!(fl[1][1], 1.0); // zero perf sentinel
    }

    #[test]
    fn test_fractional_losses_bivar_axis1() {
        let perf = vec![vec![10.0, 20.0]];
        let tlost = vec![vec![1.0, 4.0]];
        let pops = vec![vec![1, 2]];

        let fl = FractionalLossesBivar::calculate(&perf, &tlost, &pops, 1);
        assert_eq!(fl[0][0], 0.0);
        assert_eq!(fl[0][1], 1.0);
    }
}
