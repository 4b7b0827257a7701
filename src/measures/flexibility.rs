//! Flexibility measures: reactivity and adaptability as curve distances
//! between an ideal (no-variance) waveform and the observed one, plus their
//! weighted combination.

use crate::measures::vcs::CurveSimilarity;

/// Per-experiment curve comparison. Reactivity and adaptability differ only
/// in which ideal waveform the caller supplies (post-perturbation recovery vs
/// steady-state tracking); the reduction is the same.
pub struct CurveComparisonUnivar;

impl CurveComparisonUnivar {
    pub fn calculate(
        ideal: &[Vec<(f64, f64)>],
        observed: &[Vec<(f64, f64)>],
        method: CurveSimilarity,
    ) -> Vec<f64> {
        ideal
            .iter()
            .zip(observed)
            .map(|(i, o)| method.compare(i, o))
            .collect()
    }
}

pub struct CurveComparisonBivar;

impl CurveComparisonBivar {
    pub fn calculate(
        ideal: &[Vec<Vec<(f64, f64)>>],
        observed: &[Vec<Vec<(f64, f64)>>],
        method: CurveSimilarity,
    ) -> Vec<Vec<f64>> {
        ideal
            .iter()
            .zip(observed)
            .map(|(irow, orow)| {
                irow.iter()
                    .zip(orow)
                    .map(|(i, o)| method.compare(i, o))
                    .collect()
            })
            .collect()
    }
}

/// Fixed linear combination `alpha_r * reactivity + alpha_a * adaptability`.
#[derive(Debug, Clone, Copy)]
pub struct WeightedPm {
    pub alpha_r: f64,
    pub alpha_a: f64,
}

impl WeightedPm {
    pub fn new(alpha_r: f64, alpha_a: f64) -> Self {
        Self { alpha_r, alpha_a }
    }

    pub fn combine_univar(&self, reactivity: &[f64], adaptability: &[f64]) -> Vec<f64> {
        reactivity
            .iter()
            .zip(adaptability)
            .map(|(&r, &a)| self.alpha_r * r + self.alpha_a * a)
            .collect()
    }

    pub fn combine_bivar(
        &self,
        reactivity: &[Vec<f64>],
        adaptability: &[Vec<f64>],
    ) -> Vec<Vec<f64>> {
        reactivity
            .iter()
            .zip(adaptability)
            .map(|(rrow, arow)| self.combine_univar(rrow, arow))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(n: usize, slope: f64) -> Vec<(f64, f64)> {
        (0..n).map(|i| (i as f64, slope * i as f64)).collect()
    }

    #[test]
    fn test_curve_comparison_per_experiment() {
        let ideal = vec![ramp(5, 1.0), ramp(5, 1.0)];
        let shifted: Vec<_> = ramp(5, 1.0).iter().map(|&(x, y)| (x, y + 3.0)).collect();
        let observed = vec![ramp(5, 1.0), shifted];

        let out = CurveComparisonUnivar::calculate(&ideal, &observed, CurveSimilarity::Frechet);
        assert!(out[0].abs() < 1e-12);
        assert!((out[1] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_weighted_combination() {
        let w = WeightedPm::new(0.5, 0.5);
        let combined = w.combine_univar(&[1.0, 2.0], &[3.0, 4.0]);
        assert_eq!(combined, vec![2.0, 3.0]);

        let grid = w.combine_bivar(&[vec![2.0]], &[vec![4.0]]);
        assert_eq!(grid, vec![vec![3.0]]);
    }
}
