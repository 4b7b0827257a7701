//! Raw performance: the last time-index value of the cumulative performance
//! series, per experiment.

use crate::models::{BatchError, BatchResult};
use crate::utils::parse_array_cell;

pub struct RawUnivar;

impl RawUnivar {
    /// One cumulative series per experiment; the measure is the final value.
    pub fn calculate(series: &[Vec<f64>]) -> BatchResult<Vec<f64>> {
        series
            .iter()
            .map(|s| {
                s.last()
                    .copied()
                    .ok_or_else(|| BatchError::ArrayCell("empty performance series".to_string()))
            })
            .collect()
    }
}

pub struct RawBivar;

impl RawBivar {
    /// Bivariate collated data arrives with each grid cell holding a whole
    /// series printed into a string; re-parse the cell and take its last
    /// element.
    pub fn calculate(cells: &[Vec<String>]) -> BatchResult<Vec<Vec<f64>>> {
        cells
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| {
                        let vals = parse_array_cell(cell)?;
                        vals.last()
                            .copied()
                            .ok_or_else(|| BatchError::ArrayCell(cell.to_string()))
                    })
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_univar_last_value() {
        let series = vec![vec![1.0, 2.0, 3.0], vec![10.0]];
        assert_eq!(RawUnivar::calculate(&series).unwrap(), vec![3.0, 10.0]);
    }

    #[test]
    fn test_univar_empty_series_errors() {
        assert!(RawUnivar::calculate(&[vec![]]).is_err());
    }

    #[test]
    fn test_bivar_parses_stringified_cells() {
        let cells = vec![
            vec!["[1.0 2.0 3.0]".to_string(), "[4.0]".to_string()],
            vec!["[5.0, 6.0]".to_string(), "[7.0 8.0]".to_string()],
        ];
        let out = RawBivar::calculate(&cells).unwrap();
        assert_eq!(out, vec![vec![3.0, 4.0], vec![6.0, 8.0]]);
    }

    #[test]
    fn test_bivar_truncated_cell_errors() {
        let cells = vec![vec!["[1.0 ... 9.0]".to_string()]];
        assert!(RawBivar::calculate(&cells).is_err());
    }
}
