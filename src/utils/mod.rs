use crate::models::{BatchError, BatchResult};

/// Parse a float array that was written into a CSV cell as its printed form,
/// e.g. `"[1.0 2.5 3.0]"`. The cell format is a committed external interface;
/// it is parsed with an explicit small grammar (strip brackets, split on
/// whitespace or commas, parse floats) rather than trusting any pretty
/// printer. Embedded newlines count as whitespace; a truncation marker
/// (`...`) is a hard error.
pub fn parse_array_cell(cell: &str) -> BatchResult<Vec<f64>> {
    let inner = cell.trim().trim_start_matches('[').trim_end_matches(']');
    if inner.contains("...") {
        return Err(BatchError::ArrayCell(cell.to_string()));
    }
    inner
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|tok| !tok.is_empty())
        .map(|tok| {
            tok.parse::<f64>()
                .map_err(|_| BatchError::ArrayCell(cell.to_string()))
        })
        .collect()
}

/// `n` evenly spaced values over `[min, max]` inclusive; a single point
/// collapses to `min`.
pub fn linspace(min: f64, max: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![min],
        _ => (0..n)
            .map(|i| min + (max - min) * i as f64 / (n - 1) as f64)
            .collect(),
    }
}
