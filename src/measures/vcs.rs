//! Curve-similarity methods for comparing an ideal waveform against an
//! observed one. All methods consume sampled curves as `(x, y)` point lists
//! and return a scalar distance (0.0 = identical).

/// Selectable distance method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveSimilarity {
    /// Partial curve mapping: minimal mean pointwise distance over index
    /// offsets of the shorter curve along the longer one.
    Pcm,
    /// Trapezoidal area between the curves, with the observed curve linearly
    /// interpolated onto the ideal curve's sample grid.
    AreaBetween,
    /// Discrete Frechet distance.
    Frechet,
    /// Dynamic time warping, accumulated cost normalized by warp path length.
    Dtw,
    /// Absolute difference of the two curves' arc lengths.
    CurveLength,
}

impl CurveSimilarity {
    pub fn compare(self, ideal: &[(f64, f64)], observed: &[(f64, f64)]) -> f64 {
        if ideal.is_empty() || observed.is_empty() {
            return f64::INFINITY;
        }
        match self {
            CurveSimilarity::Pcm => pcm(ideal, observed),
            CurveSimilarity::AreaBetween => area_between(ideal, observed),
            CurveSimilarity::Frechet => frechet(ideal, observed),
            CurveSimilarity::Dtw => dtw(ideal, observed),
            CurveSimilarity::CurveLength => {
                (arc_length(ideal) - arc_length(observed)).abs()
            }
        }
    }
}

fn dist(a: (f64, f64), b: (f64, f64)) -> f64 {
    ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt()
}

fn arc_length(curve: &[(f64, f64)]) -> f64 {
    curve.windows(2).map(|w| dist(w[0], w[1])).sum()
}

/// Linear interpolation of `curve` at `x`; clamps outside the sampled range.
fn interp(curve: &[(f64, f64)], x: f64) -> f64 {
    if x <= curve[0].0 {
        return curve[0].1;
    }
    if let Some(&(last_x, last_y)) = curve.last() {
        if x >= last_x {
            return last_y;
        }
    }
    for w in curve.windows(2) {
        let ((x0, y0), (x1, y1)) = (w[0], w[1]);
        if x >= x0 && x <= x1 {
            if x1 == x0 {
                return y0;
            }
            return y0 + (y1 - y0) * (x - x0) / (x1 - x0);
        }
    }
    curve[curve.len() - 1].1
}

fn area_between(ideal: &[(f64, f64)], observed: &[(f64, f64)]) -> f64 {
    if ideal.len() < 2 {
        return (ideal[0].1 - interp(observed, ideal[0].0)).abs();
    }
    ideal
        .windows(2)
        .map(|w| {
            let ((x0, y0), (x1, y1)) = (w[0], w[1]);
            let d0 = (y0 - interp(observed, x0)).abs();
            let d1 = (y1 - interp(observed, x1)).abs();
            (d0 + d1) / 2.0 * (x1 - x0)
        })
        .sum()
}

fn frechet(a: &[(f64, f64)], b: &[(f64, f64)]) -> f64 {
    let (n, m) = (a.len(), b.len());
    let mut ca = vec![vec![0.0f64; m]; n];
    for i in 0..n {
        for j in 0..m {
            let d = dist(a[i], b[j]);
            ca[i][j] = match (i, j) {
                (0, 0) => d,
                (_, 0) => ca[i - 1][0].max(d),
                (0, _) => ca[0][j - 1].max(d),
                _ => ca[i - 1][j].min(ca[i - 1][j - 1]).min(ca[i][j - 1]).max(d),
            };
        }
    }
    ca[n - 1][m - 1]
}

fn dtw(a: &[(f64, f64)], b: &[(f64, f64)]) -> f64 {
    let (n, m) = (a.len(), b.len());
    let mut acc = vec![vec![f64::INFINITY; m + 1]; n + 1];
    acc[0][0] = 0.0;
    for i in 1..=n {
        for j in 1..=m {
            let d = dist(a[i - 1], b[j - 1]);
            acc[i][j] = d + acc[i - 1][j].min(acc[i][j - 1]).min(acc[i - 1][j - 1]);
        }
    }
    acc[n][m] / (n + m) as f64
}

/// Slide the shorter curve along the longer one and take the minimal mean
/// pointwise distance over all offsets.
fn pcm(a: &[(f64, f64)], b: &[(f64, f64)]) -> f64 {
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let span = long.len() - short.len();
    (0..=span)
        .map(|offset| {
            let total: f64 = short
                .iter()
                .enumerate()
                .map(|(i, &p)| dist(p, long[i + offset]))
                .sum();
            total / short.len() as f64
        })
        .fold(f64::INFINITY, f64::min)
}
