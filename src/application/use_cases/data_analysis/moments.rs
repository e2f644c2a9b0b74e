// Descriptive moments over a plain list of doubles. None of these panic or
// error: empty and degenerate inputs return 0.

/// Below this a standard deviation counts as zero
const STD_EPSILON: f64 = 1e-10;

/// Subtracted from the fourth standardized moment so a normal distribution scores 0
const EXCESS_KURTOSIS_OFFSET: f64 = 3.0;

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Expects `sorted` in ascending order
pub fn median(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return 0.0;
    }
    if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    }
}

/// Population standard deviation (divides by N)
pub fn std_dev(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Linear interpolation at index `p * (n - 1)` over an ascending list
pub fn quartile(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return 0.0;
    }
    let index = p.clamp(0.0, 1.0) * (n - 1) as f64;
    let lower = index.floor() as usize;
    let upper = index.ceil() as usize;
    if lower == upper {
        return sorted[lower];
    }
    let weight = index - lower as f64;
    sorted[lower] + weight * (sorted[upper] - sorted[lower])
}

/// Bias-corrected sample skewness. 0 when n <= 2 or the spread is ~0.
pub fn skewness(values: &[f64], mean: f64, std_dev: f64) -> f64 {
    let n = values.len();
    if n <= 2 || std_dev < STD_EPSILON {
        return 0.0;
    }
    let n = n as f64;
    let third = values
        .iter()
        .map(|v| ((v - mean) / std_dev).powi(3))
        .sum::<f64>()
        / n;
    third * ((n * (n - 1.0)).sqrt() / (n - 2.0))
}

/// Bias-corrected excess kurtosis. 0 when n <= 3 or the spread is ~0.
pub fn kurtosis(values: &[f64], mean: f64, std_dev: f64) -> f64 {
    let n = values.len();
    if n <= 3 || std_dev < STD_EPSILON {
        return 0.0;
    }
    let n = n as f64;
    let fourth = values
        .iter()
        .map(|v| ((v - mean) / std_dev).powi(4))
        .sum::<f64>()
        / n;
    (fourth - EXCESS_KURTOSIS_OFFSET) * (n * (n - 1.0) / ((n - 2.0) * (n - 3.0)))
}
