//! Statistics over the retained values of a sample.
//!
//! Every function here takes the values as a plain slice and holds no state of its own.
//! [`percentile`] and [`percentiles`] additionally require the slice to be sorted in ascending
//! order: [`SampleSnapshot`](crate::SampleSnapshot) sorts its values when it is created, so
//! statistics taken through a snapshot always satisfy that requirement.
//!
//! All functions treat an empty slice as a sample of zeroes.

/// Gets the sum of the values.
///
/// The sum wraps on overflow.
pub fn sum(values: &[i64]) -> i64 {
    values.iter().fold(0i64, |acc, v| acc.wrapping_add(*v))
}

/// Gets the arithmetic mean of the values.
pub fn mean(values: &[i64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    // Accumulate in 128 bits so the mean is correct even when the sum overflows an `i64`.
    let total: i128 = values.iter().map(|v| i128::from(*v)).sum();
    total as f64 / values.len() as f64
}

/// Gets the population variance of the values.
pub fn variance(values: &[i64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let mean = mean(values);
    let squares: f64 = values
        .iter()
        .map(|v| {
            let delta = *v as f64 - mean;
            delta * delta
        })
        .sum();
    squares / values.len() as f64
}

/// Gets the population standard deviation of the values.
pub fn std_dev(values: &[i64]) -> f64 {
    variance(values).sqrt()
}

/// Gets the smallest value.
pub fn min(values: &[i64]) -> i64 {
    values.iter().copied().min().unwrap_or(0)
}

/// Gets the largest value.
pub fn max(values: &[i64]) -> i64 {
    values.iter().copied().max().unwrap_or(0)
}

/// Gets the value at the given percentile, expressed as a fraction between 0.0 and 1.0.
///
/// `sorted` must be in ascending order.  The position of the percentile is `p * (n + 1)`: positions
/// below the first element resolve to the minimum, positions at or past the last element resolve
/// to the maximum, and anything in between is linearly interpolated between its two neighbours.
pub fn percentile(sorted: &[i64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }

    let size = sorted.len();
    let pos = p * (size + 1) as f64;
    if pos < 1.0 || pos.is_nan() {
        return sorted[0] as f64;
    }
    if pos >= size as f64 {
        return sorted[size - 1] as f64;
    }

    // `pos` is within `[1, size)`, so both neighbours are in bounds.
    let idx = pos as usize;
    let lower = sorted[idx - 1] as f64;
    let upper = sorted[idx] as f64;
    lower + (pos - pos.floor()) * (upper - lower)
}

/// Gets the values at each of the given percentiles.
///
/// `sorted` must be in ascending order.  See [`percentile`] for how each value is computed.
pub fn percentiles(sorted: &[i64], ps: &[f64]) -> Vec<f64> {
    ps.iter().map(|p| percentile(sorted, *p)).collect()
}
