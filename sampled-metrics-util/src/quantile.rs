use std::fmt;

/// Quantiles reported for histograms when no explicit set is requested: the median, p75, p95, p99
/// and p999.
pub const DEFAULT_QUANTILES: [f64; 5] = [0.5, 0.75, 0.95, 0.99, 0.999];

/// A quantile paired with a human-friendly label.
///
/// Samples compute percentiles from fractions between 0.0 and 1.0, but reporters almost always
/// present them in abbreviated percentile form.  A quantile of `0.99` is labelled `p99`, and a
/// quantile of `0.999` is labelled `p999`.  The two ends of the range are labelled `min` and `max`.
#[derive(Debug, Clone, PartialEq)]
pub struct Quantile {
    value: f64,
    label: String,
}

impl Quantile {
    /// Creates a new [`Quantile`], clamping `quantile` to the range 0.0 to 1.0.
    pub fn new(quantile: f64) -> Quantile {
        let value = if quantile.is_nan() { 0.0 } else { quantile.clamp(0.0, 1.0) };
        Quantile { value, label: label_for(value) }
    }

    /// Gets the human-friendly label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Gets the raw quantile value.
    pub fn value(&self) -> f64 {
        self.value
    }
}

impl fmt::Display for Quantile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

fn label_for(value: f64) -> String {
    if value == 0.0 {
        return "min".to_owned();
    }
    if value == 1.0 {
        return "max".to_owned();
    }

    let percent = format!("{}", value * 100.0);
    format!("p{}", percent.replace('.', ""))
}

/// Parses a slice of fractions into [`Quantile`]s.
pub fn parse_quantiles(quantiles: &[f64]) -> Vec<Quantile> {
    quantiles.iter().copied().map(Quantile::new).collect()
}

/// Gets the [`DEFAULT_QUANTILES`] as labelled [`Quantile`]s.
pub fn default_quantiles() -> Vec<Quantile> {
    parse_quantiles(&DEFAULT_QUANTILES)
}

#[cfg(test)]
mod tests {
    use super::{default_quantiles, parse_quantiles, Quantile};

    #[test]
    fn test_labels() {
        let cases = [
            (0.0, 0.0, "min"),
            (1.0, 1.0, "max"),
            (0.5, 0.5, "p50"),
            (0.75, 0.75, "p75"),
            (0.99, 0.99, "p99"),
            (0.999, 0.999, "p999"),
            (-1.0, 0.0, "min"),
            (1.2, 1.0, "max"),
            (f64::NAN, 0.0, "min"),
        ];

        for (input, value, label) in cases {
            let quantile = Quantile::new(input);
            assert_eq!(quantile.value(), value);
            assert_eq!(quantile.label(), label);
            assert_eq!(quantile.to_string(), label);
        }
    }

    #[test]
    fn test_default_quantiles() {
        let labels: Vec<_> = default_quantiles().iter().map(|q| q.label().to_owned()).collect();
        assert_eq!(labels, vec!["p50", "p75", "p95", "p99", "p999"]);
    }

    #[test]
    fn test_parse_quantiles() {
        assert!(parse_quantiles(&[]).is_empty());

        let result = parse_quantiles(&[0.0, 0.5, 1.0]);
        assert_eq!(result, vec![Quantile::new(0.0), Quantile::new(0.5), Quantile::new(1.0)]);
    }
}
