//! Statistics Calculator Module
//! Frequency counts, run totals and box-plot summaries for the dashboard.

use std::collections::HashMap;

/// Overs per side in a one-day international.
pub const OVERS_PER_MATCH: f64 = 50.0;

/// Five-number summary with Tukey whiskers for one box in a box plot.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSummary {
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub lower_whisker: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

impl BoxSummary {
    /// `None` for an empty sample. NaN values are ignored.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let n = sorted.len();
        let mean = sorted.iter().sum::<f64>() / n as f64;
        let q1 = StatsCalculator::percentile(&sorted, 25.0);
        let median = StatsCalculator::percentile(&sorted, 50.0);
        let q3 = StatsCalculator::percentile(&sorted, 75.0);
        let iqr = q3 - q1;
        let low_fence = q1 - 1.5 * iqr;
        let high_fence = q3 + 1.5 * iqr;

        let lower_whisker = sorted
            .iter()
            .copied()
            .find(|&v| v >= low_fence)
            .unwrap_or(q1);
        let upper_whisker = sorted
            .iter()
            .rev()
            .copied()
            .find(|&v| v <= high_fence)
            .unwrap_or(q3);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|&v| v < low_fence || v > high_fence)
            .collect();

        Some(Self {
            count: n,
            mean,
            min: sorted[0],
            q1,
            median,
            q3,
            max: sorted[n - 1],
            lower_whisker,
            upper_whisker,
            outliers,
        })
    }
}

pub struct StatsCalculator;

impl StatsCalculator {
    /// Calculate percentile using linear interpolation (NumPy compatible).
    pub fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }

    /// Occurrences of each present value, most frequent first.
    /// Equal counts keep the order in which values were first seen.
    pub fn value_counts<I, S>(values: I) -> Vec<(String, usize)>
    where
        I: IntoIterator<Item = Option<S>>,
        S: AsRef<str>,
    {
        let mut counts: Vec<(String, usize)> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for value in values.into_iter().flatten() {
            let value = value.as_ref();
            match index.get(value) {
                Some(&i) => counts[i].1 += 1,
                None => {
                    index.insert(value.to_string(), counts.len());
                    counts.push((value.to_string(), 1));
                }
            }
        }

        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts
    }

    /// Most frequent present value, first seen on ties.
    pub fn mode<I, S>(values: I) -> Option<String>
    where
        I: IntoIterator<Item = Option<S>>,
        S: AsRef<str>,
    {
        Self::value_counts(values).into_iter().next().map(|(v, _)| v)
    }

    /// Sum with absent values counted as zero.
    pub fn sum_present(values: &[Option<f64>]) -> f64 {
        values.iter().flatten().sum()
    }

    /// Round to two decimals from the exact binary value, ties to even.
    pub fn round2(value: f64) -> f64 {
        format!("{:.2}", value).parse().unwrap_or(value)
    }

    /// Runs per over across all matches, rounded to two decimals; 0 for no matches.
    pub fn run_rate(total_runs: f64, total_matches: usize) -> f64 {
        if total_matches == 0 {
            return 0.0;
        }
        Self::round2(total_runs / (total_matches as f64 * OVERS_PER_MATCH))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_counts_orders_by_frequency_then_first_seen() {
        let values = vec![
            Some("India"),
            Some("Australia"),
            None,
            Some("Australia"),
            Some("India"),
            Some("Kenya"),
        ];
        assert_eq!(
            StatsCalculator::value_counts(values),
            vec![
                ("India".to_string(), 2),
                ("Australia".to_string(), 2),
                ("Kenya".to_string(), 1),
            ]
        );
    }

    #[test]
    fn mode_of_all_absent_is_none() {
        let values: Vec<Option<&str>> = vec![None, None];
        assert_eq!(StatsCalculator::mode(values), None);
        assert_eq!(StatsCalculator::mode(Vec::<Option<String>>::new()), None);
    }

    #[test]
    fn run_rate_rounds_and_guards_zero_matches() {
        assert_eq!(StatsCalculator::run_rate(630.0, 2), 6.3);
        assert_eq!(StatsCalculator::run_rate(1000.0, 3), 6.67);
        assert_eq!(StatsCalculator::run_rate(0.0, 0), 0.0);
        assert_eq!(StatsCalculator::run_rate(500.0, 0), 0.0);
    }

    #[test]
    fn run_rate_half_cases_round_like_exact_decimal() {
        // 6.125 is exact in binary, so the tie goes to the even digit.
        assert_eq!(StatsCalculator::run_rate(1225.0, 4), 6.12);
        assert_eq!(StatsCalculator::run_rate(1275.0, 4), 6.38);
        // 5.025 is stored slightly above the tie.
        assert_eq!(StatsCalculator::run_rate(1005.0, 4), 5.03);
        assert_eq!(StatsCalculator::round2(2.675), 2.67);
    }

    #[test]
    fn sum_treats_absent_as_zero() {
        assert_eq!(StatsCalculator::sum_present(&[Some(250.0), None, Some(180.0)]), 430.0);
        assert_eq!(StatsCalculator::sum_present(&[]), 0.0);
    }

    #[test]
    fn percentile_interpolates_linearly() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(StatsCalculator::percentile(&sorted, 50.0), 2.5);
        assert_eq!(StatsCalculator::percentile(&sorted, 25.0), 1.75);
        assert_eq!(StatsCalculator::percentile(&[7.0], 90.0), 7.0);
        assert!(StatsCalculator::percentile(&[], 50.0).is_nan());
    }

    #[test]
    fn box_summary_flags_outliers() {
        let summary = BoxSummary::from_values(&[241.0, 250.0, 260.0, 274.0, 291.0, 100.0]).unwrap();
        assert_eq!(summary.count, 6);
        assert_eq!(summary.min, 100.0);
        assert_eq!(summary.max, 291.0);
        assert_eq!(summary.median, 255.0);
        assert_eq!(summary.outliers, vec![100.0]);
        assert_eq!(summary.lower_whisker, 241.0);
        assert_eq!(summary.upper_whisker, 291.0);
    }

    #[test]
    fn box_summary_of_empty_sample_is_none() {
        assert!(BoxSummary::from_values(&[]).is_none());
        assert!(BoxSummary::from_values(&[f64::NAN]).is_none());
    }
}
