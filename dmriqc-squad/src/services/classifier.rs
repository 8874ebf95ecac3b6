//! Population-relative tier classification
//!
//! Each metric column is classified independently against its own mean μ
//! and population standard deviation σ (denominator N):
//!
//! - `|v - μ| < σ`  → pass
//! - `|v - μ| < 2σ` → warn
//! - otherwise      → fail
//!
//! Comparisons are strict. A value sitting exactly on a band edge falls to
//! the lower tier, and a column with σ = 0 (one subject, or all values
//! equal) classifies every subject as fail. Missing (NaN) values are left
//! out of μ and σ and always fail; the rest of the column is graded against
//! the statistics of the present values.

use crate::types::{ClassificationMatrix, Metric, MetricMatrix, Tier, METRIC_COUNT};

/// Population statistics and tier counts of one metric column
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnStats {
    pub metric: Metric,
    pub mean: f64,
    /// Population standard deviation
    pub std_dev: f64,
    pub pass: usize,
    pub warn: usize,
    pub fail: usize,
}

/// Classification result with the statistics it was derived from
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    /// Same shape and row order as the input matrix
    pub tiers: ClassificationMatrix,
    /// One entry per metric, in column order
    pub stats: Vec<ColumnStats>,
}

/// Mean and population standard deviation of `values`
///
/// NaN entries are skipped and N counts the remaining values. No remaining
/// values gives NaN for both. A column of identical values has σ = 0
/// exactly, whatever rounding the summation would introduce.
pub fn population_stats(values: &[f64]) -> (f64, f64) {
    let present: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();

    if let Some(&first) = present.first() {
        if present.iter().all(|v| *v == first) {
            return (first, 0.0);
        }
    }

    let n = present.len() as f64;
    let mean = present.iter().sum::<f64>() / n;
    let variance = present.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

/// Tier of a single value
pub fn classify_value(value: f64, mean: f64, std_dev: f64) -> Tier {
    let deviation = (value - mean).abs();

    // Widest band first, narrower band overrides
    let mut tier = Tier::Fail;
    if deviation < 2.0 * std_dev {
        tier = Tier::Warn;
    }
    if deviation < std_dev {
        tier = Tier::Pass;
    }
    tier
}

/// Classify every (subject, metric) cell
pub fn classify(matrix: &MetricMatrix) -> Classification {
    let mut rows = vec![[Tier::Fail; METRIC_COUNT]; matrix.len()];
    let mut stats = Vec::with_capacity(METRIC_COUNT);

    for metric in Metric::ALL {
        let column: Vec<f64> = matrix.column(metric).collect();
        let (mean, std_dev) = population_stats(&column);

        let mut column_stats = ColumnStats {
            metric,
            mean,
            std_dev,
            pass: 0,
            warn: 0,
            fail: 0,
        };

        for (row, value) in rows.iter_mut().zip(&column) {
            let tier = classify_value(*value, mean, std_dev);
            row[metric.index()] = tier;
            match tier {
                Tier::Pass => column_stats.pass += 1,
                Tier::Warn => column_stats.warn += 1,
                Tier::Fail => column_stats.fail += 1,
            }
        }

        if std_dev == 0.0 && !column.is_empty() {
            tracing::warn!(
                metric = metric.name(),
                "Zero spread across subjects; every subject fails this metric"
            );
        }
        tracing::info!(
            metric = metric.name(),
            mean,
            std_dev,
            pass = column_stats.pass,
            warn = column_stats.warn,
            fail = column_stats.fail,
            "Metric classified"
        );
        stats.push(column_stats);
    }

    Classification {
        tiers: ClassificationMatrix::from_rows(rows),
        stats,
    }
}
