//! Core data types for group QC classification
//!
//! All values are transient: built during one pipeline run and dropped once
//! the report is written.

use std::fmt;
use std::path::PathBuf;

/// QC tier of a single metric value relative to the population
///
/// Ordered `Fail < Warn < Pass` so that the overall tier of a subject is the
/// minimum over its metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    /// Outside 2σ of the mean (or on a band boundary)
    Fail,
    /// Within 2σ but not within 1σ
    Warn,
    /// Within 1σ of the mean
    Pass,
}

impl Tier {
    /// Numeric report value (0.0 / 0.5 / 1.0)
    pub fn value(self) -> f64 {
        match self {
            Tier::Fail => 0.0,
            Tier::Warn => 0.5,
            Tier::Pass => 1.0,
        }
    }

    /// Report cell text
    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Fail => "0.0",
            Tier::Warn => "0.5",
            Tier::Pass => "1.0",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metric columns carried into the report, in column order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    MotionAbs,
    MotionRel,
    SnrB0,
    CnrB1000,
    CnrB2000,
    OutliersTot,
}

/// Number of metric columns in a [`MetricMatrix`]
pub const METRIC_COUNT: usize = 6;

impl Metric {
    /// All metrics in column order
    pub const ALL: [Metric; METRIC_COUNT] = [
        Metric::MotionAbs,
        Metric::MotionRel,
        Metric::SnrB0,
        Metric::CnrB1000,
        Metric::CnrB2000,
        Metric::OutliersTot,
    ];

    /// Column index within a row
    pub fn index(self) -> usize {
        self as usize
    }

    /// Metric column name
    pub fn name(self) -> &'static str {
        match self {
            Metric::MotionAbs => "qc_motion_abs",
            Metric::MotionRel => "qc_motion_rel",
            Metric::SnrB0 => "qc_snr_b0",
            Metric::CnrB1000 => "qc_cnr_b1000",
            Metric::CnrB2000 => "qc_cnr_b2000",
            Metric::OutliersTot => "qc_outliers_tot",
        }
    }

    /// Tier column name in the final report
    pub fn report_column(self) -> &'static str {
        match self {
            Metric::MotionAbs => "qc_motion_abs_pass_fail",
            Metric::MotionRel => "qc_motion_rel_pass_fail",
            Metric::SnrB0 => "qc_snr_b0_pass_fail",
            Metric::CnrB1000 => "qc_cnr_b1000_pass_fail",
            Metric::CnrB2000 => "qc_cnr_b2000_pass_fail",
            Metric::OutliersTot => "qc_outliers_tot_pass_fail",
        }
    }
}

/// Subject/session identity derived from a QC folder path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubjectSessionKey {
    /// e.g. `sub-01`
    pub participant_id: String,
    /// e.g. `ses-01`
    pub session_id: String,
}

/// A discovered per-subject QC folder with its identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectFolder {
    pub key: SubjectSessionKey,
    /// `<root>/sub-*/ses-<session>/qc/quad`
    pub path: PathBuf,
}

/// Per-subject values exactly as reported by the aggregator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawMetricRecord {
    /// `(abs, rel)`
    pub motion: [f64; 2],
    /// `(snr_b0, cnr_b1000, cnr_b2000)`
    pub cnr: [f64; 3],
    /// `(total, b1000, b2000, phase-encoding)`
    pub outliers: [f64; 4],
}

/// Subjects × metrics table, rows in aggregator order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricMatrix {
    rows: Vec<[f64; METRIC_COUNT]>,
}

impl MetricMatrix {
    pub fn from_rows(rows: Vec<[f64; METRIC_COUNT]>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[[f64; METRIC_COUNT]] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of one metric across all subjects, in row order
    pub fn column(&self, metric: Metric) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().map(move |row| row[metric.index()])
    }
}

/// Tier per (subject, metric), same shape and row order as [`MetricMatrix`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassificationMatrix {
    rows: Vec<[Tier; METRIC_COUNT]>,
}

impl ClassificationMatrix {
    pub fn from_rows(rows: Vec<[Tier; METRIC_COUNT]>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[[Tier; METRIC_COUNT]] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, row: usize, metric: Metric) -> Option<Tier> {
        self.rows.get(row).map(|r| r[metric.index()])
    }

    /// Worst tier of each row
    pub fn overall(&self) -> Vec<Tier> {
        self.rows.iter().map(|row| overall_tier(row)).collect()
    }
}

/// Worst tier wins
pub fn overall_tier(tiers: &[Tier; METRIC_COUNT]) -> Tier {
    tiers.iter().copied().min().unwrap_or(Tier::Fail)
}

/// One line of the final report
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub participant_id: String,
    pub session_id: String,
    /// Minimum of `tiers`
    pub qc_all_pass_fail: Tier,
    /// Per-metric tiers in [`Metric::ALL`] order
    pub tiers: [Tier; METRIC_COUNT],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_ordering_and_values() {
        assert!(Tier::Fail < Tier::Warn);
        assert!(Tier::Warn < Tier::Pass);
        assert_eq!(Tier::Fail.value(), 0.0);
        assert_eq!(Tier::Warn.value(), 0.5);
        assert_eq!(Tier::Pass.value(), 1.0);
        assert_eq!(Tier::Warn.to_string(), "0.5");
    }

    #[test]
    fn test_overall_tier_is_minimum() {
        let mut tiers = [Tier::Pass; METRIC_COUNT];
        assert_eq!(overall_tier(&tiers), Tier::Pass);
        tiers[3] = Tier::Warn;
        assert_eq!(overall_tier(&tiers), Tier::Warn);
        tiers[5] = Tier::Fail;
        assert_eq!(overall_tier(&tiers), Tier::Fail);
    }

    #[test]
    fn test_metric_indices_match_column_order() {
        for (i, metric) in Metric::ALL.iter().enumerate() {
            assert_eq!(metric.index(), i);
            assert!(metric.report_column().starts_with(metric.name()));
            assert!(metric.report_column().ends_with("_pass_fail"));
        }
    }

    #[test]
    fn test_metric_matrix_column() {
        let matrix = MetricMatrix::from_rows(vec![
            [1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
            [10.0, 20.0, 30.0, 40.0, 50.0, 60.0],
        ]);
        let snr: Vec<f64> = matrix.column(Metric::SnrB0).collect();
        assert_eq!(snr, vec![3.0, 30.0]);
    }
}
