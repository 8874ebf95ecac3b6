//! Metric matrix construction
//!
//! Motion contributes both values, contrast-to-noise all three, outliers
//! only the total count. Row order is the aggregator's order.

use crate::error::{PipelineError, PipelineResult};
use crate::services::result_loader::GroupResults;
use crate::types::{MetricMatrix, RawMetricRecord, METRIC_COUNT};

/// Zip the three arrays into per-subject records
///
/// All three arrays must have one entry per subject.
pub fn raw_records(results: &GroupResults) -> PipelineResult<Vec<RawMetricRecord>> {
    let (motion, cnr, outliers) = (
        results.motion.len(),
        results.cnr.len(),
        results.outliers.len(),
    );
    if motion != cnr || motion != outliers {
        return Err(PipelineError::ShapeMismatch {
            motion,
            cnr,
            outliers,
        });
    }

    Ok(results
        .motion
        .iter()
        .zip(&results.cnr)
        .zip(&results.outliers)
        .map(|((motion, cnr), outliers)| RawMetricRecord {
            motion: *motion,
            cnr: *cnr,
            outliers: *outliers,
        })
        .collect())
}

/// Report columns of one record
pub fn metric_row(record: &RawMetricRecord) -> [f64; METRIC_COUNT] {
    [
        record.motion[0],
        record.motion[1],
        record.cnr[0],
        record.cnr[1],
        record.cnr[2],
        record.outliers[0],
    ]
}

/// Build the subjects × metrics matrix
pub fn build_metric_matrix(results: &GroupResults) -> PipelineResult<MetricMatrix> {
    let rows = raw_records(results)?.iter().map(metric_row).collect();
    Ok(MetricMatrix::from_rows(rows))
}
