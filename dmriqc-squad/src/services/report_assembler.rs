//! Report row assembly
//!
//! Row `i` of the classification belongs to discovered folder `i`: the
//! aggregator is assumed to emit subjects in manifest order. That coupling
//! is checked for count only; it is never repaired by re-sorting.

use crate::error::{PipelineError, PipelineResult};
use crate::types::{overall_tier, ClassificationMatrix, ReportRow, SubjectFolder};

/// Join identities with tiers and sort by participant id
pub fn assemble_report(
    subjects: &[SubjectFolder],
    tiers: &ClassificationMatrix,
) -> PipelineResult<Vec<ReportRow>> {
    if subjects.len() != tiers.len() {
        return Err(PipelineError::SubjectCountMismatch {
            discovered: subjects.len(),
            aggregated: tiers.len(),
        });
    }

    let mut rows: Vec<ReportRow> = subjects
        .iter()
        .zip(tiers.rows())
        .map(|(subject, row)| ReportRow {
            participant_id: subject.key.participant_id.clone(),
            session_id: subject.key.session_id.clone(),
            qc_all_pass_fail: overall_tier(row),
            tiers: *row,
        })
        .collect();

    sort_rows(&mut rows);
    Ok(rows)
}

/// Ascending lexicographic order on participant id
pub fn sort_rows(rows: &mut [ReportRow]) {
    rows.sort_by(|a, b| a.participant_id.cmp(&b.participant_id));
}
