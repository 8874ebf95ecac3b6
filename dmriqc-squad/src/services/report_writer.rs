//! Tab-separated report output
//!
//! Header row, no index column. Text fields containing a tab, newline or
//! double quote are quoted with doubled inner quotes.

use crate::error::{PipelineError, PipelineResult};
use crate::types::{Metric, ReportRow};
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Report header, in column order
pub fn header() -> Vec<&'static str> {
    let mut columns = vec!["participant_id", "session_id", "qc_all_pass_fail"];
    columns.extend(Metric::ALL.iter().map(|m| m.report_column()));
    columns
}

fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains(&['\t', '\n', '\r', '"'][..]) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// Write the report to any sink
pub fn write_report_to<W: Write>(rows: &[ReportRow], mut out: W) -> std::io::Result<()> {
    writeln!(out, "{}", header().join("\t"))?;

    for row in rows {
        write!(
            out,
            "{}\t{}\t{}",
            escape_field(&row.participant_id),
            escape_field(&row.session_id),
            row.qc_all_pass_fail
        )?;
        for tier in &row.tiers {
            write!(out, "\t{}", tier)?;
        }
        writeln!(out)?;
    }

    out.flush()
}

/// Write the report file, replacing any previous one
pub fn write_report(rows: &[ReportRow], path: &Path) -> PipelineResult<()> {
    let file = File::create(path).map_err(|e| PipelineError::io(path, e))?;
    write_report_to(rows, BufWriter::new(file)).map_err(|e| PipelineError::io(path, e))?;

    tracing::info!(report = %path.display(), rows = rows.len(), "Report written");
    Ok(())
}
