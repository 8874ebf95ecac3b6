//! Group QC pipeline orchestration
//!
//! Runs the stages strictly in order, each consuming the previous stage's
//! output:
//!
//! discovery → manifest → aggregator → relocation → result loading →
//! metric matrix → classification → report assembly → report file
//!
//! Any stage error aborts the run before the report is written.

use crate::error::PipelineResult;
use crate::layout::GroupLayout;
use crate::services::classifier::{classify, ColumnStats};
use crate::services::folder_discovery::FolderDiscovery;
use crate::services::manifest_writer::write_manifest;
use crate::services::metric_frame::build_metric_matrix;
use crate::services::output_relocator::relocate_outputs;
use crate::services::report_assembler::assemble_report;
use crate::services::report_writer::write_report;
use crate::services::result_loader::load_group_db;
use crate::services::{AggregatorInvoker, AggregatorOutcome};
use crate::types::ReportRow;
use dmriqc_common::Error;
use std::path::PathBuf;

/// Inputs of one run
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Study derivatives root
    pub derivatives: PathBuf,
    /// Session label without the `ses-` prefix
    pub session: String,
    /// Aggregator executable
    pub aggregator_binary: String,
}

/// What a completed run produced
#[derive(Debug, Clone)]
pub struct PipelineSummary {
    pub report_path: PathBuf,
    pub aggregator: AggregatorOutcome,
    pub stats: Vec<ColumnStats>,
    /// Sorted report rows as written
    pub rows: Vec<ReportRow>,
}

/// Run the whole pipeline once
pub async fn run(config: &PipelineConfig) -> PipelineResult<PipelineSummary> {
    if config.session.trim().is_empty() {
        return Err(Error::InvalidInput("session label is empty".to_string()).into());
    }

    let layout = GroupLayout::new(&config.derivatives, &config.session);
    tracing::info!(
        derivatives = %config.derivatives.display(),
        session = %config.session,
        group_dir = %layout.group_dir().display(),
        "Starting group QC run"
    );

    let discovery = FolderDiscovery::new(&config.derivatives, &config.session);
    let subjects = discovery.discover();

    let paths: Vec<PathBuf> = subjects.iter().map(|s| s.path.clone()).collect();
    let manifest = layout.manifest_path();
    write_manifest(&paths, &manifest)?;

    let invoker = AggregatorInvoker::new(config.aggregator_binary.clone());
    let aggregator = invoker.run(&manifest, &layout.tmp_dir()).await?;

    relocate_outputs(&layout.tmp_dir(), layout.group_dir())?;

    let results = load_group_db(&layout.group_db_path())?;
    let metrics = build_metric_matrix(&results)?;
    let classification = classify(&metrics);

    let rows = assemble_report(&subjects, &classification.tiers)?;
    let report_path = layout.report_path();
    write_report(&rows, &report_path)?;

    tracing::info!(
        subjects = rows.len(),
        report = %report_path.display(),
        "Group QC run complete"
    );

    Ok(PipelineSummary {
        report_path,
        aggregator,
        stats: classification.stats,
        rows,
    })
}
