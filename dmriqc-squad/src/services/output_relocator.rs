//! Aggregator output relocation
//!
//! Moves every entry of the aggregator's working directory into the report
//! directory, then removes the working directory. Entries are moved flat;
//! an existing entry with the same name in the report directory is replaced.
//! Not atomic: an interrupted run can leave a partial relocation behind.

use crate::error::{PipelineError, PipelineResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Move the contents of `tmp_dir` into `final_dir` and delete `tmp_dir`
///
/// Returns the relocated paths in their new location. A missing `tmp_dir`
/// is an error: the aggregator produced nothing.
pub fn relocate_outputs(tmp_dir: &Path, final_dir: &Path) -> PipelineResult<Vec<PathBuf>> {
    let entries = fs::read_dir(tmp_dir).map_err(|e| PipelineError::io(tmp_dir, e))?;

    let mut relocated = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| PipelineError::io(tmp_dir, e))?;
        let source = entry.path();
        let target = final_dir.join(entry.file_name());

        remove_existing(&target)?;
        fs::rename(&source, &target).map_err(|e| PipelineError::io(&source, e))?;

        tracing::debug!(
            from = %source.display(),
            to = %target.display(),
            "Relocated aggregator output"
        );
        relocated.push(target);
    }

    if tmp_dir.is_dir() {
        fs::remove_dir_all(tmp_dir).map_err(|e| PipelineError::io(tmp_dir, e))?;
    }

    tracing::info!(
        count = relocated.len(),
        dir = %final_dir.display(),
        "Aggregator outputs relocated"
    );
    Ok(relocated)
}

fn remove_existing(target: &Path) -> PipelineResult<()> {
    let Ok(metadata) = fs::symlink_metadata(target) else {
        return Ok(());
    };

    tracing::debug!(path = %target.display(), "Replacing existing output");
    if metadata.is_dir() {
        fs::remove_dir_all(target).map_err(|e| PipelineError::io(target, e))
    } else {
        fs::remove_file(target).map_err(|e| PipelineError::io(target, e))
    }
}
