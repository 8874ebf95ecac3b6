//! Aggregator manifest file
//!
//! Plain text, one QC folder path per line, newline-joined without a trailing
//! newline. Line order equals discovery order.

use crate::error::{PipelineError, PipelineResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Write `paths` to `manifest`, creating parent directories as needed
pub fn write_manifest(paths: &[PathBuf], manifest: &Path) -> PipelineResult<()> {
    if let Some(parent) = manifest.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| PipelineError::io(parent, e))?;
            tracing::debug!(dir = %parent.display(), "Created manifest directory");
        }
    }

    let content = paths
        .iter()
        .map(|p| p.to_string_lossy())
        .collect::<Vec<_>>()
        .join("\n");

    fs::write(manifest, content).map_err(|e| PipelineError::io(manifest, e))?;

    tracing::info!(
        manifest = %manifest.display(),
        entries = paths.len(),
        "Manifest written"
    );
    Ok(())
}

/// Read a manifest back into its ordered path list
pub fn read_manifest(manifest: &Path) -> PipelineResult<Vec<PathBuf>> {
    let content = fs::read_to_string(manifest).map_err(|e| PipelineError::io(manifest, e))?;
    Ok(content
        .lines()
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_manifest_preserves_order() {
        let temp_dir = TempDir::new().unwrap();
        let manifest = temp_dir.path().join("nested/dir/squad_list.txt");
        let paths = vec![
            PathBuf::from("/data/sub-10/ses-01/qc/quad"),
            PathBuf::from("/data/sub-02/ses-01/qc/quad"),
            PathBuf::from("/data/sub-07/ses-01/qc/quad"),
        ];

        write_manifest(&paths, &manifest).unwrap();

        assert_eq!(read_manifest(&manifest).unwrap(), paths);
        let raw = fs::read_to_string(&manifest).unwrap();
        assert_eq!(raw.lines().count(), 3);
        assert!(!raw.ends_with('\n'));
    }

    #[test]
    fn test_empty_manifest() {
        let temp_dir = TempDir::new().unwrap();
        let manifest = temp_dir.path().join("squad_list.txt");

        write_manifest(&[], &manifest).unwrap();

        assert_eq!(fs::read_to_string(&manifest).unwrap(), "");
        assert!(read_manifest(&manifest).unwrap().is_empty());
    }

    #[test]
    fn test_overwrites_existing_manifest() {
        let temp_dir = TempDir::new().unwrap();
        let manifest = temp_dir.path().join("squad_list.txt");
        fs::write(&manifest, "stale\nlines\nhere").unwrap();

        write_manifest(&[PathBuf::from("/data/sub-01/ses-01/qc/quad")], &manifest).unwrap();

        assert_eq!(
            read_manifest(&manifest).unwrap(),
            vec![PathBuf::from("/data/sub-01/ses-01/qc/quad")]
        );
    }
}
