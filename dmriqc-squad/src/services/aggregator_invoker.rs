//! External group-QC aggregator invocation
//!
//! Runs `<binary> <manifest> -u -o <output_dir>` and forwards its standard
//! output line by line to the log while it runs. The call blocks until the
//! output stream is exhausted and the process has exited. No timeout.
//!
//! A non-zero exit status is reported in [`AggregatorOutcome`] but is not an
//! error here: a failed run shows up downstream as a missing `group_db.json`.

use crate::error::{PipelineError, PipelineResult};
use std::path::Path;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;

/// Result of one aggregator run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatorOutcome {
    /// `None` if the process was terminated by a signal
    pub exit_code: Option<i32>,
    /// Non-empty, trimmed stdout lines in arrival order
    pub stdout_lines: Vec<String>,
}

impl AggregatorOutcome {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Aggregator process launcher
pub struct AggregatorInvoker {
    binary: String,
}

impl AggregatorInvoker {
    /// `binary` is an executable name looked up in PATH, or a path
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// Run the aggregator in unbiased mode against `manifest`
    ///
    /// Errors only if the process cannot be started or its stdout cannot be
    /// read. Stderr is inherited.
    pub async fn run(&self, manifest: &Path, output_dir: &Path) -> PipelineResult<AggregatorOutcome> {
        tracing::info!(
            binary = %self.binary,
            manifest = %manifest.display(),
            output_dir = %output_dir.display(),
            "Running group QC aggregator"
        );

        let mut child = Command::new(&self.binary)
            .arg(manifest)
            .arg("-u")
            .arg("-o")
            .arg(output_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| {
                let message = if e.kind() == std::io::ErrorKind::NotFound {
                    "binary not found".to_string()
                } else {
                    format!("failed to start: {}", e)
                };
                self.failure(message)
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| self.failure("stdout was not captured".to_string()))?;

        let mut reader = BufReader::new(stdout);
        let mut stdout_lines = Vec::new();
        let mut buf = Vec::new();
        loop {
            buf.clear();
            let read = reader
                .read_until(b'\n', &mut buf)
                .await
                .map_err(|e| self.failure(format!("reading stdout: {}", e)))?;
            if read == 0 {
                break;
            }

            let line = String::from_utf8_lossy(&buf);
            let line = line.trim();
            if !line.is_empty() {
                tracing::info!(target: "aggregator", "{}", line);
                stdout_lines.push(line.to_string());
            }
        }

        let status = child
            .wait()
            .await
            .map_err(|e| self.failure(format!("waiting for exit: {}", e)))?;

        let outcome = AggregatorOutcome {
            exit_code: status.code(),
            stdout_lines,
        };

        if outcome.success() {
            tracing::info!(lines = outcome.stdout_lines.len(), "Aggregator finished");
        } else {
            tracing::warn!(
                exit_code = ?outcome.exit_code,
                "Aggregator exited unsuccessfully; continuing with whatever output it left"
            );
        }

        Ok(outcome)
    }

    fn failure(&self, message: String) -> PipelineError {
        PipelineError::ExternalTool {
            binary: self.binary.clone(),
            message,
        }
    }
}

// Serialized: each test writes a script and execs it while another test's
// spawn could still hold the write descriptor (ETXTBSY).
#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_script(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("fake_aggregator.sh");
        fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[tokio::test]
    #[serial]
    async fn test_forwards_stdout_and_passes_fixed_flags() {
        let temp_dir = TempDir::new().unwrap();
        let script = write_script(
            temp_dir.path(),
            "echo \"manifest=$1\"\necho\necho \"  flags=$2 $3  \"\necho \"out=$4\"",
        );
        let manifest = temp_dir.path().join("squad_list.txt");
        let out_dir = temp_dir.path().join("tmp");

        let invoker = AggregatorInvoker::new(script.to_string_lossy());
        let outcome = invoker.run(&manifest, &out_dir).await.unwrap();

        assert!(outcome.success());
        assert_eq!(
            outcome.stdout_lines,
            vec![
                format!("manifest={}", manifest.display()),
                "flags=-u -o".to_string(),
                format!("out={}", out_dir.display()),
            ]
        );
    }

    #[tokio::test]
    #[serial]
    async fn test_nonzero_exit_is_not_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let script = write_script(temp_dir.path(), "echo failing\nexit 3");

        let invoker = AggregatorInvoker::new(script.to_string_lossy());
        let outcome = invoker
            .run(&temp_dir.path().join("m.txt"), &temp_dir.path().join("o"))
            .await
            .unwrap();

        assert!(!outcome.success());
        assert_eq!(outcome.exit_code, Some(3));
        assert_eq!(outcome.stdout_lines, vec!["failing".to_string()]);
    }

    #[tokio::test]
    #[serial]
    async fn test_missing_binary_is_external_tool_error() {
        let temp_dir = TempDir::new().unwrap();
        let invoker = AggregatorInvoker::new(
            temp_dir.path().join("no_such_aggregator").to_string_lossy(),
        );

        let result = invoker
            .run(&temp_dir.path().join("m.txt"), &temp_dir.path().join("o"))
            .await;

        assert!(matches!(result, Err(PipelineError::ExternalTool { .. })));
    }
}
