//! Group output folder layout
//!
//! All artifacts of a run live under `<root>/sub-GRP/ses-<session>/qc/squad`.

use std::path::{Path, PathBuf};

/// Pseudo-participant holding group-level outputs
pub const GROUP_PARTICIPANT: &str = "sub-GRP";

/// Aggregator result file name
pub const GROUP_DB_FILE: &str = "group_db.json";

const MANIFEST_FILE: &str = "squad_list.txt";
const TMP_DIR: &str = "tmp";

/// Paths used by one pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupLayout {
    session: String,
    group_dir: PathBuf,
}

impl GroupLayout {
    /// `session` is the bare label, without the `ses-` prefix
    pub fn new(derivatives: &Path, session: &str) -> Self {
        let group_dir = derivatives
            .join(GROUP_PARTICIPANT)
            .join(format!("ses-{session}"))
            .join("qc")
            .join("squad");
        Self {
            session: session.to_string(),
            group_dir,
        }
    }

    /// Final report directory
    pub fn group_dir(&self) -> &Path {
        &self.group_dir
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.group_dir.join(MANIFEST_FILE)
    }

    /// Aggregator working directory, relocated after the run
    pub fn tmp_dir(&self) -> PathBuf {
        self.group_dir.join(TMP_DIR)
    }

    pub fn group_db_path(&self) -> PathBuf {
        self.group_dir.join(GROUP_DB_FILE)
    }

    pub fn report_path(&self) -> PathBuf {
        self.group_dir.join(format!(
            "{GROUP_PARTICIPANT}_ses-{}_pipeline_QC_SQUAD.tsv",
            self.session
        ))
    }
}
