//! Per-subject QC folder discovery
//!
//! Finds `<root>/sub-*/ses-<session>/qc/quad` folders and attaches the
//! subject/session identity to each one at discovery time.
//!
//! Result order is the file system's enumeration order (not sorted). The
//! manifest and therefore the aggregator's rows follow this order, which is
//! how report rows are matched back to subjects.

use crate::types::{SubjectFolder, SubjectSessionKey};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Subject folder prefix
const SUBJECT_PREFIX: &str = "sub-";

/// Discovers subject QC folders for one session
pub struct FolderDiscovery {
    derivatives: PathBuf,
    session: String,
}

impl FolderDiscovery {
    /// `session` is the bare label, without the `ses-` prefix
    pub fn new(derivatives: impl Into<PathBuf>, session: impl Into<String>) -> Self {
        Self {
            derivatives: derivatives.into(),
            session: session.into(),
        }
    }

    /// `ses-<session>`
    pub fn session_id(&self) -> String {
        format!("ses-{}", self.session)
    }

    /// Trailing path below the subject folder, `/ses-<session>/qc/quad`
    fn quad_suffix(&self) -> String {
        format!("/ses-{}/qc/quad", self.session)
    }

    /// Enumerate subject QC folders
    ///
    /// Zero matches is not an error. An unreadable or missing root yields an
    /// empty list with a warning, same as an unmatched pattern.
    pub fn discover(&self) -> Vec<SubjectFolder> {
        let walker = WalkDir::new(&self.derivatives)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
            .into_iter();

        let mut folders = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(
                        root = %self.derivatives.display(),
                        "Error accessing entry: {}",
                        e
                    );
                    continue;
                }
            };

            if !entry.file_name().to_string_lossy().starts_with(SUBJECT_PREFIX) {
                continue;
            }

            let quad = entry
                .path()
                .join(self.session_id())
                .join("qc")
                .join("quad");
            if !quad.exists() {
                continue;
            }

            let key = self.derive_key(&quad);
            tracing::debug!(
                participant_id = %key.participant_id,
                path = %quad.display(),
                "Discovered QC folder"
            );
            folders.push(SubjectFolder { key, path: quad });
        }

        if folders.is_empty() {
            tracing::warn!(
                root = %self.derivatives.display(),
                session = %self.session_id(),
                "No sub-*/{}/qc/quad folders found",
                self.session_id()
            );
        } else {
            tracing::info!(count = folders.len(), "Subject QC folders discovered");
        }

        folders
    }

    /// Identity of a QC folder path
    ///
    /// Strips the derivatives root and the `/ses-<session>/qc/quad` suffix.
    /// Either part that does not match is left in place, so a foreign path
    /// keeps its full text as participant id.
    pub fn derive_key(&self, path: &Path) -> SubjectSessionKey {
        let relative = path.strip_prefix(&self.derivatives).unwrap_or(path);
        let text = relative.to_string_lossy();
        let suffix = self.quad_suffix();
        let participant_id = text.strip_suffix(suffix.as_str()).unwrap_or(&*text);

        SubjectSessionKey {
            participant_id: participant_id.to_string(),
            session_id: self.session_id(),
        }
    }
}
