//! Release run state and result.

use crate::git::CommitSummary;
use std::path::PathBuf;

/// State of a single release run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseState {
    /// Version declared in the manifest when the run started
    pub current_version: String,
    /// Version being released; validated before any file is written
    pub new_version: String,
    /// Manifest file holding the version
    pub manifest_path: PathBuf,
    /// Whether the user confirmed the upload
    pub confirmed: bool,
}

impl ReleaseState {
    /// Whether the manifest needs rewriting
    pub fn version_changed(&self) -> bool {
        self.current_version != self.new_version
    }
}

/// How a run ended without error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// Artifacts were uploaded
    Published {
        /// Present when the version bump was committed and pushed
        commit: Option<CommitSummary>,
    },
    /// The user declined the upload
    Cancelled {
        /// Whether the manifest edit was undone
        reverted: bool,
    },
}

/// Final state plus outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseReport {
    /// State at the end of the run
    pub state: ReleaseState,
    /// What happened
    pub outcome: ReleaseOutcome,
}
