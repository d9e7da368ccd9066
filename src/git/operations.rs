//! Git operations needed to record a version bump.

use crate::error::Result;
use std::future::Future;
use std::path::Path;

/// Version-control collaborator
pub trait VersionControl {
    /// Stage a single file
    fn stage(&self, path: &Path) -> impl Future<Output = Result<()>>;

    /// Commit staged changes
    fn commit(&self, message: &str) -> impl Future<Output = Result<()>>;

    /// Create an annotated tag at HEAD
    fn tag(&self, name: &str) -> impl Future<Output = Result<()>>;

    /// Push the current branch, plus annotated tags reachable from it when `with_tags` is set
    fn push(&self, remote: Option<&str>, with_tags: bool) -> impl Future<Output = Result<()>>;
}

/// What [`commit_version_bump`](super::commit_version_bump) did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitSummary {
    /// Commit message used
    pub message: String,
    /// Tag created, if tagging is enabled
    pub tag: Option<String>,
}
