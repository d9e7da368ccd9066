//! Git integration for recording a version bump.
//!
//! Operations shell out to the system `git`, so user configuration such as
//! signing keys, hooks and credential helpers applies unchanged.

mod operations;
mod system;

pub use operations::{CommitSummary, VersionControl};
pub use system::SystemGit;

use crate::error::Result;
use std::path::Path;

/// Stage the manifest, commit, optionally tag, then push
pub async fn commit_version_bump<V: VersionControl>(
    vcs: &V,
    manifest: &Path,
    message: &str,
    tag: Option<&str>,
    remote: Option<&str>,
) -> Result<CommitSummary> {
    vcs.stage(manifest).await?;
    vcs.commit(message).await?;
    if let Some(tag) = tag {
        vcs.tag(tag).await?;
    }
    vcs.push(remote, tag.is_some()).await?;

    Ok(CommitSummary {
        message: message.to_string(),
        tag: tag.map(str::to_string),
    })
}
