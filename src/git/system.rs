//! [`VersionControl`] backed by the system `git` binary.

use super::VersionControl;
use crate::error::{Result, VcsError};
use crate::process::ToolCommand;
use std::path::{Path, PathBuf};

/// Runs `git` in the project directory
///
/// The executable is looked up on first use, so a missing git only matters
/// once a commit is actually requested.
#[derive(Debug, Clone)]
pub struct SystemGit {
    git: Option<PathBuf>,
    work_dir: PathBuf,
}

impl SystemGit {
    /// Use whichever `git` is on `PATH`
    pub fn new(work_dir: &Path) -> Self {
        Self {
            git: None,
            work_dir: work_dir.to_path_buf(),
        }
    }

    /// Use a specific git executable
    pub fn with_binary(git: PathBuf, work_dir: &Path) -> Self {
        Self {
            git: Some(git),
            work_dir: work_dir.to_path_buf(),
        }
    }

    fn git_cmd(&self) -> Result<ToolCommand> {
        let git = match &self.git {
            Some(git) => git.clone(),
            None => which::which("git").map_err(|_| VcsError::GitNotFound)?,
        };
        Ok(ToolCommand::new(git, &self.work_dir))
    }
}

impl VersionControl for SystemGit {
    async fn stage(&self, path: &Path) -> Result<()> {
        self.git_cmd()?
            .args(["add", "--"])
            .arg(path)
            .run()
            .await
            .map_err(|reason| VcsError::StageFailed { reason }.into())
    }

    async fn commit(&self, message: &str) -> Result<()> {
        self.git_cmd()?
            .args(["commit", "-m", message])
            .run()
            .await
            .map_err(|reason| VcsError::CommitFailed { reason }.into())
    }

    async fn tag(&self, name: &str) -> Result<()> {
        self.git_cmd()?
            .args(["tag", "-a", name, "-m", name])
            .run()
            .await
            .map_err(|reason| {
                VcsError::TagFailed {
                    tag: name.to_string(),
                    reason,
                }
                .into()
            })
    }

    async fn push(&self, remote: Option<&str>, with_tags: bool) -> Result<()> {
        let mut cmd = self.git_cmd()?.arg("push");
        if with_tags {
            cmd = cmd.arg("--follow-tags");
        }
        if let Some(remote) = remote {
            cmd = cmd.arg(remote);
        }
        cmd.run()
            .await
            .map_err(|reason| VcsError::PushFailed { reason }.into())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn init_repo(dir: &Path) {
        for args in [
            vec!["init", "-q"],
            vec!["config", "user.email", "release@example.com"],
            vec!["config", "user.name", "Release Bot"],
            vec!["config", "commit.gpgsign", "false"],
            vec!["config", "tag.gpgsign", "false"],
        ] {
            let status = std::process::Command::new("git")
                .args(&args)
                .current_dir(dir)
                .status()
                .unwrap();
            assert!(status.success());
        }
    }

    fn git_stdout(dir: &Path, args: &[&str]) -> String {
        let output = std::process::Command::new("git")
            .args(args)
            .current_dir(dir)
            .output()
            .unwrap();
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }

    #[tokio::test]
    async fn stage_commit_and_tag() {
        if which::which("git").is_err() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        init_repo(dir.path());
        std::fs::write(dir.path().join("setup.py"), "setup(version=\"1.0.1\")\n").unwrap();

        let git = SystemGit::new(dir.path());
        git.stage(Path::new("setup.py")).await.unwrap();
        git.commit("Bump version to 1.0.1").await.unwrap();
        git.tag("v1.0.1").await.unwrap();

        assert_eq!(
            git_stdout(dir.path(), &["log", "-1", "--format=%s"]),
            "Bump version to 1.0.1"
        );
        assert_eq!(git_stdout(dir.path(), &["tag", "--list"]), "v1.0.1");
    }

    #[tokio::test]
    async fn missing_binary_is_reported_on_use() {
        let dir = tempfile::tempdir().unwrap();
        let git = SystemGit::with_binary(dir.path().join("no-such-git"), dir.path());
        let err = git.commit("msg").await.unwrap_err();
        assert!(matches!(
            err,
            crate::ReleaseError::Vcs(VcsError::CommitFailed { ref reason }) if reason.starts_with("failed to start")
        ));
    }

    #[tokio::test]
    async fn push_without_remote_fails() {
        if which::which("git").is_err() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        init_repo(dir.path());

        let git = SystemGit::new(dir.path());
        let err = git.push(Some("origin"), false).await.unwrap_err();
        assert!(matches!(
            err,
            crate::ReleaseError::Vcs(VcsError::PushFailed { .. })
        ));
    }
}
