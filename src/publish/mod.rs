//! Package upload.
//!
//! Uploading is delegated to `twine`. Credentials travel through the child's
//! environment (`TWINE_USERNAME`/`TWINE_PASSWORD`) so they never show up in the
//! process list or in logged command lines.

use crate::build::Artifact;
use crate::config::ReleaseConfig;
use crate::error::{Result, UploadError};
use crate::process::ToolCommand;
use crate::python::resolve_python;
use crate::secret::UploadToken;
use std::future::Future;
use std::path::{Path, PathBuf};

/// Upload collaborator
pub trait PackageUploader {
    /// Publish `artifacts` to the package index
    fn upload(
        &self,
        artifacts: &[Artifact],
        token: &UploadToken,
    ) -> impl Future<Output = Result<()>>;
}

/// Uploads with `python -m twine upload`
#[derive(Debug, Clone)]
pub struct TwineUploader {
    project_dir: PathBuf,
    dist_dir: PathBuf,
    python: Option<PathBuf>,
    username: String,
    repository_url: Option<String>,
    upload_command: Option<Vec<String>>,
}

impl TwineUploader {
    /// Create an uploader for the project in `project_dir`
    pub fn new(project_dir: &Path, config: &ReleaseConfig) -> Self {
        Self {
            project_dir: project_dir.to_path_buf(),
            dist_dir: project_dir.join(&config.dist_dir),
            python: config.python.clone(),
            username: config.username.clone(),
            repository_url: config.repository_url.clone(),
            upload_command: config.upload_command.clone(),
        }
    }

    fn command(&self, artifacts: &[Artifact], token: &UploadToken) -> Result<ToolCommand> {
        let base = match self
            .upload_command
            .as_deref()
            .and_then(|argv| ToolCommand::from_argv(argv, &self.project_dir))
        {
            Some(cmd) => cmd,
            None => {
                let python = resolve_python(self.python.as_deref(), &self.project_dir)?;
                let mut cmd = ToolCommand::new(python, &self.project_dir)
                    .args(["-m", "twine", "upload", "--non-interactive"]);
                if let Some(url) = &self.repository_url {
                    cmd = cmd.arg("--repository-url").arg(url);
                }
                cmd
            }
        };

        Ok(base
            .args(artifacts.iter().map(|artifact| artifact.path.as_os_str()))
            .env("TWINE_USERNAME", &self.username)
            .secret_env("TWINE_PASSWORD", token.expose()))
    }
}

impl PackageUploader for TwineUploader {
    async fn upload(&self, artifacts: &[Artifact], token: &UploadToken) -> Result<()> {
        if artifacts.is_empty() {
            return Err(UploadError::NoArtifacts {
                dir: self.dist_dir.clone(),
            }
            .into());
        }

        let cmd = self.command(artifacts, token)?;
        log::info!("Uploading {} artifact(s)", artifacts.len());
        cmd.run().await.map_err(|reason| {
            UploadError::CommandFailed {
                command: cmd.display(),
                reason,
            }
            .into()
        })
    }
}
