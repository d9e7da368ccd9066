//! Package building.
//!
//! The build itself is delegated to `python -m build`; this module prepares the
//! tooling, clears stale artifacts, runs the build and inspects its output.

mod artifacts;

pub use artifacts::{Artifact, list_artifacts};

use crate::config::ReleaseConfig;
use crate::error::{BuildError, Result};
use crate::process::ToolCommand;
use crate::python::resolve_python;
use std::future::Future;
use std::path::{Path, PathBuf};

/// Build collaborator
pub trait PackageBuilder {
    /// Produce distributable artifacts in [`PackageBuilder::dist_dir`]
    fn build(&self) -> impl Future<Output = Result<()>>;

    /// Directory the artifacts are written to
    fn dist_dir(&self) -> &Path;
}

/// Builds a setuptools project with the `build` frontend
#[derive(Debug, Clone)]
pub struct PythonBuilder {
    project_dir: PathBuf,
    manifest: PathBuf,
    dist_dir: PathBuf,
    python: Option<PathBuf>,
    install_tooling: bool,
    clean_dist: bool,
    build_command: Option<Vec<String>>,
}

impl PythonBuilder {
    /// Create a builder for the project in `project_dir`
    pub fn new(project_dir: &Path, config: &ReleaseConfig) -> Self {
        Self {
            project_dir: project_dir.to_path_buf(),
            manifest: project_dir.join(&config.manifest),
            dist_dir: project_dir.join(&config.dist_dir),
            python: config.python.clone(),
            install_tooling: config.install_tooling,
            clean_dist: config.clean_dist,
            build_command: config.build_command.clone(),
        }
    }

    fn python(&self) -> Result<PathBuf> {
        resolve_python(self.python.as_deref(), &self.project_dir)
    }

    async fn prepare_tooling(&self) -> Result<()> {
        let cmd = ToolCommand::new(self.python()?, &self.project_dir).args([
            "-m",
            "pip",
            "install",
            "--upgrade",
            "build",
            "twine",
        ]);
        log::info!("Preparing build tooling");
        cmd.run()
            .await
            .map_err(|reason| BuildError::ToolingFailed { reason }.into())
    }

    fn clean(&self) -> Result<()> {
        if !self.dist_dir.is_dir() {
            return Ok(());
        }
        self.check_removable()?;
        log::info!("Removing stale artifacts in {}", self.dist_dir.display());
        std::fs::remove_dir_all(&self.dist_dir)?;
        Ok(())
    }

    /// The resolved dist dir must sit strictly below the project and must not hold the manifest.
    fn check_removable(&self) -> Result<()> {
        let dist = self.dist_dir.canonicalize()?;
        let project = self.project_dir.canonicalize()?;
        let refuse = |reason: &str| -> Result<()> {
            Err(BuildError::UnsafeDistDir {
                dir: dist.clone(),
                reason: reason.to_string(),
            }
            .into())
        };

        if dist == project || !dist.starts_with(&project) {
            return refuse("not a subdirectory of the project");
        }
        if let Ok(manifest) = self.manifest.canonicalize() {
            if manifest.starts_with(&dist) {
                return refuse("it contains the manifest");
            }
        }
        Ok(())
    }

    fn build_command(&self) -> Result<ToolCommand> {
        if let Some(cmd) = self
            .build_command
            .as_deref()
            .and_then(|argv| ToolCommand::from_argv(argv, &self.project_dir))
        {
            return Ok(cmd);
        }
        Ok(ToolCommand::new(self.python()?, &self.project_dir)
            .args(["-m", "build", "--outdir"])
            .arg(&self.dist_dir))
    }
}

impl PackageBuilder for PythonBuilder {
    async fn build(&self) -> Result<()> {
        if self.install_tooling {
            self.prepare_tooling().await?;
        }
        if self.clean_dist {
            self.clean()?;
        }

        let cmd = self.build_command()?;
        cmd.run().await.map_err(|reason| {
            BuildError::CommandFailed {
                command: cmd.display(),
                reason,
            }
            .into()
        })
    }

    fn dist_dir(&self) -> &Path {
        &self.dist_dir
    }
}
