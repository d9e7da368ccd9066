//! The release pipeline.
//!
//! `LoadSecret → ReadVersion → PromptVersion → Validate → UpdateManifest →
//! Build → Upload? → Commit?`
//!
//! Each step returns a [`Result`] and the first error ends the run. Declining the
//! upload is the only path that undoes anything: it restores the manifest.
//! Build artifacts are left in place either way.

mod state;

pub use state::{ReleaseOutcome, ReleaseReport, ReleaseState};

use crate::build::{Artifact, PackageBuilder, PythonBuilder, list_artifacts};
use crate::cli::OutputManager;
use crate::config::ReleaseConfig;
use crate::error::{BuildError, Result};
use crate::git::{SystemGit, VersionControl, commit_version_bump};
use crate::publish::{PackageUploader, TwineUploader};
use crate::prompt::Prompter;
use crate::secret::{UploadToken, load_token};
use crate::version::{Manifest, ManifestEdit, is_downgrade, validate_version};
use std::io::{BufRead, Write};
use std::path::Path;

/// Drives one release of the project in `project_dir`
pub struct ReleaseWorkflow<'a, B, U, V> {
    project_dir: &'a Path,
    config: &'a ReleaseConfig,
    output: &'a OutputManager,
    builder: B,
    uploader: U,
    vcs: V,
}

impl<'a> ReleaseWorkflow<'a, PythonBuilder, TwineUploader, SystemGit> {
    /// Workflow using `python -m build`, `twine` and the system `git`
    pub fn for_project(
        project_dir: &'a Path,
        config: &'a ReleaseConfig,
        output: &'a OutputManager,
    ) -> Self {
        Self::new(
            project_dir,
            config,
            output,
            PythonBuilder::new(project_dir, config),
            TwineUploader::new(project_dir, config),
            SystemGit::new(project_dir),
        )
    }
}

impl<'a, B, U, V> ReleaseWorkflow<'a, B, U, V>
where
    B: PackageBuilder,
    U: PackageUploader,
    V: VersionControl,
{
    /// Workflow with explicit collaborators
    pub fn new(
        project_dir: &'a Path,
        config: &'a ReleaseConfig,
        output: &'a OutputManager,
        builder: B,
        uploader: U,
        vcs: V,
    ) -> Self {
        Self {
            project_dir,
            config,
            output,
            builder,
            uploader,
            vcs,
        }
    }

    /// Run the release, prompting through `prompter`
    pub async fn run<R: BufRead, W: Write>(
        &self,
        prompter: &mut Prompter<R, W>,
    ) -> Result<ReleaseReport> {
        let token = self.load_secret()?;
        let manifest = self.read_version()?;

        let new_version = prompter.ask_version(manifest.version())?;
        self.validate(manifest.version(), &new_version)?;

        let mut state = ReleaseState {
            current_version: manifest.version().to_string(),
            new_version,
            manifest_path: manifest.path().to_path_buf(),
            confirmed: false,
        };

        let edit = self.update_manifest(&manifest, &state)?;
        let artifacts = self.build().await?;

        state.confirmed =
            prompter.confirm("Upload these artifacts to the package index?")?;

        let outcome = if state.confirmed {
            self.upload(&artifacts, &token, manifest.package_name()).await?;
            let commit = match &edit {
                Some(edit) => self.commit(prompter, edit).await?,
                None => {
                    self.output.info("Manifest unchanged, nothing to commit");
                    None
                }
            };
            ReleaseOutcome::Published { commit }
        } else {
            ReleaseOutcome::Cancelled {
                reverted: self.cancel(edit)?,
            }
        };

        Ok(ReleaseReport { state, outcome })
    }

    fn load_secret(&self) -> Result<UploadToken> {
        load_token(&self.project_dir.join(&self.config.secret_file))
    }

    fn read_version(&self) -> Result<Manifest> {
        let manifest = Manifest::load(&self.project_dir.join(&self.config.manifest))?;
        log::info!(
            "{} declares version {}",
            manifest.path().display(),
            manifest.version()
        );
        self.output.info(&format!(
            "Current version: {}",
            manifest.version()
        ));
        Ok(manifest)
    }

    fn validate(&self, current: &str, new: &str) -> Result<()> {
        validate_version(new)?;
        if is_downgrade(current, new) {
            self.output.warn(&format!(
                "{} is lower than the current version {}",
                new, current
            ));
        }
        Ok(())
    }

    fn update_manifest(
        &self,
        manifest: &Manifest,
        state: &ReleaseState,
    ) -> Result<Option<ManifestEdit>> {
        let edit = manifest.set_version(&state.new_version)?;
        match &edit {
            Some(_) => self.output.success(&format!(
                "Updated {}: {} → {}",
                self.config.manifest.display(),
                state.current_version,
                state.new_version
            )),
            None => self.output.info(&format!(
                "Keeping version {}",
                state.current_version
            )),
        }
        Ok(edit)
    }

    async fn build(&self) -> Result<Vec<Artifact>> {
        self.output.section("Build");
        self.output.progress("Building package...");
        self.builder.build().await?;

        let artifacts = list_artifacts(self.builder.dist_dir())?;
        if artifacts.is_empty() {
            return Err(BuildError::NoArtifacts {
                dir: self.builder.dist_dir().to_path_buf(),
            }
            .into());
        }

        self.output
            .success(&format!("Built {} artifact(s):", artifacts.len()));
        for artifact in &artifacts {
            self.output.indent(&artifact.summary());
        }
        Ok(artifacts)
    }

    async fn upload(
        &self,
        artifacts: &[Artifact],
        token: &UploadToken,
        package_name: Option<&str>,
    ) -> Result<()> {
        self.output.section("Upload");
        self.output.progress("Uploading...");
        self.uploader.upload(artifacts, token).await?;
        self.output.success("Upload complete");

        if let Some(name) = package_name {
            self.output.println("");
            self.output.println("Install with:");
            self.output.indent(&format!("pip install {}", name));
            self.output.println("Upgrade with:");
            self.output.indent(&format!("pip install --upgrade {}", name));
        }
        Ok(())
    }

    async fn commit<R: BufRead, W: Write>(
        &self,
        prompter: &mut Prompter<R, W>,
        edit: &ManifestEdit,
    ) -> Result<Option<crate::git::CommitSummary>> {
        if !prompter.confirm("Commit and push the version bump?")? {
            self.output.info("Version bump left uncommitted");
            return Ok(None);
        }

        let message = self.config.commit_message_for(edit.new_version());
        let tag = self
            .config
            .tag
            .then(|| format!("v{}", edit.new_version()));

        self.output.section("Git");
        let summary = commit_version_bump(
            &self.vcs,
            &self.config.manifest,
            &message,
            tag.as_deref(),
            self.config.remote.as_deref(),
        )
        .await?;

        self.output.success(&format!("Committed: \"{}\"", summary.message));
        if let Some(tag) = &summary.tag {
            self.output.success(&format!("Tagged: {}", tag));
        }
        self.output.success("Pushed");
        Ok(Some(summary))
    }

    fn cancel(&self, edit: Option<ManifestEdit>) -> Result<bool> {
        let Some(edit) = edit else {
            self.output.warn("Upload cancelled");
            return Ok(false);
        };

        let previous = edit.previous_version().to_string();
        edit.revert()?;
        self.output.warn(&format!(
            "Upload cancelled, {} restored to {}",
            self.config.manifest.display(),
            previous
        ));
        Ok(true)
    }
}
