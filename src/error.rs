//! Error types for pypi_release operations.
//!
//! Every error is fatal: the workflow stops at the first one and `main` prints it
//! together with the recovery suggestions attached to its variant.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pypi_release operations
pub type Result<T> = std::result::Result<T, ReleaseError>;

/// Main error type for all pypi_release operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    /// Missing or malformed local configuration
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Rejected user input
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Package build failures
    #[error("Build error: {0}")]
    Build(#[from] BuildError),

    /// Package upload failures
    #[error("Upload error: {0}")]
    Upload(#[from] UploadError),

    /// Git operation failures
    #[error("Git error: {0}")]
    Vcs(#[from] VcsError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration errors: everything that must be fixed on disk before a release
#[derive(Error, Debug)]
pub enum ConfigurationError {
    /// Secret file with the upload token does not exist
    #[error("Secret file not found at {path}")]
    MissingSecret {
        /// Expected location of the secret file
        path: PathBuf,
    },

    /// Secret file exists but holds no token
    #[error("Secret file {path} is empty")]
    EmptySecret {
        /// Location of the secret file
        path: PathBuf,
    },

    /// Manifest file does not exist
    #[error("Manifest not found at {path}")]
    ManifestNotFound {
        /// Expected location of the manifest
        path: PathBuf,
    },

    /// Manifest exists but could not be read as text
    #[error("Cannot read manifest {path}: {reason}")]
    UnreadableManifest {
        /// Location of the manifest
        path: PathBuf,
        /// Reason for the error
        reason: String,
    },

    /// Manifest has no `version="..."` assignment
    #[error("Could not find a version=\"X.Y.Z\" assignment in {path}")]
    VersionNotFound {
        /// Location of the manifest
        path: PathBuf,
    },

    /// release.toml could not be read or parsed
    #[error("Invalid configuration file {path}: {reason}")]
    InvalidConfigFile {
        /// Location of the configuration file
        path: PathBuf,
        /// Reason for the error
        reason: String,
    },

    /// Distribution directory would not be a dedicated subdirectory of the project
    #[error("Invalid distribution directory '{path}': {reason}")]
    InvalidDistDir {
        /// Configured directory
        path: PathBuf,
        /// Reason for the error
        reason: String,
    },

    /// Required executable could not be located
    #[error("Required tool '{tool}' was not found")]
    ToolNotFound {
        /// Tool name
        tool: String,
    },
}

/// Validation errors for interactive input
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Version is not three dot-separated non-negative integers
    #[error("Invalid version '{version}': expected MAJOR.MINOR.PATCH (e.g. 1.2.3)")]
    InvalidVersionFormat {
        /// Rejected input
        version: String,
    },
}

/// Build collaborator errors
#[derive(Error, Debug)]
pub enum BuildError {
    /// Installing or upgrading the packaging tools failed
    #[error("Failed to prepare build tooling: {reason}")]
    ToolingFailed {
        /// Reason for the error
        reason: String,
    },

    /// Refused to clear the distribution directory
    #[error("Refusing to remove {dir}: {reason}")]
    UnsafeDistDir {
        /// Resolved distribution directory
        dir: PathBuf,
        /// Reason for the error
        reason: String,
    },

    /// Build command failed
    #[error("Build command failed: {command} - {reason}")]
    CommandFailed {
        /// Command that failed
        command: String,
        /// Reason for the error
        reason: String,
    },

    /// Build succeeded but produced nothing to upload
    #[error("No build artifacts found in {dir}")]
    NoArtifacts {
        /// Distribution directory
        dir: PathBuf,
    },
}

/// Upload collaborator errors
#[derive(Error, Debug)]
pub enum UploadError {
    /// Nothing to upload
    #[error("No artifacts to upload in {dir}")]
    NoArtifacts {
        /// Distribution directory
        dir: PathBuf,
    },

    /// Upload command failed
    #[error("Upload command failed: {command} - {reason}")]
    CommandFailed {
        /// Command that failed (credentials never included)
        command: String,
        /// Reason for the error
        reason: String,
    },
}

/// Version-control collaborator errors
#[derive(Error, Debug)]
pub enum VcsError {
    /// git is not installed
    #[error("git executable not found on PATH")]
    GitNotFound,

    /// Staging failed
    #[error("git add failed: {reason}")]
    StageFailed {
        /// Reason for the error
        reason: String,
    },

    /// Commit failed
    #[error("git commit failed: {reason}")]
    CommitFailed {
        /// Reason for the error
        reason: String,
    },

    /// Tag creation failed
    #[error("git tag '{tag}' failed: {reason}")]
    TagFailed {
        /// Tag name
        tag: String,
        /// Reason for the error
        reason: String,
    },

    /// Push failed
    #[error("git push failed: {reason}")]
    PushFailed {
        /// Reason for the error
        reason: String,
    },
}

impl ReleaseError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            ReleaseError::Configuration(ConfigurationError::MissingSecret { path })
            | ReleaseError::Configuration(ConfigurationError::EmptySecret { path }) => vec![
                "Create an API token at https://pypi.org/manage/account/token/".to_string(),
                format!("Save it: echo 'pypi-...' > {}", path.display()),
                format!(
                    "Keep it out of version control: echo '{}' >> .gitignore",
                    path.file_name()
                        .map(|name| name.to_string_lossy().into_owned())
                        .unwrap_or_else(|| path.display().to_string())
                ),
            ],
            ReleaseError::Configuration(ConfigurationError::VersionNotFound { .. }) => vec![
                "Declare the version in setup(): version=\"1.0.0\"".to_string(),
            ],
            ReleaseError::Configuration(ConfigurationError::ManifestNotFound { .. }) => vec![
                "Run from the package root or set PYPI_RELEASE_MANIFEST".to_string(),
            ],
            ReleaseError::Configuration(ConfigurationError::InvalidDistDir { .. })
            | ReleaseError::Build(BuildError::UnsafeDistDir { .. }) => vec![
                "Point dist_dir at a subdirectory of the project, e.g. dist_dir = \"dist\""
                    .to_string(),
                "Or keep existing files with clean_dist = false in release.toml".to_string(),
            ],
            ReleaseError::Configuration(ConfigurationError::ToolNotFound { tool }) => vec![
                format!("Install '{}' or add it to PATH", tool),
                "Create a virtualenv in .venv so its interpreter is picked up".to_string(),
                "Or set PYPI_RELEASE_PYTHON to the interpreter path".to_string(),
            ],
            ReleaseError::Validation(ValidationError::InvalidVersionFormat { .. }) => vec![
                "Enter three dot-separated numbers, e.g. 1.4.2".to_string(),
            ],
            ReleaseError::Build(BuildError::ToolingFailed { .. }) => vec![
                "Install manually: python -m pip install --upgrade build twine".to_string(),
                "Or disable the step with install_tooling = false in release.toml".to_string(),
            ],
            ReleaseError::Build(_) => vec![
                "Run 'python -m build' by hand to inspect the failure".to_string(),
                "Revert the manifest with 'git checkout -- setup.py' before retrying".to_string(),
            ],
            ReleaseError::Upload(_) => vec![
                "Verify the token in the secret file is valid and scoped to this project"
                    .to_string(),
                "A version can only be uploaded once; bump it if it already exists".to_string(),
            ],
            ReleaseError::Vcs(VcsError::PushFailed { .. }) => vec![
                "Verify git remote URL: git remote -v".to_string(),
                "Push manually once the issue is resolved: git push".to_string(),
            ],
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }

    /// Whether the failure happened before anything was written to disk.
    ///
    /// Tools are located lazily by the build and upload steps, so a missing
    /// tool is only reported after the manifest was rewritten.
    pub fn is_pre_mutation(&self) -> bool {
        match self {
            ReleaseError::Configuration(ConfigurationError::ToolNotFound { .. }) => false,
            ReleaseError::Configuration(_) | ReleaseError::Validation(_) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_secret_explains_how_to_create_it() {
        let err = ReleaseError::from(ConfigurationError::MissingSecret {
            path: PathBuf::from("/project/.pypi_token"),
        });
        let suggestions = err.recovery_suggestions();
        assert!(suggestions.iter().any(|s| s.contains("/project/.pypi_token")));
        assert!(suggestions.iter().any(|s| s.contains(".gitignore")));
        assert!(err.is_pre_mutation());
    }

    #[test]
    fn missing_tool_is_reported_after_manifest_edit() {
        let err = ReleaseError::from(ConfigurationError::ToolNotFound {
            tool: "python3".to_string(),
        });
        assert!(!err.is_pre_mutation());

        let err = ReleaseError::from(ConfigurationError::InvalidDistDir {
            path: PathBuf::from("."),
            reason: "must name a subdirectory of the project".to_string(),
        });
        assert!(err.is_pre_mutation());
    }

    #[test]
    fn build_error_is_not_pre_mutation() {
        let err = ReleaseError::from(BuildError::NoArtifacts {
            dir: PathBuf::from("dist"),
        });
        assert!(!err.is_pre_mutation());
        assert_eq!(
            err.to_string(),
            "Build error: No build artifacts found in dist"
        );
    }
}
