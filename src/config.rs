//! Release configuration.
//!
//! Values come from three layers, later ones winning:
//! built-in defaults, an optional `release.toml` in the project directory
//! (or the file named by `PYPI_RELEASE_CONFIG`), and `PYPI_RELEASE_*`
//! environment variables.

use crate::error::{ConfigurationError, Result};
use serde::Deserialize;
use std::path::{Component, Path, PathBuf};

/// Default configuration file name, looked up in the project directory
pub const CONFIG_FILE_NAME: &str = "release.toml";

/// Username sentinel the package index expects for API-token uploads
pub const TOKEN_USERNAME: &str = "__token__";

/// Environment variable naming an alternative configuration file
pub const ENV_CONFIG: &str = "PYPI_RELEASE_CONFIG";
/// Environment override for the manifest path
pub const ENV_MANIFEST: &str = "PYPI_RELEASE_MANIFEST";
/// Environment override for the secret file path
pub const ENV_SECRET_FILE: &str = "PYPI_RELEASE_SECRET_FILE";
/// Environment override for the distribution directory
pub const ENV_DIST_DIR: &str = "PYPI_RELEASE_DIST_DIR";
/// Environment override for the Python interpreter
pub const ENV_PYTHON: &str = "PYPI_RELEASE_PYTHON";

/// Configuration for release operations
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReleaseConfig {
    /// File declaring the package version, relative to the project directory
    pub manifest: PathBuf,
    /// File holding the upload token, relative to the project directory
    pub secret_file: PathBuf,
    /// Directory the build writes artifacts into
    pub dist_dir: PathBuf,
    /// Python interpreter; auto-detected when unset
    pub python: Option<PathBuf>,
    /// Username passed to the upload tool
    pub username: String,
    /// Alternative package index upload URL
    pub repository_url: Option<String>,
    /// Upgrade `build` and `twine` before building
    pub install_tooling: bool,
    /// Remove the distribution directory before building
    pub clean_dist: bool,
    /// Replaces `python -m build`
    pub build_command: Option<Vec<String>>,
    /// Replaces `python -m twine upload`; artifact paths are appended
    pub upload_command: Option<Vec<String>>,
    /// Commit message, `{version}` is substituted
    pub commit_message: String,
    /// Remote to push to; git's upstream when unset
    pub remote: Option<String>,
    /// Create and push a `v<version>` tag
    pub tag: bool,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            manifest: PathBuf::from("setup.py"),
            secret_file: PathBuf::from(".pypi_token"),
            dist_dir: PathBuf::from("dist"),
            python: None,
            username: TOKEN_USERNAME.to_string(),
            repository_url: None,
            install_tooling: true,
            clean_dist: true,
            build_command: None,
            upload_command: None,
            commit_message: "Bump version to {version}".to_string(),
            remote: None,
            tag: false,
        }
    }
}

impl ReleaseConfig {
    /// Load configuration for a project directory from file and process environment
    pub fn load(project_dir: &Path) -> Result<Self> {
        Self::load_with_env(project_dir, |key| std::env::var(key).ok())
    }

    /// Load configuration using `env` as the environment lookup
    pub fn load_with_env<F>(project_dir: &Path, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let (path, explicit) = match env(ENV_CONFIG) {
            Some(path) => (project_dir.join(path), true),
            None => (project_dir.join(CONFIG_FILE_NAME), false),
        };

        let mut config = if path.is_file() {
            log::debug!("Loading configuration from {}", path.display());
            Self::from_file(&path)?
        } else if explicit {
            return Err(ConfigurationError::InvalidConfigFile {
                path,
                reason: "file does not exist".to_string(),
            }
            .into());
        } else {
            Self::default()
        };

        config.apply_env(env);
        config.check_dist_dir()?;
        Ok(config)
    }

    /// Parse a `release.toml` file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigurationError::InvalidConfigFile {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| {
            ConfigurationError::InvalidConfigFile {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        })?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        for (key, command) in [
            ("build_command", &self.build_command),
            ("upload_command", &self.upload_command),
        ] {
            if matches!(command, Some(argv) if argv.is_empty()) {
                return Err(ConfigurationError::InvalidConfigFile {
                    path: path.to_path_buf(),
                    reason: format!("'{}' must name a program", key),
                }
                .into());
            }
        }
        Ok(())
    }

    /// The distribution directory is wiped before each build, so it must be a
    /// relative subdirectory that does not hold the manifest.
    fn check_dist_dir(&self) -> Result<()> {
        let invalid = |reason: &str| -> Result<()> {
            Err(ConfigurationError::InvalidDistDir {
                path: self.dist_dir.clone(),
                reason: reason.to_string(),
            }
            .into())
        };

        let dist = match normal_relative(&self.dist_dir) {
            Some(dist) if dist.as_os_str().is_empty() => {
                return invalid("must name a subdirectory of the project");
            }
            Some(dist) => dist,
            None => return invalid("must be a relative path inside the project"),
        };

        let manifest = normal_relative(&self.manifest).unwrap_or_else(|| self.manifest.clone());
        if manifest.starts_with(&dist) {
            return invalid("contains the manifest");
        }
        Ok(())
    }

    fn apply_env<F>(&mut self, env: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = env(ENV_MANIFEST) {
            self.manifest = PathBuf::from(value);
        }
        if let Some(value) = env(ENV_SECRET_FILE) {
            self.secret_file = PathBuf::from(value);
        }
        if let Some(value) = env(ENV_DIST_DIR) {
            self.dist_dir = PathBuf::from(value);
        }
        if let Some(value) = env(ENV_PYTHON) {
            self.python = Some(PathBuf::from(value));
        }
    }

    /// Commit message for a version
    pub fn commit_message_for(&self, version: &str) -> String {
        self.commit_message.replace("{version}", version)
    }
}

/// `path` without `.` components, or `None` if it is absolute or climbs out with `..`
fn normal_relative(path: &Path) -> Option<PathBuf> {
    let mut normal = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => normal.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(normal)
}
