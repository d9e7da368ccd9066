//! Python interpreter discovery.
//!
//! A project-local virtualenv takes precedence over whatever is on `PATH`,
//! which is what activating the environment before a release would achieve.

use crate::error::{ConfigurationError, Result};
use std::path::{Path, PathBuf};

const VENV_DIRS: [&str; 2] = [".venv", "venv"];

#[cfg(windows)]
const VENV_PYTHON: &str = "Scripts/python.exe";
#[cfg(not(windows))]
const VENV_PYTHON: &str = "bin/python";

/// Interpreter inside a project virtualenv, if one exists
pub fn find_virtualenv_python(project_dir: &Path) -> Option<PathBuf> {
    VENV_DIRS
        .iter()
        .map(|dir| project_dir.join(dir).join(VENV_PYTHON))
        .find(|candidate| candidate.is_file())
}

/// Resolve the interpreter: configured path, then virtualenv, then `PATH`
pub fn resolve_python(configured: Option<&Path>, project_dir: &Path) -> Result<PathBuf> {
    if let Some(python) = configured {
        log::debug!("Using configured Python interpreter {}", python.display());
        return Ok(python.to_path_buf());
    }

    if let Some(python) = find_virtualenv_python(project_dir) {
        log::debug!("Using virtualenv interpreter {}", python.display());
        return Ok(python);
    }

    ["python3", "python"]
        .iter()
        .find_map(|name| which::which(name).ok())
        .inspect(|python| log::debug!("Using Python from PATH: {}", python.display()))
        .ok_or_else(|| {
            ConfigurationError::ToolNotFound {
                tool: "python3".to_string(),
            }
            .into()
        })
}
