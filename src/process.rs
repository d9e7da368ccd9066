//! External tool execution.
//!
//! Tools inherit the terminal so their progress output reaches the user as-is;
//! only the exit status is inspected.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;

/// An external command to run in the project directory
#[derive(Debug, Clone)]
pub struct ToolCommand {
    program: OsString,
    args: Vec<OsString>,
    envs: Vec<(String, String)>,
    secret_env: Vec<String>,
    cwd: PathBuf,
}

impl ToolCommand {
    /// Create a command for `program` running in `cwd`
    pub fn new(program: impl Into<OsString>, cwd: &Path) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            envs: Vec::new(),
            secret_env: Vec::new(),
            cwd: cwd.to_path_buf(),
        }
    }

    /// Build a command from a configured argv (`[program, args...]`)
    pub fn from_argv(argv: &[String], cwd: &Path) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self::new(program, cwd).args(args))
    }

    /// Append an argument
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set an environment variable for the child
    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.envs.push((key.to_string(), value.to_string()));
        self
    }

    /// Set an environment variable whose value must never be displayed
    pub fn secret_env(mut self, key: &str, value: &str) -> Self {
        self.secret_env.push(key.to_string());
        self.env(key, value)
    }

    /// Human-readable command line (environment not included)
    pub fn display(&self) -> String {
        std::iter::once(&self.program)
            .chain(self.args.iter())
            .map(|part| part.to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Environment variables set for the child, with secret values masked
    pub fn display_env(&self) -> Vec<String> {
        self.envs
            .iter()
            .map(|(key, value)| {
                if self.secret_env.contains(key) {
                    format!("{}=***", key)
                } else {
                    format!("{}={}", key, value)
                }
            })
            .collect()
    }

    /// Run to completion.
    ///
    /// `Err` carries a one-line reason for a spawn failure or a non-zero exit.
    pub async fn run(&self) -> std::result::Result<(), String> {
        log::debug!(
            "Running `{}` in {} (env: {:?})",
            self.display(),
            self.cwd.display(),
            self.display_env()
        );

        let status = tokio::process::Command::new(&self.program)
            .args(&self.args)
            .envs(self.envs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .current_dir(&self.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| format!("failed to start: {}", e))?;

        if status.success() {
            Ok(())
        } else {
            log::warn!("`{}` exited with {}", self.display(), status);
            Err(match status.code() {
                Some(code) => format!("exited with status {}", code),
                None => "terminated by signal".to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_masks_secret_env() {
        let cmd = ToolCommand::new("twine", Path::new("."))
            .args(["upload", "dist/pkg.tar.gz"])
            .env("TWINE_USERNAME", "__token__")
            .secret_env("TWINE_PASSWORD", "pypi-secret");

        assert_eq!(cmd.display(), "twine upload dist/pkg.tar.gz");
        let env = cmd.display_env();
        assert!(env.contains(&"TWINE_USERNAME=__token__".to_string()));
        assert!(env.contains(&"TWINE_PASSWORD=***".to_string()));
        assert!(!env.iter().any(|e| e.contains("pypi-secret")));
    }

    #[test]
    fn from_argv_splits_program() {
        let argv = vec!["sh".to_string(), "-c".to_string(), "true".to_string()];
        let cmd = ToolCommand::from_argv(&argv, Path::new(".")).unwrap();
        assert_eq!(cmd.display(), "sh -c true");
        assert!(ToolCommand::from_argv(&[], Path::new(".")).is_none());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn run_reports_exit_status() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ToolCommand::new("true", dir.path()).run().await.is_ok());

        let err = ToolCommand::new("sh", dir.path())
            .args(["-c", "exit 3"])
            .run()
            .await
            .unwrap_err();
        assert_eq!(err, "exited with status 3");
    }

    #[tokio::test]
    async fn run_reports_spawn_failure() {
        let dir = tempfile::tempdir().unwrap();
        let err = ToolCommand::new("definitely-not-a-real-tool-4f2a", dir.path())
            .run()
            .await
            .unwrap_err();
        assert!(err.starts_with("failed to start"));
    }
}
