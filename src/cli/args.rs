//! Command line argument parsing.
//!
//! The tool is interactive; everything else comes from `release.toml` and
//! `PYPI_RELEASE_*` environment variables.

use clap::Parser;

/// Interactive release tool for setup.py-based Python packages
#[derive(Parser, Debug)]
#[command(
    name = "pypi_release",
    version,
    about = "Bump, build and upload a Python package",
    long_about = "Bump the version in setup.py, build the package and upload it to PyPI.

Run from the package root. You will be asked for:
  1. the new version (Enter keeps the current one)
  2. whether to upload the built artifacts (declining restores setup.py)
  3. whether to commit and push the version bump

The upload token is read from .pypi_token. Optional settings live in
release.toml; PYPI_RELEASE_MANIFEST, PYPI_RELEASE_SECRET_FILE,
PYPI_RELEASE_DIST_DIR and PYPI_RELEASE_PYTHON override them.
Set RUST_LOG=debug to see every command that is run."
)]
pub struct Args {}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn rejects_unknown_arguments() {
        assert!(Args::try_parse_from(["pypi_release", "--yes"]).is_err());
        assert!(Args::try_parse_from(["pypi_release", "1.0.1"]).is_err());
        assert!(Args::try_parse_from(["pypi_release"]).is_ok());
    }
}
