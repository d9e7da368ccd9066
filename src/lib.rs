//! # pypi_release
//!
//! Interactive release tool for setup.py-based Python packages.
//!
//! A run reads the upload token and the current version, asks for the new
//! version, rewrites the manifest, builds the package with `python -m build`,
//! and after confirmation uploads it with `twine` and optionally commits and
//! pushes the bump. Declining the upload restores the manifest exactly.
//!
//! ## Usage
//!
//! ```bash
//! cd my-package
//! echo 'pypi-...' > .pypi_token
//! pypi_release
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod build;
pub mod cli;
pub mod config;
pub mod error;
pub mod git;
pub mod process;
pub mod prompt;
pub mod publish;
pub mod python;
pub mod secret;
pub mod version;
pub mod workflow;

pub use build::{Artifact, PackageBuilder, PythonBuilder};
pub use cli::Args;
pub use config::ReleaseConfig;
pub use error::{ReleaseError, Result};
pub use git::{SystemGit, VersionControl};
pub use publish::{PackageUploader, TwineUploader};
pub use version::{Manifest, ManifestEdit};
pub use workflow::{ReleaseOutcome, ReleaseReport, ReleaseState, ReleaseWorkflow};
