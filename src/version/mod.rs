//! Version handling for setup.py-style manifests.
//!
//! This module validates release version strings and provides the manifest
//! reader/editor used to bump, and if needed restore, the declared version.

mod manifest;

pub use manifest::{Manifest, ManifestEdit};

use crate::error::{Result, ValidationError};
use regex::Regex;
use std::sync::LazyLock;

static RELEASE_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+\.[0-9]+\.[0-9]+$").expect("valid version regex"));

/// Whether `candidate` is exactly three dot-separated non-negative integers
pub fn is_valid_version(candidate: &str) -> bool {
    RELEASE_VERSION.is_match(candidate)
}

/// Validate a release version string
pub fn validate_version(candidate: &str) -> Result<()> {
    if is_valid_version(candidate) {
        Ok(())
    } else {
        Err(ValidationError::InvalidVersionFormat {
            version: candidate.to_string(),
        }
        .into())
    }
}

/// Whether moving from `current` to `new` goes backwards.
///
/// Versions that are not valid semver (leading zeros, pre-release suffixes
/// in the current version) are never reported as a downgrade.
pub fn is_downgrade(current: &str, new: &str) -> bool {
    match (semver::Version::parse(current), semver::Version::parse(new)) {
        (Ok(current), Ok(new)) => new < current,
        _ => false,
    }
}
