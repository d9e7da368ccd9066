//! Reading and rewriting the version declared in a manifest file.

use crate::error::{ConfigurationError, Result};
use regex::{Captures, Regex};
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static VERSION_ASSIGNMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\bversion\s*=\s*(?:"([^"\n]+)"|'([^'\n]+)')"#).expect("valid version regex")
});

static NAME_ASSIGNMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\bname\s*=\s*(?:"([^"\n]+)"|'([^'\n]+)')"#).expect("valid name regex")
});

/// Span of whichever quote style matched
fn quoted_value(caps: &Captures<'_>) -> Option<Range<usize>> {
    caps.get(1).or_else(|| caps.get(2)).map(|m| m.range())
}

/// A manifest file and the version it declares
#[derive(Debug, Clone)]
pub struct Manifest {
    path: PathBuf,
    content: String,
    version_span: Range<usize>,
    package_name: Option<String>,
}

impl Manifest {
    /// Read and parse a manifest from disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConfigurationError::ManifestNotFound {
                    path: path.to_path_buf(),
                }
                .into());
            }
            Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                return Err(ConfigurationError::UnreadableManifest {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                }
                .into());
            }
            Err(e) => return Err(e.into()),
        };
        Self::parse(path, content)
    }

    /// Parse manifest text; the first `version=` assignment wins
    pub fn parse(path: &Path, content: String) -> Result<Self> {
        let version_span = VERSION_ASSIGNMENT
            .captures(&content)
            .and_then(|caps| quoted_value(&caps))
            .ok_or_else(|| ConfigurationError::VersionNotFound {
                path: path.to_path_buf(),
            })?;

        let package_name = NAME_ASSIGNMENT
            .captures(&content)
            .and_then(|caps| quoted_value(&caps))
            .map(|span| content[span].to_string());

        Ok(Self {
            path: path.to_path_buf(),
            content,
            version_span,
            package_name,
        })
    }

    /// Path of the manifest file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Declared version
    pub fn version(&self) -> &str {
        &self.content[self.version_span.clone()]
    }

    /// Declared package name, if any
    pub fn package_name(&self) -> Option<&str> {
        self.package_name.as_deref()
    }

    /// Manifest text with the declared version replaced
    pub fn render_with_version(&self, new_version: &str) -> String {
        let mut updated = String::with_capacity(self.content.len() + new_version.len());
        updated.push_str(&self.content[..self.version_span.start]);
        updated.push_str(new_version);
        updated.push_str(&self.content[self.version_span.end..]);
        updated
    }

    /// Write `new_version` to disk.
    ///
    /// Returns `None` without touching the file when the version is unchanged.
    pub fn set_version(&self, new_version: &str) -> Result<Option<ManifestEdit>> {
        if new_version == self.version() {
            log::debug!("{} already at {}, not rewriting", self.path.display(), new_version);
            return Ok(None);
        }

        std::fs::write(&self.path, self.render_with_version(new_version))?;
        log::info!(
            "Updated {}: {} -> {}",
            self.path.display(),
            self.version(),
            new_version
        );

        Ok(Some(ManifestEdit {
            path: self.path.clone(),
            original: self.content.clone(),
            previous_version: self.version().to_string(),
            new_version: new_version.to_string(),
        }))
    }
}

/// A version change written to disk, with what is needed to undo it
#[derive(Debug, Clone)]
pub struct ManifestEdit {
    path: PathBuf,
    original: String,
    previous_version: String,
    new_version: String,
}

impl ManifestEdit {
    /// Path of the edited manifest
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Version before the edit
    pub fn previous_version(&self) -> &str {
        &self.previous_version
    }

    /// Version after the edit
    pub fn new_version(&self) -> &str {
        &self.new_version
    }

    /// Restore the manifest to its exact pre-edit content
    pub fn revert(self) -> Result<()> {
        std::fs::write(&self.path, self.original.as_bytes())?;
        log::info!(
            "Reverted {} to {}",
            self.path.display(),
            self.previous_version
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ReleaseError;

    const SETUP_PY: &str = r#"from setuptools import setup, find_packages

setup(
    name="ai-screenshooter",
    version="1.0.0",
    packages=find_packages(),
    python_requires=">=3.6",
)
"#;

    fn write_manifest(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("setup.py");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn non_utf8_manifest_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("setup.py");
        std::fs::write(&path, b"setup(version=\"1.0.0\", name=\"\xff\xfe\")\n").unwrap();

        let err = Manifest::load(&path).unwrap_err();
        assert!(matches!(
            err,
            ReleaseError::Configuration(ConfigurationError::UnreadableManifest { ref path, .. })
                if path.ends_with("setup.py")
        ));
        assert!(err.is_pre_mutation());
    }

    #[test]
    fn extracts_version_and_name() {
        let manifest = Manifest::parse(Path::new("setup.py"), SETUP_PY.to_string()).unwrap();
        assert_eq!(manifest.version(), "1.0.0");
        assert_eq!(manifest.package_name(), Some("ai-screenshooter"));
    }

    #[test]
    fn extraction_is_exact_for_arbitrary_versions() {
        for (a, b, c) in [(0, 0, 1), (3, 14, 159), (2024, 1, 0)] {
            let text = format!("setup(version=\"{a}.{b}.{c}\")\n");
            let manifest = Manifest::parse(Path::new("setup.py"), text).unwrap();
            assert_eq!(manifest.version(), format!("{a}.{b}.{c}"));
        }
    }

    #[test]
    fn tolerates_spacing_and_single_quotes() {
        let manifest =
            Manifest::parse(Path::new("setup.py"), "version = '2.3.4'\n".to_string()).unwrap();
        assert_eq!(manifest.version(), "2.3.4");
    }

    #[test]
    fn ignores_similarly_named_assignments() {
        let text = "__version__ = \"9.9.9\"\npython_version=\"3.11.0\"\nversion=\"1.2.3\"\n";
        let manifest = Manifest::parse(Path::new("setup.py"), text.to_string()).unwrap();
        assert_eq!(manifest.version(), "1.2.3");
    }

    #[test]
    fn missing_version_is_configuration_error() {
        let err = Manifest::parse(Path::new("setup.py"), "setup(name=\"x\")".to_string())
            .unwrap_err();
        assert!(matches!(
            err,
            ReleaseError::Configuration(ConfigurationError::VersionNotFound { .. })
        ));
    }

    #[test]
    fn missing_file_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Manifest::load(&dir.path().join("setup.py")).unwrap_err();
        assert!(matches!(
            err,
            ReleaseError::Configuration(ConfigurationError::ManifestNotFound { .. })
        ));
    }

    #[test]
    fn set_version_rewrites_only_the_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_manifest(dir.path(), SETUP_PY);
        let manifest = Manifest::load(&path).unwrap();

        let edit = manifest.set_version("1.0.1").unwrap().expect("file edited");
        assert_eq!(edit.previous_version(), "1.0.0");
        assert_eq!(edit.new_version(), "1.0.1");

        let on_disk = std::fs::read_to_string(&path).unwrap();
        assert_eq!(on_disk, SETUP_PY.replace("version=\"1.0.0\"", "version=\"1.0.1\""));
    }

    #[test]
    fn revert_restores_bytes_exactly() {
        let dir = tempfile::tempdir().unwrap();
        let original = "# -*- coding: utf-8 -*-\r\nsetup(version='0.9.0')  \r\n\r\n";
        let path = write_manifest(dir.path(), original);
        let before = std::fs::read(&path).unwrap();

        let edit = Manifest::load(&path)
            .unwrap()
            .set_version("1.0.0")
            .unwrap()
            .unwrap();
        assert_ne!(std::fs::read(&path).unwrap(), before);

        edit.revert().unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), before);
    }

    #[test]
    fn same_version_does_not_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_manifest(dir.path(), SETUP_PY);
        let manifest = Manifest::load(&path).unwrap();

        // A file swapped out after loading must survive an unchanged version untouched.
        std::fs::write(&path, "sentinel").unwrap();
        assert!(manifest.set_version("1.0.0").unwrap().is_none());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "sentinel");
    }
}
