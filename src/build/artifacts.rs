//! Inspection of the files a build left in the distribution directory.

use crate::error::Result;
use glob::MatchOptions;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::path::{Path, PathBuf};

/// A distributable file produced by the build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Full path to the file
    pub path: PathBuf,
    /// File name, e.g. `pkg-1.0.1-py3-none-any.whl`
    pub file_name: String,
    /// Size in bytes
    pub size: u64,
    /// Hex-encoded SHA-256 of the contents
    pub sha256: String,
}

impl Artifact {
    /// Stat a file and stream it through SHA-256
    pub fn inspect(path: &Path) -> Result<Self> {
        let mut file = File::open(path)?;
        let size = file.metadata()?.len();
        let mut hasher = Sha256::new();
        std::io::copy(&mut file, &mut hasher)?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            path: path.to_path_buf(),
            file_name,
            size,
            sha256: hex::encode(hasher.finalize()),
        })
    }

    /// One-line summary for terminal output
    pub fn summary(&self) -> String {
        format!(
            "{} ({}, sha256 {})",
            self.file_name,
            format_size(self.size),
            &self.sha256[..12.min(self.sha256.len())]
        )
    }
}

/// Every non-hidden file directly inside `dist_dir`, sorted by name.
///
/// A missing directory yields an empty list.
pub fn list_artifacts(dist_dir: &Path) -> Result<Vec<Artifact>> {
    if !dist_dir.is_dir() {
        return Ok(Vec::new());
    }

    let pattern = format!(
        "{}/*",
        glob::Pattern::escape(&dist_dir.to_string_lossy())
    );
    let options = MatchOptions {
        require_literal_leading_dot: true,
        ..MatchOptions::new()
    };

    let mut paths: Vec<PathBuf> = glob::glob_with(&pattern, options)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                log::warn!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|path| path.is_file())
        .collect();
    paths.sort();

    paths.iter().map(|path| Artifact::inspect(path)).collect()
}

fn format_size(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    let bytes_f = bytes as f64;
    if bytes_f < KIB {
        format!("{} B", bytes)
    } else if bytes_f < KIB * KIB {
        format!("{:.1} KiB", bytes_f / KIB)
    } else {
        format!("{:.1} MiB", bytes_f / (KIB * KIB))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_files_sorted_and_skips_hidden_and_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let dist = dir.path().join("dist");
        std::fs::create_dir_all(dist.join("nested")).unwrap();
        std::fs::write(dist.join("pkg-1.0.1.tar.gz"), b"sdist").unwrap();
        std::fs::write(dist.join("pkg-1.0.1-py3-none-any.whl"), b"wheel").unwrap();
        std::fs::write(dist.join(".DS_Store"), b"junk").unwrap();

        let names: Vec<_> = list_artifacts(&dist)
            .unwrap()
            .into_iter()
            .map(|a| a.file_name)
            .collect();
        assert_eq!(names, ["pkg-1.0.1-py3-none-any.whl", "pkg-1.0.1.tar.gz"]);
    }

    #[test]
    fn missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(list_artifacts(&dir.path().join("dist")).unwrap().is_empty());
    }

    #[test]
    fn digest_and_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.whl");
        std::fs::write(&path, b"abc").unwrap();

        let artifact = Artifact::inspect(&path).unwrap();
        assert_eq!(artifact.size, 3);
        assert_eq!(
            artifact.sha256,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(artifact.summary(), "a.whl (3 B, sha256 ba7816bf8f01)");
    }

    #[test]
    fn digest_of_large_file_matches_in_memory_hash() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.tar.gz");
        let contents: Vec<u8> = (0..300_000u32).map(|i| (i % 251) as u8).collect();
        std::fs::write(&path, &contents).unwrap();

        let artifact = Artifact::inspect(&path).unwrap();
        assert_eq!(artifact.size, 300_000);
        assert_eq!(artifact.sha256, hex::encode(Sha256::digest(&contents)));
    }

    #[test]
    fn size_formatting() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KiB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MiB");
    }
}
