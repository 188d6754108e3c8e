//! A coordinate bound to the file that will be published under it.

use std::path::{Path, PathBuf};

use crate::coordinate::ArtifactCoordinate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishableArtifact {
    coordinate: ArtifactCoordinate,
    file: Option<PathBuf>,
}

impl PublishableArtifact {
    /// An artifact whose file has not been bound yet.
    pub fn new(coordinate: ArtifactCoordinate) -> Self {
        Self {
            coordinate,
            file: None,
        }
    }

    pub fn with_file(coordinate: ArtifactCoordinate, file: impl Into<PathBuf>) -> Self {
        Self {
            coordinate,
            file: Some(file.into()),
        }
    }

    pub fn coordinate(&self) -> &ArtifactCoordinate {
        &self.coordinate
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    /// Bind the file. Binding a second time replaces the first path and is
    /// logged as an overwrite.
    pub fn set_file(&mut self, file: impl Into<PathBuf>) {
        let file = file.into();
        if let Some(previous) = &self.file {
            if *previous != file {
                tracing::warn!(
                    "Overwriting file for {}: {} -> {}",
                    self.coordinate,
                    previous.display(),
                    file.display()
                );
            }
        }
        self.file = Some(file);
    }

    /// A copy of this artifact published under `version`.
    pub fn with_version(&self, version: &str) -> Self {
        Self {
            coordinate: self.coordinate.with_version(version),
            file: self.file.clone(),
        }
    }

    pub fn is_snapshot(&self) -> bool {
        self.coordinate.is_snapshot()
    }

    /// Whether a file is bound and exists on disk as a regular file.
    pub fn file_exists(&self) -> bool {
        self.file.as_deref().is_some_and(Path::is_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(version: &str) -> ArtifactCoordinate {
        ArtifactCoordinate::new("com.example", "lib", version, None, "jar")
    }

    #[test]
    fn with_version_keeps_file() {
        let a = PublishableArtifact::with_file(coord("1.0-20240101.000000-1"), "/tmp/lib.jar");
        let b = a.with_version("1.0-SNAPSHOT");
        assert_eq!(b.coordinate().version, "1.0-SNAPSHOT");
        assert_eq!(b.file(), Some(Path::new("/tmp/lib.jar")));
        assert!(b.is_snapshot());
    }

    #[test]
    fn set_file_overwrites() {
        let mut a = PublishableArtifact::new(coord("1.0"));
        assert!(a.file().is_none());
        a.set_file("/a.jar");
        a.set_file("/b.jar");
        assert_eq!(a.file(), Some(Path::new("/b.jar")));
    }

    #[test]
    fn unbound_or_missing_file_does_not_exist() {
        assert!(!PublishableArtifact::new(coord("1.0")).file_exists());
        let missing = PublishableArtifact::with_file(coord("1.0"), "/definitely/not/here.jar");
        assert!(!missing.file_exists());
    }
}
