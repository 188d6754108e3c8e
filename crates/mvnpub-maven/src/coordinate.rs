//! Artifact coordinates and snapshot version arithmetic.

use std::fmt;

/// Qualifier that marks a symbolic snapshot version, e.g. `1.0-SNAPSHOT`.
pub const SNAPSHOT_QUALIFIER: &str = "SNAPSHOT";

/// Identity of one published file: `group:artifact:extension[:classifier]:version`.
///
/// An absent classifier is stored as the empty string, so two coordinates are
/// equal exactly when all five fields match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactCoordinate {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    pub classifier: String,
    pub extension: String,
}

impl ArtifactCoordinate {
    pub fn new(
        group_id: &str,
        artifact_id: &str,
        version: &str,
        classifier: Option<&str>,
        extension: &str,
    ) -> Self {
        Self {
            group_id: group_id.to_string(),
            artifact_id: artifact_id.to_string(),
            version: version.to_string(),
            classifier: classifier.unwrap_or_default().to_string(),
            extension: extension.to_string(),
        }
    }

    /// The classifier, or `None` when it is empty.
    pub fn classifier(&self) -> Option<&str> {
        (!self.classifier.is_empty()).then_some(self.classifier.as_str())
    }

    /// A copy of this coordinate with a different version.
    pub fn with_version(&self, version: &str) -> Self {
        Self {
            version: version.to_string(),
            ..self.clone()
        }
    }

    pub fn is_snapshot(&self) -> bool {
        is_snapshot(&self.version)
    }

    pub fn base_version(&self) -> String {
        base_version(&self.version)
    }

    /// Whether this coordinate shares group, artifact and version with `other`.
    pub fn same_gav(&self, other: &ArtifactCoordinate) -> bool {
        self.group_id == other.group_id
            && self.artifact_id == other.artifact_id
            && self.version == other.version
    }

    /// File name in the repository: `artifactId-version[-classifier].extension`.
    pub fn file_name(&self) -> String {
        match self.classifier() {
            Some(c) => format!(
                "{}-{}-{c}.{}",
                self.artifact_id, self.version, self.extension
            ),
            None => format!("{}-{}.{}", self.artifact_id, self.version, self.extension),
        }
    }

    /// Repository-relative directory holding every file of this version.
    ///
    /// Snapshots live under their base version, so timestamped uploads of
    /// `1.0-SNAPSHOT` share the `1.0-SNAPSHOT/` directory.
    pub fn version_dir(&self) -> String {
        format!(
            "{}/{}/{}",
            self.group_id.replace('.', "/"),
            self.artifact_id,
            self.base_version()
        )
    }

    /// Repository-relative path of this artifact's file.
    pub fn repository_path(&self) -> String {
        format!("{}/{}", self.version_dir(), self.file_name())
    }
}

impl fmt::Display for ArtifactCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.extension)?;
        if let Some(c) = self.classifier() {
            write!(f, ":{c}")?;
        }
        write!(f, ":{}", self.version)
    }
}

/// Whether `version` is a snapshot: ends with `-SNAPSHOT` or with a
/// `-YYYYMMDD.HHMMSS-N` timestamp qualifier.
pub fn is_snapshot(version: &str) -> bool {
    version.ends_with("-SNAPSHOT") || timestamp_parts(version).is_some()
}

/// The symbolic form of a snapshot version.
///
/// `1.0-20240615.143022-42` becomes `1.0-SNAPSHOT`; every other version is
/// returned unchanged.
pub fn base_version(version: &str) -> String {
    match timestamp_parts(version) {
        Some((prefix, _, _)) => format!("{prefix}-{SNAPSHOT_QUALIFIER}"),
        None => version.to_string(),
    }
}

/// Split a timestamped snapshot version into `(prefix, timestamp, build)`.
///
/// `1.0-20240615.143022-42` gives `("1.0", "20240615.143022", 42)`.
///
/// Returns `None` when the build number does not fit a `u32`.
pub fn split_timestamped(version: &str) -> Option<(&str, &str, u32)> {
    let (prefix, timestamp, build) = timestamp_parts(version)?;
    Some((prefix, timestamp, build.parse().ok()?))
}

fn timestamp_parts(version: &str) -> Option<(&str, &str, &str)> {
    let (rest, build) = version.rsplit_once('-')?;
    if build.is_empty() || !build.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let (prefix, timestamp) = rest.rsplit_once('-')?;
    if prefix.is_empty() || !is_snapshot_timestamp(timestamp) {
        return None;
    }
    Some((prefix, timestamp, build))
}

/// Build the unique version for a `-SNAPSHOT` version.
///
/// Returns `None` when `base` is not a `-SNAPSHOT` version.
pub fn timestamped_version(base: &str, timestamp: &str, build_number: u32) -> Option<String> {
    let prefix = base.strip_suffix("-SNAPSHOT")?;
    Some(format!("{prefix}-{timestamp}-{build_number}"))
}

// YYYYMMDD.HHMMSS
fn is_snapshot_timestamp(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 15
        && bytes[8] == b'.'
        && bytes[..8].iter().all(u8::is_ascii_digit)
        && bytes[9..].iter().all(u8::is_ascii_digit)
}
