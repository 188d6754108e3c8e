//! `maven-metadata.xml`: reading what a repository already has, writing what
//! a publication adds, and merging the two.

use chrono::{DateTime, Utc};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use mvnpub_util::errors::{MvnpubError, MvnpubResult};

/// Metadata file name in remote repositories.
pub const METADATA_FILE: &str = "maven-metadata.xml";

/// Metadata file name in local repositories.
pub const LOCAL_METADATA_FILE: &str = "maven-metadata-local.xml";

/// Artifact-level (version listing) or version-level (snapshot) metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MavenMetadata {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    /// Set only on version-level metadata.
    pub version: Option<String>,
    pub versioning: Versioning,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Versioning {
    pub latest: Option<String>,
    pub release: Option<String>,
    pub versions: Vec<String>,
    pub last_updated: Option<String>,
    pub snapshot: Option<Snapshot>,
    pub snapshot_versions: Vec<SnapshotVersion>,
}

/// The most recent unique snapshot of a version.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub timestamp: Option<String>,
    pub build_number: Option<u32>,
    /// Set in local repositories, where files keep the `-SNAPSHOT` name.
    pub local_copy: bool,
}

/// The concrete version published for one classifier/extension pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotVersion {
    pub classifier: String,
    pub extension: String,
    pub value: String,
    pub updated: String,
}

/// `lastUpdated` form of a timestamp: `yyyyMMddHHmmss`.
pub fn last_updated(now: DateTime<Utc>) -> String {
    now.format("%Y%m%d%H%M%S").to_string()
}

/// Snapshot form of a timestamp: `yyyyMMdd.HHmmss`.
pub fn snapshot_timestamp(now: DateTime<Utc>) -> String {
    now.format("%Y%m%d.%H%M%S").to_string()
}

impl MavenMetadata {
    /// Fold `newer` (generated by this publication) into `self` (what the
    /// repository already holds).
    ///
    /// Versions are unioned in order; `latest`, `release` and `lastUpdated`
    /// take the newer value when it has one. On version-level metadata the
    /// newer snapshot block replaces the old one; snapshot versions are
    /// replaced per classifier/extension, and dropped entirely when the newer
    /// document has no snapshot block.
    pub fn merge(&mut self, newer: &MavenMetadata) {
        if newer.group_id.is_some() {
            self.group_id = newer.group_id.clone();
        }
        if newer.artifact_id.is_some() {
            self.artifact_id = newer.artifact_id.clone();
        }
        if newer.version.is_some() {
            self.version = newer.version.clone();
        }

        let ours = &mut self.versioning;
        let theirs = &newer.versioning;
        for v in &theirs.versions {
            if !ours.versions.contains(v) {
                ours.versions.push(v.clone());
            }
        }
        if theirs.latest.is_some() {
            ours.latest = theirs.latest.clone();
        }
        if theirs.release.is_some() {
            ours.release = theirs.release.clone();
        }
        if theirs.last_updated.is_some() {
            ours.last_updated = theirs.last_updated.clone();
        }

        if newer.version.is_some() {
            ours.snapshot = theirs.snapshot.clone();
            if theirs.snapshot.is_none() {
                ours.snapshot_versions.clear();
            }
        }
        for sv in &theirs.snapshot_versions {
            match ours
                .snapshot_versions
                .iter_mut()
                .find(|o| o.classifier == sv.classifier && o.extension == sv.extension)
            {
                Some(existing) => *existing = sv.clone(),
                None => ours.snapshot_versions.push(sv.clone()),
            }
        }
    }

    /// Serialize to `maven-metadata.xml`.
    pub fn to_xml(&self) -> MvnpubResult<String> {
        let mut w = Writer::new_with_indent(Vec::new(), b' ', 2);
        self.write(&mut w).map_err(|e| MvnpubError::Metadata {
            message: format!("Failed to write metadata: {e}"),
        })?;
        String::from_utf8(w.into_inner()).map_err(|e| MvnpubError::Metadata {
            message: format!("Metadata is not UTF-8: {e}"),
        })
    }

    fn write(&self, w: &mut Writer<Vec<u8>>) -> std::io::Result<()> {
        w.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        start(w, "metadata")?;
        text_opt(w, "groupId", self.group_id.as_deref())?;
        text_opt(w, "artifactId", self.artifact_id.as_deref())?;
        text_opt(w, "version", self.version.as_deref())?;

        let v = &self.versioning;
        start(w, "versioning")?;
        text_opt(w, "latest", v.latest.as_deref())?;
        text_opt(w, "release", v.release.as_deref())?;
        if let Some(snapshot) = &v.snapshot {
            start(w, "snapshot")?;
            text_opt(w, "timestamp", snapshot.timestamp.as_deref())?;
            if let Some(n) = snapshot.build_number {
                text(w, "buildNumber", &n.to_string())?;
            }
            if snapshot.local_copy {
                text(w, "localCopy", "true")?;
            }
            end(w, "snapshot")?;
        }
        if !v.versions.is_empty() {
            start(w, "versions")?;
            for version in &v.versions {
                text(w, "version", version)?;
            }
            end(w, "versions")?;
        }
        text_opt(w, "lastUpdated", v.last_updated.as_deref())?;
        if !v.snapshot_versions.is_empty() {
            start(w, "snapshotVersions")?;
            for sv in &v.snapshot_versions {
                start(w, "snapshotVersion")?;
                if !sv.classifier.is_empty() {
                    text(w, "classifier", &sv.classifier)?;
                }
                text(w, "extension", &sv.extension)?;
                text(w, "value", &sv.value)?;
                text(w, "updated", &sv.updated)?;
                end(w, "snapshotVersion")?;
            }
            end(w, "snapshotVersions")?;
        }
        end(w, "versioning")?;
        end(w, "metadata")
    }
}

fn start(w: &mut Writer<Vec<u8>>, name: &str) -> std::io::Result<()> {
    w.write_event(Event::Start(BytesStart::new(name)))
}

fn end(w: &mut Writer<Vec<u8>>, name: &str) -> std::io::Result<()> {
    w.write_event(Event::End(BytesEnd::new(name)))
}

fn text(w: &mut Writer<Vec<u8>>, name: &str, value: &str) -> std::io::Result<()> {
    start(w, name)?;
    w.write_event(Event::Text(BytesText::new(value)))?;
    end(w, name)
}

fn text_opt(w: &mut Writer<Vec<u8>>, name: &str, value: Option<&str>) -> std::io::Result<()> {
    match value {
        Some(value) => text(w, name, value),
        None => Ok(()),
    }
}

/// Parse a `maven-metadata.xml` document of either level.
pub fn parse_metadata(xml: &str) -> MvnpubResult<MavenMetadata> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut meta = MavenMetadata::default();
    let mut path: Vec<String> = Vec::new();
    let mut text_buf = String::new();
    let mut current_sv: Option<SnapshotVersion> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                path.push(String::from_utf8_lossy(e.name().as_ref()).to_string());
                text_buf.clear();
                if path.join(">") == "metadata>versioning>snapshotVersions>snapshotVersion" {
                    current_sv = Some(SnapshotVersion::default());
                }
            }
            Ok(Event::Text(ref e)) => {
                text_buf = e.unescape().unwrap_or_default().to_string();
            }
            Ok(Event::End(_)) => {
                let ctx = path.join(">");
                let versioning = &mut meta.versioning;

                match ctx.as_str() {
                    "metadata>groupId" => meta.group_id = Some(text_buf.clone()),
                    "metadata>artifactId" => meta.artifact_id = Some(text_buf.clone()),
                    "metadata>version" => meta.version = Some(text_buf.clone()),
                    "metadata>versioning>latest" => versioning.latest = Some(text_buf.clone()),
                    "metadata>versioning>release" => versioning.release = Some(text_buf.clone()),
                    "metadata>versioning>versions>version" => {
                        versioning.versions.push(text_buf.clone());
                    }
                    "metadata>versioning>lastUpdated" => {
                        versioning.last_updated = Some(text_buf.clone());
                    }
                    "metadata>versioning>snapshot>timestamp" => {
                        versioning.snapshot.get_or_insert_with(Snapshot::default).timestamp =
                            Some(text_buf.clone());
                    }
                    "metadata>versioning>snapshot>buildNumber" => {
                        versioning
                            .snapshot
                            .get_or_insert_with(Snapshot::default)
                            .build_number = text_buf.trim().parse().ok();
                    }
                    "metadata>versioning>snapshot>localCopy" => {
                        versioning.snapshot.get_or_insert_with(Snapshot::default).local_copy =
                            text_buf.trim() == "true";
                    }
                    "metadata>versioning>snapshotVersions>snapshotVersion" => {
                        if let Some(sv) = current_sv.take() {
                            versioning.snapshot_versions.push(sv);
                        }
                    }
                    _ => {
                        if let Some(sv) = current_sv.as_mut() {
                            match path.last().map(String::as_str) {
                                Some("classifier") => sv.classifier = text_buf.clone(),
                                Some("extension") => sv.extension = text_buf.clone(),
                                Some("value") => sv.value = text_buf.clone(),
                                Some("updated") => sv.updated = text_buf.clone(),
                                _ => {}
                            }
                        }
                    }
                }

                path.pop();
                text_buf.clear();
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(MvnpubError::Metadata {
                    message: format!("Failed to parse maven-metadata.xml: {e}"),
                });
            }
            _ => {}
        }
    }

    Ok(meta)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<metadata>
  <groupId>com.example</groupId>
  <artifactId>my-lib</artifactId>
  <version>1.0-SNAPSHOT</version>
  <versioning>
    <snapshot>
      <timestamp>20240615.143022</timestamp>
      <buildNumber>42</buildNumber>
    </snapshot>
    <lastUpdated>20240615143022</lastUpdated>
    <snapshotVersions>
      <snapshotVersion>
        <extension>jar</extension>
        <value>1.0-20240615.143022-42</value>
        <updated>20240615143022</updated>
      </snapshotVersion>
      <snapshotVersion>
        <classifier>sources</classifier>
        <extension>jar</extension>
        <value>1.0-20240615.143022-42</value>
        <updated>20240615143022</updated>
      </snapshotVersion>
    </snapshotVersions>
  </versioning>
</metadata>"#;

    #[test]
    fn parse_artifact_metadata() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<metadata>
  <groupId>org.jetbrains.kotlinx</groupId>
  <artifactId>kotlinx-coroutines-core</artifactId>
  <versioning>
    <latest>1.8.0</latest>
    <release>1.8.0</release>
    <versions>
      <version>1.7.3</version>
      <version>1.8.0</version>
    </versions>
    <lastUpdated>20240101120000</lastUpdated>
  </versioning>
</metadata>"#;
        let meta = parse_metadata(xml).unwrap();
        assert_eq!(meta.artifact_id.as_deref(), Some("kotlinx-coroutines-core"));
        assert_eq!(meta.versioning.release.as_deref(), Some("1.8.0"));
        assert_eq!(meta.versioning.versions, vec!["1.7.3", "1.8.0"]);
        assert!(meta.version.is_none());
    }

    #[test]
    fn parse_snapshot_metadata() {
        let meta = parse_metadata(SNAPSHOT_XML).unwrap();
        let snapshot = meta.versioning.snapshot.as_ref().unwrap();
        assert_eq!(snapshot.timestamp.as_deref(), Some("20240615.143022"));
        assert_eq!(snapshot.build_number, Some(42));
        assert_eq!(meta.versioning.snapshot_versions.len(), 2);
        assert_eq!(meta.versioning.snapshot_versions[1].classifier, "sources");
    }

    #[test]
    fn written_metadata_parses_back() {
        let meta = parse_metadata(SNAPSHOT_XML).unwrap();
        let xml = meta.to_xml().unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<buildNumber>42</buildNumber>"));
        assert_eq!(parse_metadata(&xml).unwrap(), meta);
    }

    #[test]
    fn merge_unions_versions_and_keeps_release() {
        let mut existing = MavenMetadata {
            group_id: Some("g".into()),
            artifact_id: Some("a".into()),
            versioning: Versioning {
                latest: Some("1.0".into()),
                release: Some("1.0".into()),
                versions: vec!["1.0".into()],
                ..Default::default()
            },
            ..Default::default()
        };
        let newer = MavenMetadata {
            group_id: Some("g".into()),
            artifact_id: Some("a".into()),
            versioning: Versioning {
                latest: Some("1.1-SNAPSHOT".into()),
                versions: vec!["1.0".into(), "1.1-SNAPSHOT".into()],
                last_updated: Some("20260101000000".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        existing.merge(&newer);
        assert_eq!(existing.versioning.versions, vec!["1.0", "1.1-SNAPSHOT"]);
        assert_eq!(existing.versioning.latest.as_deref(), Some("1.1-SNAPSHOT"));
        assert_eq!(existing.versioning.release.as_deref(), Some("1.0"));
        assert_eq!(
            existing.versioning.last_updated.as_deref(),
            Some("20260101000000")
        );
    }

    #[test]
    fn merge_replaces_snapshot_entries_by_key() {
        let mut existing = parse_metadata(SNAPSHOT_XML).unwrap();
        let newer = MavenMetadata {
            version: Some("1.0-SNAPSHOT".into()),
            versioning: Versioning {
                snapshot: Some(Snapshot {
                    timestamp: Some("20240616.000000".into()),
                    build_number: Some(43),
                    local_copy: false,
                }),
                snapshot_versions: vec![SnapshotVersion {
                    classifier: String::new(),
                    extension: "jar".into(),
                    value: "1.0-20240616.000000-43".into(),
                    updated: "20240616000000".into(),
                }],
                ..Default::default()
            },
            ..Default::default()
        };
        existing.merge(&newer);
        let svs = &existing.versioning.snapshot_versions;
        assert_eq!(svs.len(), 2);
        assert_eq!(svs[0].value, "1.0-20240616.000000-43");
        assert_eq!(svs[1].value, "1.0-20240615.143022-42");
        assert_eq!(existing.versioning.snapshot.unwrap().build_number, Some(43));
    }

    #[test]
    fn merge_without_snapshot_block_clears_unique_entries() {
        let mut existing = parse_metadata(SNAPSHOT_XML).unwrap();
        let newer = MavenMetadata {
            version: Some("1.0-SNAPSHOT".into()),
            versioning: Versioning {
                last_updated: Some("20240617000000".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        existing.merge(&newer);
        assert!(existing.versioning.snapshot.is_none());
        assert!(existing.versioning.snapshot_versions.is_empty());
    }

    #[test]
    fn timestamp_formats() {
        let now = DateTime::parse_from_rfc3339("2024-06-15T14:30:22Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(last_updated(now), "20240615143022");
        assert_eq!(snapshot_timestamp(now), "20240615.143022");
    }

    #[test]
    fn malformed_metadata_is_metadata_error() {
        let err = parse_metadata("<metadata><groupId>g</artifactId></metadata>").unwrap_err();
        assert!(matches!(err, MvnpubError::Metadata { .. }));
    }
}
