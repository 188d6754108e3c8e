//! Metadata generators: the extension point through which a publication can
//! rewrite artifacts and contribute repository metadata.
//!
//! A [`RepositorySystem`](crate::system::RepositorySystem) asks every
//! registered [`MetadataGeneratorFactory`] for a generator, runs them in
//! ascending [`priority`](MetadataGeneratorFactory::priority) order, and
//! folds each artifact through every generator's
//! [`transform_artifact`](MetadataGenerator::transform_artifact) before
//! transferring it. Lower priorities run first, so their rewrites are what
//! later generators see.

use std::collections::BTreeMap;

use chrono::Utc;

use crate::artifact::PublishableArtifact;
use crate::coordinate::{self, ArtifactCoordinate};
use crate::metadata::{self, MavenMetadata, Snapshot, SnapshotVersion, Versioning};

/// Priority of [`SnapshotMetadataFactory`].
pub const SNAPSHOT_METADATA_PRIORITY: f32 = 0.0;

/// Priority of [`VersionsMetadataFactory`].
pub const VERSIONS_METADATA_PRIORITY: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Copy into a local repository.
    Install,
    /// Transfer to a remote repository.
    Deploy,
}

/// A metadata document addressed to an artifact-level (`version == None`)
/// or version-level directory of the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataDocument {
    pub group_id: String,
    pub artifact_id: String,
    pub version: Option<String>,
    pub metadata: MavenMetadata,
}

impl MetadataDocument {
    /// Repository-relative path of this document stored as `file_name`.
    pub fn path(&self, file_name: &str) -> String {
        let group = self.group_id.replace('.', "/");
        match &self.version {
            Some(v) => format!("{group}/{}/{v}/{file_name}", self.artifact_id),
            None => format!("{group}/{}/{file_name}", self.artifact_id),
        }
    }
}

/// One generator instance, scoped to a single deploy or install.
pub trait MetadataGenerator {
    /// Metadata to write for the artifacts as submitted.
    fn prepare(&mut self, _artifacts: &[PublishableArtifact]) -> Vec<MetadataDocument> {
        Vec::new()
    }

    /// Rewrite an artifact before it is transferred.
    fn transform_artifact(&mut self, artifact: PublishableArtifact) -> PublishableArtifact {
        artifact
    }

    /// Metadata to write for the artifacts as transferred.
    fn finish(&mut self, _artifacts: &[PublishableArtifact]) -> Vec<MetadataDocument> {
        Vec::new()
    }
}

pub trait MetadataGeneratorFactory: Send + Sync {
    fn priority(&self) -> f32;

    /// A generator for this operation, or `None` to stay out of it.
    fn new_instance(
        &self,
        operation: Operation,
        artifacts: &[PublishableArtifact],
    ) -> Option<Box<dyn MetadataGenerator>>;
}

/// Produces the version-level metadata of snapshot versions.
#[derive(Debug, Clone, Copy, Default)]
pub struct SnapshotMetadataFactory;

impl MetadataGeneratorFactory for SnapshotMetadataFactory {
    fn priority(&self) -> f32 {
        SNAPSHOT_METADATA_PRIORITY
    }

    fn new_instance(
        &self,
        operation: Operation,
        artifacts: &[PublishableArtifact],
    ) -> Option<Box<dyn MetadataGenerator>> {
        artifacts
            .iter()
            .any(PublishableArtifact::is_snapshot)
            .then(|| Box::new(SnapshotMetadataGenerator { operation }) as Box<dyn MetadataGenerator>)
    }
}

pub struct SnapshotMetadataGenerator {
    operation: Operation,
}

impl MetadataGenerator for SnapshotMetadataGenerator {
    fn finish(&mut self, artifacts: &[PublishableArtifact]) -> Vec<MetadataDocument> {
        let now = metadata::last_updated(Utc::now());
        let mut by_version: BTreeMap<(String, String, String), Vec<&ArtifactCoordinate>> =
            BTreeMap::new();
        for artifact in artifacts.iter().filter(|a| a.is_snapshot()) {
            let c = artifact.coordinate();
            by_version
                .entry((c.group_id.clone(), c.artifact_id.clone(), c.base_version()))
                .or_default()
                .push(c);
        }

        by_version
            .into_iter()
            .map(|((group_id, artifact_id, base), coords)| {
                let versioning = self.versioning(&base, &coords, &now);
                tracing::debug!("Snapshot metadata for {group_id}:{artifact_id}:{base}");
                MetadataDocument {
                    metadata: MavenMetadata {
                        group_id: Some(group_id.clone()),
                        artifact_id: Some(artifact_id.clone()),
                        version: Some(base.clone()),
                        versioning,
                    },
                    group_id,
                    artifact_id,
                    version: Some(base),
                }
            })
            .collect()
    }
}

impl SnapshotMetadataGenerator {
    fn versioning(&self, base: &str, coords: &[&ArtifactCoordinate], now: &str) -> Versioning {
        if self.operation == Operation::Install {
            return Versioning {
                last_updated: Some(now.to_string()),
                snapshot: Some(Snapshot {
                    local_copy: true,
                    ..Default::default()
                }),
                snapshot_versions: snapshot_versions(coords, now, |_| base.to_string()),
                ..Default::default()
            };
        }

        let stamped = coords
            .iter()
            .find_map(|c| coordinate::split_timestamped(&c.version));
        match stamped {
            Some((_, timestamp, build_number)) => {
                let updated = timestamp.replace('.', "");
                Versioning {
                    last_updated: Some(updated.clone()),
                    snapshot: Some(Snapshot {
                        timestamp: Some(timestamp.to_string()),
                        build_number: Some(build_number),
                        local_copy: false,
                    }),
                    snapshot_versions: snapshot_versions(coords, &updated, |c| c.version.clone()),
                    ..Default::default()
                }
            }
            // Non-unique deploy: files keep the -SNAPSHOT name.
            None => Versioning {
                last_updated: Some(now.to_string()),
                ..Default::default()
            },
        }
    }
}

fn snapshot_versions(
    coords: &[&ArtifactCoordinate],
    updated: &str,
    value: impl Fn(&ArtifactCoordinate) -> String,
) -> Vec<SnapshotVersion> {
    coords
        .iter()
        .map(|c| SnapshotVersion {
            classifier: c.classifier.clone(),
            extension: c.extension.clone(),
            value: value(*c),
            updated: updated.to_string(),
        })
        .collect()
}

/// Produces the artifact-level version listing.
#[derive(Debug, Clone, Copy, Default)]
pub struct VersionsMetadataFactory;

impl MetadataGeneratorFactory for VersionsMetadataFactory {
    fn priority(&self) -> f32 {
        VERSIONS_METADATA_PRIORITY
    }

    fn new_instance(
        &self,
        _operation: Operation,
        _artifacts: &[PublishableArtifact],
    ) -> Option<Box<dyn MetadataGenerator>> {
        Some(Box::new(VersionsMetadataGenerator))
    }
}

pub struct VersionsMetadataGenerator;

impl MetadataGenerator for VersionsMetadataGenerator {
    fn finish(&mut self, artifacts: &[PublishableArtifact]) -> Vec<MetadataDocument> {
        let now = metadata::last_updated(Utc::now());
        let mut by_artifact: BTreeMap<(String, String), Vec<String>> = BTreeMap::new();
        for artifact in artifacts {
            let c = artifact.coordinate();
            let versions = by_artifact
                .entry((c.group_id.clone(), c.artifact_id.clone()))
                .or_default();
            let base = c.base_version();
            if !versions.contains(&base) {
                versions.push(base);
            }
        }

        by_artifact
            .into_iter()
            .map(|((group_id, artifact_id), versions)| {
                let release = versions
                    .iter()
                    .rev()
                    .find(|v| !coordinate::is_snapshot(v))
                    .cloned();
                MetadataDocument {
                    metadata: MavenMetadata {
                        group_id: Some(group_id.clone()),
                        artifact_id: Some(artifact_id.clone()),
                        version: None,
                        versioning: Versioning {
                            latest: versions.last().cloned(),
                            release,
                            versions,
                            last_updated: Some(now.clone()),
                            ..Default::default()
                        },
                    },
                    group_id,
                    artifact_id,
                    version: None,
                }
            })
            .collect()
    }
}
