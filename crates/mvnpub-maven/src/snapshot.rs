//! Unique and non-unique snapshot versioning.
//!
//! By default every deploy of `1.0-SNAPSHOT` gets its own timestamped file
//! name (`lib-1.0-20240615.143022-7.jar`). In non-unique mode the
//! [`SnapshotVersionManager`] rewrites deployed snapshot artifacts back to
//! their base version, so every deploy overwrites `lib-1.0-SNAPSHOT.jar`.

use crate::artifact::PublishableArtifact;
use crate::generator::{MetadataGenerator, MetadataGeneratorFactory, Operation};

/// Runs ahead of every built-in generator so the rewritten versions are what
/// the metadata describes.
pub const SNAPSHOT_VERSION_PRIORITY: f32 = -100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Active,
    Inactive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotVersionManager {
    unique_version: bool,
}

impl Default for SnapshotVersionManager {
    fn default() -> Self {
        Self {
            unique_version: true,
        }
    }
}

impl SnapshotVersionManager {
    pub fn new(unique_version: bool) -> Self {
        Self { unique_version }
    }

    pub fn is_unique_version(&self) -> bool {
        self.unique_version
    }

    pub fn set_unique_version(&mut self, unique_version: bool) {
        self.unique_version = unique_version;
    }

    /// Active only when deploying in non-unique mode.
    pub fn activation(&self, operation: Operation) -> Activation {
        match (operation, self.unique_version) {
            (Operation::Deploy, false) => Activation::Active,
            _ => Activation::Inactive,
        }
    }
}

impl MetadataGeneratorFactory for SnapshotVersionManager {
    fn priority(&self) -> f32 {
        SNAPSHOT_VERSION_PRIORITY
    }

    fn new_instance(
        &self,
        operation: Operation,
        _artifacts: &[PublishableArtifact],
    ) -> Option<Box<dyn MetadataGenerator>> {
        match self.activation(operation) {
            Activation::Active => {
                tracing::debug!("Non-unique snapshot versions active");
                Some(Box::new(BaseVersionGenerator))
            }
            Activation::Inactive => None,
        }
    }
}

/// Rewrites snapshot artifacts to their base version. Contributes no
/// metadata of its own.
#[derive(Debug, Clone, Copy, Default)]
pub struct BaseVersionGenerator;

impl MetadataGenerator for BaseVersionGenerator {
    fn transform_artifact(&mut self, artifact: PublishableArtifact) -> PublishableArtifact {
        if !artifact.is_snapshot() {
            return artifact;
        }
        let base = artifact.coordinate().base_version();
        if base == artifact.coordinate().version {
            return artifact;
        }
        tracing::debug!("{} -> {base}", artifact.coordinate());
        artifact.with_version(&base)
    }
}
