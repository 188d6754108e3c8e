//! One publication: main artifact, POM and attached artifacts.

use mvnpub_util::errors::{MvnpubError, MvnpubResult};

use crate::artifact::PublishableArtifact;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicationRequest {
    main: Option<PublishableArtifact>,
    pom: PublishableArtifact,
    attached: Vec<PublishableArtifact>,
}

impl PublicationRequest {
    /// Assemble a request. The POM and every attached artifact must share
    /// group, artifact and version with the main artifact (or with the POM
    /// when there is no main artifact).
    pub fn new(
        main: Option<PublishableArtifact>,
        pom: PublishableArtifact,
        attached: Vec<PublishableArtifact>,
    ) -> MvnpubResult<Self> {
        let anchor = main.as_ref().unwrap_or(&pom).coordinate();
        for other in std::iter::once(&pom).chain(attached.iter()) {
            if !other.coordinate().same_gav(anchor) {
                return Err(MvnpubError::config(format!(
                    "{} does not belong to {}:{}:{}",
                    other.coordinate(),
                    anchor.group_id,
                    anchor.artifact_id,
                    anchor.version
                )));
            }
        }
        Ok(Self {
            main,
            pom,
            attached,
        })
    }

    pub fn main(&self) -> Option<&PublishableArtifact> {
        self.main.as_ref()
    }

    pub fn pom(&self) -> &PublishableArtifact {
        &self.pom
    }

    pub fn attached(&self) -> &[PublishableArtifact] {
        &self.attached
    }

    /// Whether the publication's version is a snapshot.
    pub fn is_snapshot(&self) -> bool {
        self.main.as_ref().unwrap_or(&self.pom).is_snapshot()
    }

    pub fn artifact_count(&self) -> usize {
        usize::from(self.main.is_some()) + 1 + self.attached.len()
    }

    /// The artifacts in transfer order: main (if any), POM, attached.
    pub fn into_artifacts(self) -> Vec<PublishableArtifact> {
        let mut artifacts = Vec::with_capacity(self.artifact_count());
        artifacts.extend(self.main);
        artifacts.push(self.pom);
        artifacts.extend(self.attached);
        artifacts
    }
}
