use std::path::Path;

use mvnpub_util::errors::MvnpubResult;

use crate::action::{MavenPublishAction, PublishAction};
use crate::artifact_type::ArtifactTypeRegistry;
use crate::pom::{PomParser, XmlPomParser};
use crate::publish;
use crate::repository::RepositoryTarget;
use crate::snapshot::SnapshotVersionManager;
use crate::system::{DefaultRepositorySystem, RepositorySystem, TransferSummary};

/// Deploys a publication to a release or snapshot repository.
pub struct MavenDeployAction<S: RepositorySystem = DefaultRepositorySystem> {
    action: PublishAction,
    target: RepositoryTarget,
    versions: SnapshotVersionManager,
    system: S,
}

impl MavenDeployAction<DefaultRepositorySystem> {
    pub fn new(pom_file: &Path, registry: ArtifactTypeRegistry) -> MvnpubResult<Self> {
        Self::with_system(pom_file, &XmlPomParser, registry, DefaultRepositorySystem::new())
    }
}

impl<S: RepositorySystem> MavenDeployAction<S> {
    pub fn with_system(
        pom_file: &Path,
        parser: &dyn PomParser,
        registry: ArtifactTypeRegistry,
        system: S,
    ) -> MvnpubResult<Self> {
        Ok(Self {
            action: PublishAction::new(pom_file, parser, registry)?,
            target: RepositoryTarget::default(),
            versions: SnapshotVersionManager::default(),
            system,
        })
    }

    pub fn set_repositories(&mut self, target: RepositoryTarget) -> MvnpubResult<()> {
        self.action.mark_configured()?;
        self.target = target;
        Ok(())
    }

    pub fn target(&self) -> &RepositoryTarget {
        &self.target
    }

    pub fn system(&self) -> &S {
        &self.system
    }
}

impl<S: RepositorySystem> MavenPublishAction for MavenDeployAction<S> {
    fn action(&self) -> &PublishAction {
        &self.action
    }

    fn action_mut(&mut self) -> &mut PublishAction {
        &mut self.action
    }

    fn set_unique_version(&mut self, unique_version: bool) -> MvnpubResult<()> {
        self.action.ensure_modifiable()?;
        self.versions.set_unique_version(unique_version);
        Ok(())
    }

    fn publish(&mut self) -> MvnpubResult<TransferSummary> {
        let request = self.action.begin_publish()?;
        publish::deploy(request, &self.target, &mut self.system, self.versions)
    }
}
