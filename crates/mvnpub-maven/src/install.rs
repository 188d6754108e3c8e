use std::path::{Path, PathBuf};

use mvnpub_util::errors::{MvnpubError, MvnpubResult};

use crate::action::{MavenPublishAction, PublishAction};
use crate::artifact_type::ArtifactTypeRegistry;
use crate::pom::{PomParser, XmlPomParser};
use crate::publish;
use crate::system::{DefaultRepositorySystem, RepositorySystem, TransferSummary};

/// Installs a publication into a local repository directory.
///
/// Local repositories always keep unique snapshot bookkeeping, so
/// non-unique mode is refused.
pub struct MavenInstallAction<S: RepositorySystem = DefaultRepositorySystem> {
    action: PublishAction,
    local_repository: Option<PathBuf>,
    system: S,
}

impl MavenInstallAction<DefaultRepositorySystem> {
    pub fn new(pom_file: &Path, registry: ArtifactTypeRegistry) -> MvnpubResult<Self> {
        Self::with_system(pom_file, &XmlPomParser, registry, DefaultRepositorySystem::new())
    }
}

impl<S: RepositorySystem> MavenInstallAction<S> {
    pub fn with_system(
        pom_file: &Path,
        parser: &dyn PomParser,
        registry: ArtifactTypeRegistry,
        system: S,
    ) -> MvnpubResult<Self> {
        Ok(Self {
            action: PublishAction::new(pom_file, parser, registry)?,
            local_repository: None,
            system,
        })
    }

    pub fn set_local_repository(&mut self, path: impl Into<PathBuf>) -> MvnpubResult<()> {
        self.action.mark_configured()?;
        self.local_repository = Some(path.into());
        Ok(())
    }

    pub fn local_repository(&self) -> Option<&Path> {
        self.local_repository.as_deref()
    }

    pub fn system(&self) -> &S {
        &self.system
    }
}

impl<S: RepositorySystem> MavenPublishAction for MavenInstallAction<S> {
    fn action(&self) -> &PublishAction {
        &self.action
    }

    fn action_mut(&mut self) -> &mut PublishAction {
        &mut self.action
    }

    fn set_unique_version(&mut self, unique_version: bool) -> MvnpubResult<()> {
        if !unique_version {
            return Err(MvnpubError::config(
                "install only supports unique snapshot versions",
            ));
        }
        Ok(())
    }

    fn publish(&mut self) -> MvnpubResult<TransferSummary> {
        let request = self.action.begin_publish()?;
        let local = self
            .local_repository
            .as_deref()
            .ok_or_else(|| MvnpubError::config("no local repository configured for install"))?;
        publish::install(request, local, &mut self.system)
    }
}
