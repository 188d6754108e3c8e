//! The publish action shared by deploy and install: collects the POM, the
//! main artifact and attached artifacts, then hands one
//! [`PublicationRequest`] to the transfer.

use std::path::{Path, PathBuf};

use mvnpub_core::config::MissingArtifactPolicy;
use mvnpub_util::errors::{MvnpubError, MvnpubResult};

use crate::artifact::PublishableArtifact;
use crate::artifact_type::ArtifactTypeRegistry;
use crate::coordinate::ArtifactCoordinate;
use crate::identity;
use crate::pom::{PomHeader, PomParser};
use crate::request::PublicationRequest;
use crate::system::TransferSummary;

/// Lifecycle of a publish action. Actions are single use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionState {
    Created,
    /// A repository or local path has been set.
    Configured,
    /// `publish()` has started; nothing can change any more.
    Published,
}

#[derive(Debug, Clone)]
pub struct PublishAction {
    state: ActionState,
    header: PomHeader,
    registry: ArtifactTypeRegistry,
    pom: PublishableArtifact,
    main: PublishableArtifact,
    attached: Vec<PublishableArtifact>,
    missing_artifacts: MissingArtifactPolicy,
}

impl PublishAction {
    /// Read the POM header and derive the POM and main artifact coordinates.
    pub fn new(
        pom_file: &Path,
        parser: &dyn PomParser,
        registry: ArtifactTypeRegistry,
    ) -> MvnpubResult<Self> {
        let header = parser.parse(pom_file)?;
        let pom = PublishableArtifact::with_file(
            ArtifactCoordinate::new(
                &header.group_id,
                &header.artifact_id,
                &header.version,
                None,
                "pom",
            ),
            pom_file,
        );
        let main = PublishableArtifact::new(identity::resolve(
            &registry,
            &header.group_id,
            &header.artifact_id,
            &header.version,
            &header.packaging,
            None,
        ));
        tracing::debug!("Publishing {} from {}", main.coordinate(), pom_file.display());

        Ok(Self {
            state: ActionState::Created,
            header,
            registry,
            pom,
            main,
            attached: Vec::new(),
            missing_artifacts: MissingArtifactPolicy::default(),
        })
    }

    pub fn state(&self) -> ActionState {
        self.state
    }

    pub fn header(&self) -> &PomHeader {
        &self.header
    }

    pub fn pom(&self) -> &PublishableArtifact {
        &self.pom
    }

    pub fn main(&self) -> &PublishableArtifact {
        &self.main
    }

    pub fn attached(&self) -> &[PublishableArtifact] {
        &self.attached
    }

    pub fn missing_artifact_policy(&self) -> MissingArtifactPolicy {
        self.missing_artifacts
    }

    /// Fail with a state error once publishing has started.
    pub fn ensure_modifiable(&self) -> MvnpubResult<()> {
        if self.state == ActionState::Published {
            return Err(MvnpubError::state(format!(
                "{} has already been published",
                self.pom.coordinate()
            )));
        }
        Ok(())
    }

    /// Record that a destination has been set.
    pub fn mark_configured(&mut self) -> MvnpubResult<()> {
        self.ensure_modifiable()?;
        self.state = ActionState::Configured;
        Ok(())
    }

    pub fn set_main_artifact(&mut self, file: impl Into<PathBuf>) -> MvnpubResult<()> {
        self.ensure_modifiable()?;
        self.main.set_file(file);
        Ok(())
    }

    pub fn add_additional_artifact(
        &mut self,
        file: impl Into<PathBuf>,
        type_: &str,
        classifier: Option<&str>,
    ) -> MvnpubResult<()> {
        self.ensure_modifiable()?;
        let coordinate = identity::resolve(
            &self.registry,
            &self.header.group_id,
            &self.header.artifact_id,
            &self.header.version,
            type_,
            classifier,
        );
        self.attached
            .push(PublishableArtifact::with_file(coordinate, file));
        Ok(())
    }

    pub fn set_missing_artifact_policy(&mut self, policy: MissingArtifactPolicy) -> MvnpubResult<()> {
        self.ensure_modifiable()?;
        self.missing_artifacts = policy;
        Ok(())
    }

    /// Start publishing: the action becomes `Published` whatever happens
    /// next, and the publication is assembled.
    pub fn begin_publish(&mut self) -> MvnpubResult<PublicationRequest> {
        if self.state == ActionState::Published {
            return Err(MvnpubError::state(format!(
                "publish() was already called for {}",
                self.pom.coordinate()
            )));
        }
        self.state = ActionState::Published;
        self.assemble()
    }

    fn assemble(&self) -> MvnpubResult<PublicationRequest> {
        let main = match self.main.file() {
            None => None,
            // `pom` packaging: the POM is the main artifact.
            Some(_) if self.main.coordinate() == self.pom.coordinate() => {
                tracing::warn!(
                    "Ignoring main artifact of {}: packaging is pom",
                    self.pom.coordinate()
                );
                None
            }
            Some(_) => Some(self.main.clone()),
        };

        let attached = self
            .attached
            .iter()
            .filter(|a| match self.missing_artifacts {
                MissingArtifactPolicy::Include => true,
                MissingArtifactPolicy::Skip if a.file_exists() => true,
                MissingArtifactPolicy::Skip => {
                    tracing::info!(
                        "Skipping {}: {} does not exist",
                        a.coordinate(),
                        a.file().map(|f| f.display().to_string()).unwrap_or_default()
                    );
                    false
                }
            })
            .cloned()
            .collect();

        PublicationRequest::new(main, self.pom.clone(), attached)
    }
}

/// Operations shared by [`MavenDeployAction`](crate::deploy::MavenDeployAction)
/// and [`MavenInstallAction`](crate::install::MavenInstallAction).
pub trait MavenPublishAction {
    fn action(&self) -> &PublishAction;

    fn action_mut(&mut self) -> &mut PublishAction;

    /// Bind the main artifact's file. Without it the publication is POM-only.
    fn set_main_artifact(&mut self, file: &Path) -> MvnpubResult<()> {
        self.action_mut().set_main_artifact(file)
    }

    fn add_additional_artifact(
        &mut self,
        file: &Path,
        type_: &str,
        classifier: Option<&str>,
    ) -> MvnpubResult<()> {
        self.action_mut()
            .add_additional_artifact(file, type_, classifier)
    }

    fn set_missing_artifact_policy(&mut self, policy: MissingArtifactPolicy) -> MvnpubResult<()> {
        self.action_mut().set_missing_artifact_policy(policy)
    }

    fn set_unique_version(&mut self, unique_version: bool) -> MvnpubResult<()>;

    fn publish(&mut self) -> MvnpubResult<TransferSummary>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedPom(PomHeader);

    impl PomParser for FixedPom {
        fn parse(&self, _path: &Path) -> MvnpubResult<PomHeader> {
            Ok(self.0.clone())
        }
    }

    fn action(version: &str, packaging: &str) -> PublishAction {
        let parser = FixedPom(PomHeader {
            group_id: "com.example".into(),
            artifact_id: "lib".into(),
            version: version.into(),
            packaging: packaging.into(),
        });
        PublishAction::new(
            Path::new("/tmp/pom.xml"),
            &parser,
            ArtifactTypeRegistry::maven_defaults(),
        )
        .unwrap()
    }

    #[test]
    fn main_coordinate_follows_packaging() {
        assert_eq!(action("1.0", "war").main().coordinate().extension, "war");
        assert_eq!(
            action("1.0", "maven-plugin").main().coordinate().extension,
            "jar"
        );
        assert_eq!(action("1.0", "jar").pom().coordinate().extension, "pom");
    }

    #[test]
    fn pom_only_publish_without_main_file() {
        let mut a = action("1.0", "jar");
        let request = a.begin_publish().unwrap();
        assert!(request.main().is_none());
        assert_eq!(request.artifact_count(), 1);
    }

    #[test]
    fn skip_policy_drops_missing_attachments() {
        let tmp = tempfile::tempdir().unwrap();
        let sources = tmp.path().join("lib-sources.jar");
        std::fs::write(&sources, b"src").unwrap();

        let mut a = action("1.0", "jar");
        a.add_additional_artifact(&sources, "java-source", None).unwrap();
        a.add_additional_artifact(tmp.path().join("missing.jar"), "javadoc", None)
            .unwrap();
        let request = a.begin_publish().unwrap();
        assert_eq!(request.attached().len(), 1);
        assert_eq!(request.attached()[0].coordinate().classifier, "sources");
    }

    #[test]
    fn include_policy_keeps_missing_attachments() {
        let mut a = action("1.0", "jar");
        a.set_missing_artifact_policy(MissingArtifactPolicy::Include)
            .unwrap();
        a.add_additional_artifact("/no/such/javadoc.jar", "javadoc", None)
            .unwrap();
        let request = a.begin_publish().unwrap();
        assert_eq!(request.attached().len(), 1);
        assert!(!request.attached()[0].file_exists());
    }

    #[test]
    fn second_publish_is_state_error() {
        let mut a = action("1.0", "jar");
        a.begin_publish().unwrap();
        assert_eq!(a.state(), ActionState::Published);
        assert!(matches!(a.begin_publish(), Err(MvnpubError::State { .. })));
        assert!(matches!(
            a.add_additional_artifact("/x.jar", "jar", Some("extra")),
            Err(MvnpubError::State { .. })
        ));
    }

    #[test]
    fn pom_packaging_never_duplicates_the_pom() {
        let mut a = action("1.0", "pom");
        a.set_main_artifact("/tmp/pom.xml").unwrap();
        let request = a.begin_publish().unwrap();
        assert!(request.main().is_none());
        assert_eq!(request.artifact_count(), 1);
    }
}
