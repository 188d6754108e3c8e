//! Operation: deploy a publication to a remote (or `file://`) repository.

use std::path::Path;

use mvnpub_maven::action::MavenPublishAction;
use mvnpub_maven::artifact_type::ArtifactTypeRegistry;
use mvnpub_maven::coordinate;
use mvnpub_maven::deploy::MavenDeployAction;
use mvnpub_maven::repository::{RemoteRepository, RepositoryTarget};
use mvnpub_maven::system::TransferSummary;
use mvnpub_util::progress::{spinner, status, status_info, status_warn};

use crate::{configure_artifacts, load_config, PublishOptions};

#[derive(Debug, Clone, Default)]
pub struct DeployOptions {
    pub publish: PublishOptions,
    /// Release repository URL, replacing the configured one.
    pub repository: Option<String>,
    /// Snapshot repository URL, replacing the configured one.
    pub snapshot_repository: Option<String>,
    /// Deploy snapshots under their `-SNAPSHOT` name.
    pub non_unique: bool,
}

/// Deploy the project described by `options.publish.pom`.
pub fn deploy(options: &DeployOptions, cwd: &Path) -> miette::Result<TransferSummary> {
    let config = load_config(options.publish.config.as_deref(), cwd)?;
    let registry = ArtifactTypeRegistry::from_config(&config.types);

    let mut target = RepositoryTarget::from_config(&config.repositories);
    if let Some(url) = &options.repository {
        target.release = Some(override_url("release", url, target.release.take()));
    }
    if let Some(url) = &options.snapshot_repository {
        target.snapshot = Some(override_url("snapshot", url, target.snapshot.take()));
    }

    let mut action = MavenDeployAction::new(&options.publish.pom, registry)?;
    let header = action.action().header().clone();
    let destination = target
        .select(coordinate::is_snapshot(&header.version))
        .map(|r| r.url.clone())
        .unwrap_or_default();
    action.set_repositories(target)?;

    let unique = config.publish.unique_version && !options.non_unique;
    if !unique {
        status_warn("Snapshots", "deploying with non-unique versions");
    }
    action.set_unique_version(unique)?;
    configure_artifacts(&mut action, &options.publish, &config)?;

    status_info(
        "Deploying",
        &format!("{}:{}:{}", header.group_id, header.artifact_id, header.version),
    );
    let sp = spinner(&format!("Uploading to {destination}..."));
    let result = action.publish();
    sp.finish_and_clear();
    let summary = result?;

    status(
        "Deployed",
        &format!(
            "{} artifact(s) and {} metadata file(s) to {destination}",
            summary.files, summary.metadata
        ),
    );
    Ok(summary)
}

/// Point a repository at `url`, keeping credentials and proxy from config.
fn override_url(id: &str, url: &str, configured: Option<RemoteRepository>) -> RemoteRepository {
    match configured {
        Some(mut repo) => {
            repo.url = url.trim_end_matches('/').to_string();
            repo
        }
        None => RemoteRepository::new(id, url),
    }
}
