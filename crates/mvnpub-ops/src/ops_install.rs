//! Operation: install a publication into the local repository.

use std::path::{Path, PathBuf};

use mvnpub_maven::action::MavenPublishAction;
use mvnpub_maven::artifact_type::ArtifactTypeRegistry;
use mvnpub_maven::install::MavenInstallAction;
use mvnpub_maven::system::TransferSummary;
use mvnpub_util::progress::{status, status_info};

use crate::{configure_artifacts, load_config, PublishOptions};

#[derive(Debug, Clone, Default)]
pub struct InstallOptions {
    pub publish: PublishOptions,
    /// Local repository root, replacing `local-repository` from config.
    pub local_repository: Option<PathBuf>,
}

pub fn install(options: &InstallOptions, cwd: &Path) -> miette::Result<TransferSummary> {
    let config = load_config(options.publish.config.as_deref(), cwd)?;
    let registry = ArtifactTypeRegistry::from_config(&config.types);
    let local = options
        .local_repository
        .clone()
        .unwrap_or_else(|| config.local_repository_path());

    let mut action = MavenInstallAction::new(&options.publish.pom, registry)?;
    action.set_local_repository(&local)?;
    action.set_unique_version(config.publish.unique_version)?;
    configure_artifacts(&mut action, &options.publish, &config)?;

    let header = action.action().header();
    status_info(
        "Installing",
        &format!("{}:{}:{}", header.group_id, header.artifact_id, header.version),
    );
    let summary = action.publish()?;
    status(
        "Installed",
        &format!("{} artifact(s) to {}", summary.files, local.display()),
    );
    Ok(summary)
}
