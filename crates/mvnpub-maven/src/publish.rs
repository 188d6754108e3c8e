//! Library entry points: deploy a publication to a repository target, or
//! install it into a local repository.

use std::path::Path;

use mvnpub_util::errors::{MvnpubError, MvnpubResult};

use crate::repository::RepositoryTarget;
use crate::request::PublicationRequest;
use crate::snapshot::SnapshotVersionManager;
use crate::system::{DeployRequest, InstallRequest, RepositorySystem, TransferSummary};

/// Deploy `request` to the repository `target` selects for its version.
///
/// `versions` is registered with `system` before the transfer. Any transfer
/// failure comes back as [`MvnpubError::Transfer`] naming the repository.
pub fn deploy<S: RepositorySystem + ?Sized>(
    request: PublicationRequest,
    target: &RepositoryTarget,
    system: &mut S,
    versions: SnapshotVersionManager,
) -> MvnpubResult<TransferSummary> {
    let repository = target.select(request.is_snapshot())?.clone();
    let location = repository.url.clone();
    let count = request.artifact_count();

    system.register_metadata_generator(Box::new(versions));
    system
        .deploy(DeployRequest {
            repository,
            artifacts: request.into_artifacts(),
        })
        .map_err(|e| transfer_error(&location, count, e))
}

/// Install `request` into the local repository at `local_repository`.
pub fn install<S: RepositorySystem + ?Sized>(
    request: PublicationRequest,
    local_repository: &Path,
    system: &mut S,
) -> MvnpubResult<TransferSummary> {
    let location = local_repository.display().to_string();
    let count = request.artifact_count();

    system.register_metadata_generator(Box::new(SnapshotVersionManager::default()));
    system
        .install(InstallRequest {
            local_repository: local_repository.to_path_buf(),
            artifacts: request.into_artifacts(),
        })
        .map_err(|e| transfer_error(&location, count, e))
}

fn transfer_error(repository: &str, artifact_count: usize, err: MvnpubError) -> MvnpubError {
    match err {
        MvnpubError::Configuration { .. } | MvnpubError::State { .. } => err,
        other => MvnpubError::Transfer {
            repository: repository.to_string(),
            artifact_count,
            source: Box::new(other),
        },
    }
}
