//! The transfer engine: stamps snapshot versions, runs the metadata
//! generator chain, and writes artifacts, metadata and checksums through a
//! [`Transport`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::Utc;

use mvnpub_util::errors::{MvnpubError, MvnpubResult};
use mvnpub_util::hash::ChecksumAlgorithm;

use crate::artifact::PublishableArtifact;
use crate::checksum;
use crate::coordinate::{self, ArtifactCoordinate};
use crate::generator::{
    MetadataDocument, MetadataGenerator, MetadataGeneratorFactory, Operation,
    SnapshotMetadataFactory, VersionsMetadataFactory,
};
use crate::metadata::{self, MavenMetadata, LOCAL_METADATA_FILE, METADATA_FILE};
use crate::repository::{RemoteRepository, DEFAULT_LAYOUT};
use crate::transport::{self, FileTransport, Transport};

#[derive(Debug, Clone)]
pub struct DeployRequest {
    pub repository: RemoteRepository,
    pub artifacts: Vec<PublishableArtifact>,
}

#[derive(Debug, Clone)]
pub struct InstallRequest {
    pub local_repository: PathBuf,
    pub artifacts: Vec<PublishableArtifact>,
}

/// What a deploy or install wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferSummary {
    /// Coordinates as transferred, after every generator's rewrite.
    pub artifacts: Vec<ArtifactCoordinate>,
    /// Artifact files written, not counting checksums.
    pub files: usize,
    /// Metadata documents written.
    pub metadata: usize,
}

/// Transfers publications into repositories.
///
/// Generators registered through
/// [`register_metadata_generator`](RepositorySystem::register_metadata_generator)
/// take part in every later deploy and install of this system.
pub trait RepositorySystem {
    fn register_metadata_generator(&mut self, factory: Box<dyn MetadataGeneratorFactory>);

    fn deploy(&mut self, request: DeployRequest) -> MvnpubResult<TransferSummary>;

    fn install(&mut self, request: InstallRequest) -> MvnpubResult<TransferSummary>;
}

pub struct DefaultRepositorySystem {
    factories: Vec<Box<dyn MetadataGeneratorFactory>>,
}

impl Default for DefaultRepositorySystem {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultRepositorySystem {
    /// A system with the snapshot and versions metadata generators.
    pub fn new() -> Self {
        Self {
            factories: vec![
                Box::new(SnapshotMetadataFactory),
                Box::new(VersionsMetadataFactory),
            ],
        }
    }

    pub fn generator_count(&self) -> usize {
        self.factories.len()
    }

    fn generators(
        &self,
        operation: Operation,
        artifacts: &[PublishableArtifact],
    ) -> Vec<Box<dyn MetadataGenerator>> {
        let mut ranked: Vec<(f32, Box<dyn MetadataGenerator>)> = self
            .factories
            .iter()
            .filter_map(|f| {
                f.new_instance(operation, artifacts)
                    .map(|g| (f.priority(), g))
            })
            .collect();
        ranked.sort_by(|a, b| a.0.total_cmp(&b.0));
        ranked.into_iter().map(|(_, g)| g).collect()
    }

    fn transfer(
        &self,
        operation: Operation,
        transport: &dyn Transport,
        artifacts: Vec<PublishableArtifact>,
    ) -> MvnpubResult<TransferSummary> {
        let (metadata_file, checksums) = match operation {
            Operation::Deploy => (METADATA_FILE, true),
            Operation::Install => (LOCAL_METADATA_FILE, false),
        };

        let mut generators = self.generators(operation, &artifacts);
        let mut documents: Vec<MetadataDocument> = Vec::new();
        for generator in generators.iter_mut() {
            documents.extend(generator.prepare(&artifacts));
        }

        let artifacts: Vec<PublishableArtifact> = artifacts
            .into_iter()
            .map(|a| {
                generators
                    .iter_mut()
                    .fold(a, |a, generator| generator.transform_artifact(a))
            })
            .collect();

        let mut summary = TransferSummary::default();
        for artifact in &artifacts {
            let file = artifact.file().ok_or_else(|| {
                MvnpubError::config(format!("No file bound to {}", artifact.coordinate()))
            })?;
            let data = read_artifact(file)?;
            put(transport, &artifact.coordinate().repository_path(), &data, checksums)?;
            summary.artifacts.push(artifact.coordinate().clone());
            summary.files += 1;
        }

        for generator in generators.iter_mut() {
            documents.extend(generator.finish(&artifacts));
        }
        for document in &documents {
            let path = document.path(metadata_file);
            let merged = merge_existing(transport, &path, &document.metadata, checksums)?;
            put(transport, &path, merged.to_xml()?.as_bytes(), checksums)?;
            summary.metadata += 1;
        }

        Ok(summary)
    }
}

impl RepositorySystem for DefaultRepositorySystem {
    fn register_metadata_generator(&mut self, factory: Box<dyn MetadataGeneratorFactory>) {
        tracing::debug!("Registered metadata generator (priority {})", factory.priority());
        self.factories.push(factory);
    }

    fn deploy(&mut self, request: DeployRequest) -> MvnpubResult<TransferSummary> {
        let repository = &request.repository;
        if repository.layout != DEFAULT_LAYOUT {
            return Err(MvnpubError::config(format!(
                "Repository {} uses unsupported layout '{}'",
                repository.url, repository.layout
            )));
        }
        let transport = transport::for_repository(repository)?;
        tracing::info!(
            "Deploying {} artifact(s) to {}",
            request.artifacts.len(),
            repository.url
        );

        let artifacts = stamp_snapshots(transport.as_ref(), request.artifacts)?;
        self.transfer(Operation::Deploy, transport.as_ref(), artifacts)
    }

    fn install(&mut self, request: InstallRequest) -> MvnpubResult<TransferSummary> {
        tracing::info!(
            "Installing {} artifact(s) to {}",
            request.artifacts.len(),
            request.local_repository.display()
        );
        let transport = FileTransport::new(&request.local_repository);
        self.transfer(Operation::Install, &transport, request.artifacts)
    }
}

/// Give every `-SNAPSHOT` artifact a unique timestamped version.
///
/// All artifacts of one snapshot version share the timestamp and the build
/// number following the one recorded in the repository's metadata.
fn stamp_snapshots(
    transport: &dyn Transport,
    artifacts: Vec<PublishableArtifact>,
) -> MvnpubResult<Vec<PublishableArtifact>> {
    let timestamp = metadata::snapshot_timestamp(Utc::now());
    let mut builds: HashMap<String, u32> = HashMap::new();

    artifacts
        .into_iter()
        .map(|artifact| {
            let version = artifact.coordinate().version.clone();
            if !version.ends_with("-SNAPSHOT") {
                return Ok(artifact);
            }
            let dir = artifact.coordinate().version_dir();
            let build_number = match builds.get(&dir) {
                Some(n) => *n,
                None => {
                    let n = next_build_number(transport, &dir)?;
                    builds.insert(dir, n);
                    n
                }
            };
            match coordinate::timestamped_version(&version, &timestamp, build_number) {
                Some(unique) => Ok(artifact.with_version(&unique)),
                None => Ok(artifact),
            }
        })
        .collect()
}

fn next_build_number(transport: &dyn Transport, version_dir: &str) -> MvnpubResult<u32> {
    let path = format!("{version_dir}/{METADATA_FILE}");
    let previous = match transport.get(&path)? {
        Some(bytes) => parse_bytes(&path, &bytes)?
            .versioning
            .snapshot
            .and_then(|s| s.build_number)
            .unwrap_or(0),
        None => 0,
    };
    Ok(previous + 1)
}

fn merge_existing(
    transport: &dyn Transport,
    path: &str,
    generated: &MavenMetadata,
    verify: bool,
) -> MvnpubResult<MavenMetadata> {
    let Some(bytes) = transport.get(path)? else {
        return Ok(generated.clone());
    };
    if verify {
        // Strongest sidecar the repository has.
        for algo in [ChecksumAlgorithm::Sha256, ChecksumAlgorithm::Sha1] {
            if let Some(sidecar) = transport.get(&format!("{path}.{}", algo.extension()))? {
                checksum::verify(algo, path, &bytes, &String::from_utf8_lossy(&sidecar))?;
                break;
            }
        }
    }
    let mut existing = parse_bytes(path, &bytes)?;
    existing.merge(generated);
    tracing::debug!("Merged {path}");
    Ok(existing)
}

fn parse_bytes(path: &str, bytes: &[u8]) -> MvnpubResult<MavenMetadata> {
    let xml = std::str::from_utf8(bytes).map_err(|e| MvnpubError::Metadata {
        message: format!("{path} is not UTF-8: {e}"),
    })?;
    metadata::parse_metadata(xml)
}

fn put(transport: &dyn Transport, path: &str, data: &[u8], checksums: bool) -> MvnpubResult<()> {
    transport.put(path, data)?;
    if checksums {
        for sidecar in checksum::sidecars(path, data) {
            tracing::debug!("{} = {}", sidecar.path, sidecar.content);
            transport.put(&sidecar.path, sidecar.content.as_bytes())?;
        }
    }
    Ok(())
}

fn read_artifact(file: &Path) -> MvnpubResult<Vec<u8>> {
    std::fs::read(file).map_err(|e| {
        MvnpubError::Io(std::io::Error::new(
            e.kind(),
            format!("{}: {e}", file.display()),
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_repo(dir: &Path) -> RemoteRepository {
        RemoteRepository::new("local", &format!("file://{}", dir.display()))
    }

    fn artifact(dir: &Path, version: &str, ext: &str) -> PublishableArtifact {
        let file = dir.join(format!("input.{ext}"));
        std::fs::write(&file, ext.as_bytes()).unwrap();
        PublishableArtifact::with_file(
            ArtifactCoordinate::new("com.example", "lib", version, None, ext),
            file,
        )
    }

    #[test]
    fn release_deploy_writes_files_checksums_and_metadata() {
        let src = tempfile::tempdir().unwrap();
        let repo = tempfile::tempdir().unwrap();
        let mut system = DefaultRepositorySystem::new();

        let summary = system
            .deploy(DeployRequest {
                repository: file_repo(repo.path()),
                artifacts: vec![
                    artifact(src.path(), "1.0", "jar"),
                    artifact(src.path(), "1.0", "pom"),
                ],
            })
            .unwrap();

        assert_eq!(summary.files, 2);
        assert_eq!(summary.metadata, 1);
        let dir = repo.path().join("com/example/lib");
        assert!(dir.join("1.0/lib-1.0.jar").is_file());
        assert!(dir.join("1.0/lib-1.0.jar.sha1").is_file());
        assert!(dir.join("1.0/lib-1.0.pom.md5").is_file());
        let xml = std::fs::read_to_string(dir.join("maven-metadata.xml")).unwrap();
        assert!(xml.contains("<release>1.0</release>"));
        assert!(dir.join("maven-metadata.xml.sha1").is_file());
    }

    #[test]
    fn unique_snapshot_build_numbers_increase() {
        let src = tempfile::tempdir().unwrap();
        let repo = tempfile::tempdir().unwrap();
        let mut system = DefaultRepositorySystem::new();

        for expected in 1..=2 {
            let summary = system
                .deploy(DeployRequest {
                    repository: file_repo(repo.path()),
                    artifacts: vec![artifact(src.path(), "1.0-SNAPSHOT", "jar")],
                })
                .unwrap();
            let version = &summary.artifacts[0].version;
            let (_, _, build) = coordinate::split_timestamped(version).unwrap();
            assert_eq!(build, expected);
        }

        let xml = std::fs::read_to_string(
            repo.path().join("com/example/lib/1.0-SNAPSHOT/maven-metadata.xml"),
        )
        .unwrap();
        let meta = metadata::parse_metadata(&xml).unwrap();
        assert_eq!(meta.versioning.snapshot.unwrap().build_number, Some(2));
        assert_eq!(meta.versioning.snapshot_versions.len(), 1);
    }

    #[test]
    fn install_writes_local_metadata_without_checksums() {
        let src = tempfile::tempdir().unwrap();
        let local = tempfile::tempdir().unwrap();
        let mut system = DefaultRepositorySystem::new();

        let summary = system
            .install(InstallRequest {
                local_repository: local.path().to_path_buf(),
                artifacts: vec![artifact(src.path(), "1.0-SNAPSHOT", "jar")],
            })
            .unwrap();

        assert_eq!(summary.artifacts[0].version, "1.0-SNAPSHOT");
        let dir = local.path().join("com/example/lib");
        assert!(dir.join("1.0-SNAPSHOT/lib-1.0-SNAPSHOT.jar").is_file());
        assert!(!dir.join("1.0-SNAPSHOT/lib-1.0-SNAPSHOT.jar.sha1").exists());
        assert!(dir.join("maven-metadata-local.xml").is_file());
        assert!(dir.join("1.0-SNAPSHOT/maven-metadata-local.xml").is_file());
    }

    #[test]
    fn registered_generator_joins_the_chain() {
        use crate::snapshot::SnapshotVersionManager;

        let src = tempfile::tempdir().unwrap();
        let repo = tempfile::tempdir().unwrap();
        let mut system = DefaultRepositorySystem::new();
        assert_eq!(system.generator_count(), 2);
        system.register_metadata_generator(Box::new(SnapshotVersionManager::new(false)));
        assert_eq!(system.generator_count(), 3);

        let summary = system
            .deploy(DeployRequest {
                repository: file_repo(repo.path()),
                artifacts: vec![artifact(src.path(), "1.0-SNAPSHOT", "jar")],
            })
            .unwrap();
        assert_eq!(summary.artifacts[0].version, "1.0-SNAPSHOT");
    }

    #[test]
    fn unsupported_layout_is_rejected() {
        let repo = tempfile::tempdir().unwrap();
        let mut repository = file_repo(repo.path());
        repository.layout = "legacy".to_string();
        let err = DefaultRepositorySystem::new()
            .deploy(DeployRequest {
                repository,
                artifacts: Vec::new(),
            })
            .unwrap_err();
        assert!(matches!(err, MvnpubError::Configuration { .. }));
    }

    #[test]
    fn corrupt_metadata_checksum_fails_the_deploy() {
        let src = tempfile::tempdir().unwrap();
        let repo = tempfile::tempdir().unwrap();
        let dir = repo.path().join("com/example/lib");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("maven-metadata.xml"),
            "<metadata><groupId>com.example</groupId><artifactId>lib</artifactId></metadata>",
        )
        .unwrap();
        std::fs::write(dir.join("maven-metadata.xml.sha1"), "0".repeat(40)).unwrap();

        let err = DefaultRepositorySystem::new()
            .deploy(DeployRequest {
                repository: file_repo(repo.path()),
                artifacts: vec![artifact(src.path(), "1.0", "jar")],
            })
            .unwrap_err();
        assert!(matches!(err, MvnpubError::Network { .. }));
        let xml = std::fs::read_to_string(dir.join("maven-metadata.xml")).unwrap();
        assert!(!xml.contains("<release>"));
    }

    #[test]
    fn missing_file_fails_the_transfer() {
        let repo = tempfile::tempdir().unwrap();
        let missing = PublishableArtifact::with_file(
            ArtifactCoordinate::new("com.example", "lib", "1.0", None, "jar"),
            "/no/such/lib.jar",
        );
        let err = DefaultRepositorySystem::new()
            .deploy(DeployRequest {
                repository: file_repo(repo.path()),
                artifacts: vec![missing],
            })
            .unwrap_err();
        assert!(matches!(err, MvnpubError::Io(_)));
    }
}
