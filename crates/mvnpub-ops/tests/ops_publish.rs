use std::path::Path;

use mvnpub_ops::ops_deploy::{deploy, DeployOptions};
use mvnpub_ops::ops_install::{install, InstallOptions};
use mvnpub_ops::{Attachment, PublishOptions};
use tempfile::TempDir;

fn write_project(dir: &Path, version: &str) {
    std::fs::write(
        dir.join("pom.xml"),
        format!(
            "<project><groupId>org.acme</groupId><artifactId>tool</artifactId>\
             <version>{version}</version></project>"
        ),
    )
    .unwrap();
    std::fs::write(dir.join("tool.jar"), b"jar").unwrap();
    std::fs::write(dir.join("tool-tests.jar"), b"tests").unwrap();
}

fn options(dir: &Path) -> PublishOptions {
    PublishOptions {
        pom: dir.join("pom.xml"),
        artifact: Some(dir.join("tool.jar")),
        attachments: vec![Attachment {
            type_: "test-jar".to_string(),
            classifier: None,
            file: dir.join("tool-tests.jar"),
        }],
        ..Default::default()
    }
}

#[test]
fn deploy_uses_repository_from_config() {
    let project = TempDir::new().unwrap();
    let repo = TempDir::new().unwrap();
    write_project(project.path(), "3.1");
    std::fs::write(
        project.path().join("publish.toml"),
        format!(
            "[repositories.release]\nurl = \"file://{}\"\n",
            repo.path().display()
        ),
    )
    .unwrap();

    let summary = deploy(
        &DeployOptions {
            publish: options(project.path()),
            ..Default::default()
        },
        project.path(),
    )
    .unwrap();

    assert_eq!(summary.files, 3);
    let dir = repo.path().join("org/acme/tool/3.1");
    assert!(dir.join("tool-3.1.jar").is_file());
    assert!(dir.join("tool-3.1-tests.jar").is_file());
    assert!(dir.join("tool-3.1.pom.sha1").is_file());
}

#[test]
fn command_line_flags_override_config() {
    let project = TempDir::new().unwrap();
    let repo = TempDir::new().unwrap();
    write_project(project.path(), "0.1-SNAPSHOT");
    std::fs::write(
        project.path().join("publish.toml"),
        "[repositories.release]\nurl = \"https://unreachable.invalid/releases\"\n",
    )
    .unwrap();

    let summary = deploy(
        &DeployOptions {
            publish: options(project.path()),
            snapshot_repository: Some(format!("file://{}", repo.path().display())),
            non_unique: true,
            ..Default::default()
        },
        project.path(),
    )
    .unwrap();

    assert!(summary.artifacts.iter().all(|c| c.version == "0.1-SNAPSHOT"));
    assert!(repo
        .path()
        .join("org/acme/tool/0.1-SNAPSHOT/tool-0.1-SNAPSHOT.jar")
        .is_file());
}

#[test]
fn deploy_without_repository_fails() {
    let project = TempDir::new().unwrap();
    write_project(project.path(), "1.0");
    let err = deploy(
        &DeployOptions {
            publish: options(project.path()),
            ..Default::default()
        },
        project.path(),
    )
    .unwrap_err();
    assert!(err.to_string().contains("no repository configured"));
}

#[test]
fn install_honours_explicit_local_repository() {
    let project = TempDir::new().unwrap();
    let local = TempDir::new().unwrap();
    write_project(project.path(), "2.0");

    let mut publish = options(project.path());
    publish.attachments.push(Attachment {
        type_: "javadoc".to_string(),
        classifier: None,
        file: project.path().join("missing-javadoc.jar"),
    });
    let summary = install(
        &InstallOptions {
            publish,
            local_repository: Some(local.path().to_path_buf()),
        },
        project.path(),
    )
    .unwrap();

    assert_eq!(summary.files, 3);
    let dir = local.path().join("org/acme/tool");
    assert!(dir.join("2.0/tool-2.0-tests.jar").is_file());
    assert!(!dir.join("2.0/tool-2.0-javadoc.jar").exists());
    assert!(dir.join("maven-metadata-local.xml").is_file());
}

#[test]
fn install_rejects_non_unique_config() {
    let project = TempDir::new().unwrap();
    let local = TempDir::new().unwrap();
    write_project(project.path(), "2.0-SNAPSHOT");
    std::fs::write(
        project.path().join("publish.toml"),
        "[publish]\nunique-version = false\n",
    )
    .unwrap();

    let err = install(
        &InstallOptions {
            publish: options(project.path()),
            local_repository: Some(local.path().to_path_buf()),
        },
        project.path(),
    )
    .unwrap_err();
    assert!(err.to_string().contains("unique snapshot versions"));
    assert!(!local.path().join("org/acme/tool").exists());
}
