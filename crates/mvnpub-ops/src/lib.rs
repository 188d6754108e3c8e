//! Operations behind `mvnpub deploy` and `mvnpub install`: load
//! `publish.toml`, layer command-line overrides on top, and drive a publish
//! action.

pub mod ops_deploy;
pub mod ops_install;

use std::path::{Path, PathBuf};
use std::str::FromStr;

use mvnpub_core::config::{MissingArtifactPolicy, PublishConfig};
use mvnpub_maven::action::MavenPublishAction;
use mvnpub_util::errors::{MvnpubError, MvnpubResult};

/// An attached artifact given as `type[:classifier]=file`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub type_: String,
    pub classifier: Option<String>,
    pub file: PathBuf,
}

impl FromStr for Attachment {
    type Err = MvnpubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, file) = s.split_once('=').ok_or_else(|| {
            MvnpubError::config(format!(
                "Invalid attachment '{s}' (expected type[:classifier]=file)"
            ))
        })?;
        let (type_, classifier) = match kind.split_once(':') {
            Some((t, c)) => (t, Some(c)),
            None => (kind, None),
        };
        if type_.is_empty() || file.is_empty() {
            return Err(MvnpubError::config(format!(
                "Invalid attachment '{s}' (expected type[:classifier]=file)"
            )));
        }
        Ok(Self {
            type_: type_.to_string(),
            classifier: classifier.filter(|c| !c.is_empty()).map(str::to_string),
            file: PathBuf::from(file),
        })
    }
}

/// Inputs common to deploy and install.
#[derive(Debug, Clone, Default)]
pub struct PublishOptions {
    pub pom: PathBuf,
    pub artifact: Option<PathBuf>,
    pub attachments: Vec<Attachment>,
    /// Keep attachments whose file is missing instead of skipping them.
    pub include_missing: bool,
    /// Explicit `publish.toml`; otherwise it is searched for upwards.
    pub config: Option<PathBuf>,
}

/// Load the explicit config file, or discover one from `cwd`.
pub fn load_config(explicit: Option<&Path>, cwd: &Path) -> MvnpubResult<PublishConfig> {
    match explicit {
        Some(path) => PublishConfig::from_path(path),
        None => PublishConfig::discover(cwd),
    }
}

/// Bind the main artifact, attachments and missing-file policy.
fn configure_artifacts(
    action: &mut dyn MavenPublishAction,
    options: &PublishOptions,
    config: &PublishConfig,
) -> MvnpubResult<()> {
    let policy = if options.include_missing {
        MissingArtifactPolicy::Include
    } else {
        config.publish.missing_artifacts
    };
    action.set_missing_artifact_policy(policy)?;

    if let Some(file) = &options.artifact {
        action.set_main_artifact(file)?;
    }
    for attachment in &options.attachments {
        action.add_additional_artifact(
            &attachment.file,
            &attachment.type_,
            attachment.classifier.as_deref(),
        )?;
    }
    Ok(())
}
