use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use mvnpub_util::errors::{MvnpubError, MvnpubResult};
use mvnpub_util::fs::{expand_home, find_ancestor_with};

use crate::{properties, CONFIG_FILE_NAME, ENV_FILE_NAME};

/// Publishing configuration loaded from `publish.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PublishConfig {
    #[serde(default)]
    pub publish: PublishSettings,

    #[serde(default)]
    pub repositories: RepositoriesConfig,

    /// Extra or overriding artifact types, keyed by type name.
    #[serde(default)]
    pub types: BTreeMap<String, TypeEntry>,
}

/// Settings from `[publish]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishSettings {
    /// Give every deployed snapshot a timestamped file name.
    #[serde(default = "default_unique_version", rename = "unique-version")]
    pub unique_version: bool,

    #[serde(default, rename = "missing-artifacts")]
    pub missing_artifacts: MissingArtifactPolicy,

    #[serde(default = "default_local_repository", rename = "local-repository")]
    pub local_repository: String,
}

impl Default for PublishSettings {
    fn default() -> Self {
        Self {
            unique_version: default_unique_version(),
            missing_artifacts: MissingArtifactPolicy::default(),
            local_repository: default_local_repository(),
        }
    }
}

fn default_unique_version() -> bool {
    true
}

fn default_local_repository() -> String {
    "~/.m2/repository".to_string()
}

/// What to do with an attached artifact whose file does not exist when the
/// publication is assembled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingArtifactPolicy {
    /// Leave it out of the publication (declared but never produced).
    #[default]
    Skip,
    /// Keep it; the transport reports the missing file.
    Include,
}

/// Repositories from `[repositories]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepositoriesConfig {
    #[serde(default)]
    pub release: Option<RepositoryEntry>,
    #[serde(default)]
    pub snapshot: Option<RepositoryEntry>,
}

/// A remote repository definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryEntry {
    pub url: String,
    #[serde(default = "default_layout")]
    pub layout: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    /// Bearer token, used when no username is configured.
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub proxy: Option<ProxyEntry>,
}

fn default_layout() -> String {
    "default".to_string()
}

/// Proxy settings for a repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyEntry {
    #[serde(default = "default_proxy_protocol")]
    pub protocol: String,
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default, rename = "non-proxy-hosts")]
    pub non_proxy_hosts: Vec<String>,
}

fn default_proxy_protocol() -> String {
    "http".to_string()
}

/// An artifact type from `[types.<name>]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeEntry {
    pub extension: String,
    #[serde(default)]
    pub classifier: Option<String>,
}

impl PublishConfig {
    /// Load and parse a `publish.toml` file.
    ///
    /// Before parsing, `${env:VAR}` references are resolved using
    /// `.mvnpub.env` (if present alongside the file) and the process
    /// environment.
    pub fn from_path(path: &Path) -> MvnpubResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            MvnpubError::config(format!("Failed to read {}: {e}", path.display()))
        })?;

        let dir = path.parent().unwrap_or(Path::new("."));
        let env_vars = properties::load_env_file(&dir.join(ENV_FILE_NAME)).unwrap_or_default();
        let resolved = properties::interpolate(&content, &env_vars);

        Self::from_str(&resolved)
    }

    /// Parse a `publish.toml` from a string (no interpolation).
    pub fn from_str(content: &str) -> MvnpubResult<Self> {
        toml::from_str(content)
            .map_err(|e| MvnpubError::config(format!("Failed to parse {CONFIG_FILE_NAME}: {e}")))
    }

    /// Find `publish.toml` in `start` or one of its ancestors and load it,
    /// or return defaults when there is none.
    pub fn discover(start: &Path) -> MvnpubResult<Self> {
        match find_ancestor_with(start, CONFIG_FILE_NAME) {
            Some(dir) => {
                let path = dir.join(CONFIG_FILE_NAME);
                tracing::debug!("Using configuration {}", path.display());
                Self::from_path(&path)
            }
            None => Ok(Self::default()),
        }
    }

    /// The local repository root with `~` expanded.
    pub fn local_repository_path(&self) -> PathBuf {
        expand_home(&self.publish.local_repository)
    }
}
