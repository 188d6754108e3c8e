//! Remote repository definitions and release/snapshot target selection.

use std::path::PathBuf;

use mvnpub_core::config::{ProxyEntry, RepositoriesConfig, RepositoryEntry};
use mvnpub_util::errors::{MvnpubError, MvnpubResult};

/// The only repository layout publishing supports.
pub const DEFAULT_LAYOUT: &str = "default";

/// Credentials presented to a repository or proxy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    Basic {
        username: String,
        password: Option<String>,
    },
    Token {
        token: String,
    },
}

impl Credentials {
    /// Credentials from the optional username/password/token triple of a
    /// config entry. A username selects basic auth; otherwise a token (or a
    /// lone password) is sent as a bearer token.
    pub fn from_parts(
        username: Option<&str>,
        password: Option<&str>,
        token: Option<&str>,
    ) -> Option<Self> {
        match (username, password, token) {
            (Some(user), pass, _) => Some(Self::Basic {
                username: user.to_string(),
                password: pass.map(str::to_string),
            }),
            (None, _, Some(token)) | (None, Some(token), None) => Some(Self::Token {
                token: token.to_string(),
            }),
            (None, None, None) => None,
        }
    }
}

/// An HTTP proxy in front of a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    pub protocol: String,
    pub host: String,
    pub port: u16,
    pub credentials: Option<Credentials>,
    pub non_proxy_hosts: Vec<String>,
}

impl ProxyConfig {
    pub fn from_entry(entry: &ProxyEntry) -> Self {
        Self {
            protocol: entry.protocol.clone(),
            host: entry.host.clone(),
            port: entry.port,
            credentials: Credentials::from_parts(
                entry.username.as_deref(),
                entry.password.as_deref(),
                None,
            ),
            non_proxy_hosts: entry.non_proxy_hosts.clone(),
        }
    }

    pub fn url(&self) -> String {
        format!("{}://{}:{}", self.protocol, self.host, self.port)
    }
}

/// A repository that artifacts can be deployed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRepository {
    pub id: String,
    pub url: String,
    pub layout: String,
    pub credentials: Option<Credentials>,
    pub proxy: Option<ProxyConfig>,
}

impl RemoteRepository {
    pub fn new(id: &str, url: &str) -> Self {
        Self {
            id: id.to_string(),
            url: url.trim_end_matches('/').to_string(),
            layout: DEFAULT_LAYOUT.to_string(),
            credentials: None,
            proxy: None,
        }
    }

    /// Build a `RemoteRepository` from a name and a config `RepositoryEntry`.
    pub fn from_entry(id: &str, entry: &RepositoryEntry) -> Self {
        Self {
            id: id.to_string(),
            url: entry.url.trim_end_matches('/').to_string(),
            layout: entry.layout.clone(),
            credentials: Credentials::from_parts(
                entry.username.as_deref(),
                entry.password.as_deref(),
                entry.token.as_deref(),
            ),
            proxy: entry.proxy.as_ref().map(ProxyConfig::from_entry),
        }
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Full URL of a repository-relative path.
    pub fn file_url(&self, path: &str) -> String {
        format!("{}/{}", self.url, path.trim_start_matches('/'))
    }

    /// The directory behind a `file://` URL, or `None` for remote URLs.
    pub fn local_path(&self) -> Option<PathBuf> {
        self.url.strip_prefix("file://").map(PathBuf::from)
    }

    /// Whether this repository has authentication configured.
    pub fn has_auth(&self) -> bool {
        self.credentials.is_some()
    }
}

/// Where a publication goes: a release repository and an optional snapshot
/// repository.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryTarget {
    pub release: Option<RemoteRepository>,
    pub snapshot: Option<RemoteRepository>,
}

impl RepositoryTarget {
    pub fn new(release: Option<RemoteRepository>, snapshot: Option<RemoteRepository>) -> Self {
        Self { release, snapshot }
    }

    pub fn from_config(config: &RepositoriesConfig) -> Self {
        Self {
            release: config
                .release
                .as_ref()
                .map(|e| RemoteRepository::from_entry("release", e)),
            snapshot: config
                .snapshot
                .as_ref()
                .map(|e| RemoteRepository::from_entry("snapshot", e)),
        }
    }

    /// The repository a publication of the given version class goes to.
    pub fn select(&self, is_snapshot: bool) -> MvnpubResult<&RemoteRepository> {
        select(is_snapshot, self.release.as_ref(), self.snapshot.as_ref())
    }
}

/// Snapshot publications go to `snapshot` when it is set; everything else,
/// including snapshots without a snapshot repository, goes to `release`.
pub fn select<'a>(
    is_snapshot: bool,
    release: Option<&'a RemoteRepository>,
    snapshot: Option<&'a RemoteRepository>,
) -> MvnpubResult<&'a RemoteRepository> {
    let chosen = match (is_snapshot, snapshot) {
        (true, Some(repo)) => Some(repo),
        _ => release,
    };
    chosen.ok_or_else(|| MvnpubError::config("no repository configured for publish"))
}
