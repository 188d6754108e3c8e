//! Artifact upload to HTTP(S) repositories.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;

use mvnpub_util::errors::{MvnpubError, MvnpubResult};

use crate::auth;
use crate::repository::{Credentials, RemoteRepository};
use crate::transport::Transport;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Build the blocking HTTP client for a repository, honouring its proxy.
pub fn build_client(repo: &RemoteRepository) -> MvnpubResult<Client> {
    let mut builder = Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(concat!("mvnpub/", env!("CARGO_PKG_VERSION")));
    if let Some(proxy) = &repo.proxy {
        builder = builder.proxy(auth::build_proxy(proxy)?);
    }
    builder.build().map_err(|e| MvnpubError::Network {
        message: format!("Failed to create HTTP client: {e}"),
    })
}

/// [`Transport`] issuing `GET`/`PUT` requests below a repository URL.
#[derive(Debug)]
pub struct HttpTransport {
    client: Client,
    repository: RemoteRepository,
}

impl HttpTransport {
    pub fn new(repo: &RemoteRepository) -> MvnpubResult<Self> {
        Ok(Self {
            client: build_client(repo)?,
            repository: repo.clone(),
        })
    }

    fn credentials(&self) -> Option<&Credentials> {
        self.repository.credentials.as_ref()
    }
}

impl Transport for HttpTransport {
    fn location(&self) -> &str {
        &self.repository.url
    }

    fn get(&self, path: &str) -> MvnpubResult<Option<Vec<u8>>> {
        let url = self.repository.file_url(path);
        let request = auth::apply_auth(self.client.get(&url), self.credentials());
        let resp = request.send().map_err(|e| MvnpubError::Network {
            message: format!("Request to {url} failed: {e}"),
        })?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(MvnpubError::Network {
                message: format!("HTTP {status} fetching {url}"),
            });
        }

        let bytes = resp.bytes().map_err(|e| MvnpubError::Network {
            message: format!("Failed to read response from {url}: {e}"),
        })?;
        Ok(Some(bytes.to_vec()))
    }

    fn put(&self, path: &str, data: &[u8]) -> MvnpubResult<()> {
        let url = self.repository.file_url(path);
        tracing::info!("Uploading {url} ({} bytes)", data.len());

        let request = auth::apply_auth(self.client.put(&url), self.credentials());
        let resp = request
            .body(data.to_vec())
            .send()
            .map_err(|e| MvnpubError::Network {
                message: format!("Upload to {url} failed: {e}"),
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(MvnpubError::Network {
                message: format!("HTTP {status} uploading {url}"),
            });
        }
        Ok(())
    }
}
