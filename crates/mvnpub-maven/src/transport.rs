//! Byte-level access to a repository: read and write repository-relative
//! paths.

use std::path::{Path, PathBuf};

use mvnpub_util::errors::{MvnpubError, MvnpubResult};
use mvnpub_util::fs::write_with_parents;

use crate::http::HttpTransport;
use crate::repository::RemoteRepository;

pub trait Transport {
    /// Where this transport writes, for log and error messages.
    fn location(&self) -> &str;

    /// Read a file, or `None` when the repository has no such file.
    fn get(&self, path: &str) -> MvnpubResult<Option<Vec<u8>>>;

    fn put(&self, path: &str, data: &[u8]) -> MvnpubResult<()>;
}

/// Pick the transport for a repository URL: `file://` writes to disk,
/// `http(s)://` uploads.
pub fn for_repository(repo: &RemoteRepository) -> MvnpubResult<Box<dyn Transport>> {
    if let Some(dir) = repo.local_path() {
        return Ok(Box::new(FileTransport::new(&dir)));
    }
    if repo.url.starts_with("http://") || repo.url.starts_with("https://") {
        return Ok(Box::new(HttpTransport::new(repo)?));
    }
    Err(MvnpubError::config(format!(
        "Unsupported repository URL {} (expected file://, http:// or https://)",
        repo.url
    )))
}

/// Transport over a directory in the local filesystem.
#[derive(Debug, Clone)]
pub struct FileTransport {
    root: PathBuf,
    location: String,
}

impl FileTransport {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            location: root.display().to_string(),
        }
    }
}

impl Transport for FileTransport {
    fn location(&self) -> &str {
        &self.location
    }

    fn get(&self, path: &str) -> MvnpubResult<Option<Vec<u8>>> {
        let file = self.root.join(path);
        if !file.is_file() {
            return Ok(None);
        }
        std::fs::read(&file).map(Some).map_err(MvnpubError::Io)
    }

    fn put(&self, path: &str, data: &[u8]) -> MvnpubResult<()> {
        let file = self.root.join(path);
        tracing::debug!("Writing {}", file.display());
        write_with_parents(&file, data).map_err(MvnpubError::Io)
    }
}
