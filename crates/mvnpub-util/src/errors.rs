use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all mvnpub operations.
#[derive(Debug, Error, Diagnostic)]
pub enum MvnpubError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing repository, conflicting unique-version setting, malformed POM
    /// or config file.
    #[error("Configuration error: {message}")]
    #[diagnostic(help("Check publish.toml and the POM being published"))]
    Configuration { message: String },

    /// The transport failed while publishing to `repository`.
    #[error("Failed to publish {artifact_count} artifact(s) to {repository}")]
    Transfer {
        repository: String,
        artifact_count: usize,
        #[source]
        source: Box<MvnpubError>,
    },

    /// An action was used out of order (published twice, modified after publish).
    #[error("Invalid state: {message}")]
    State { message: String },

    /// Network request or upload failed.
    #[error("Network error: {message}")]
    Network { message: String },

    /// A `maven-metadata.xml` document could not be read or written.
    #[error("Metadata error: {message}")]
    Metadata { message: String },
}

impl MvnpubError {
    /// Shorthand for a [`MvnpubError::Configuration`] error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Shorthand for a [`MvnpubError::State`] error.
    pub fn state(message: impl Into<String>) -> Self {
        Self::State {
            message: message.into(),
        }
    }
}

/// Result alias for library operations that callers may want to match on.
pub type MvnpubResult<T> = Result<T, MvnpubError>;
