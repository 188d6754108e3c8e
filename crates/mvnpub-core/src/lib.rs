//! Core configuration types for mvnpub.
//!
//! This crate defines how a publishing setup is described on disk:
//! the `publish.toml` file, its repository entries (with credentials and
//! proxies), artifact type overrides, and `${env:VAR}` interpolation of
//! secrets.
//!
//! This crate is intentionally free of network I/O.

/// Name of the configuration file looked up from the working directory.
pub const CONFIG_FILE_NAME: &str = "publish.toml";

/// Name of the secrets file read alongside [`CONFIG_FILE_NAME`].
pub const ENV_FILE_NAME: &str = ".mvnpub.env";

pub mod config;
pub mod properties;
