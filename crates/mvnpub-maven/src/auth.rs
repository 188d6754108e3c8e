//! Repository and proxy authentication for HTTP transfers.
//!
//! Credentials come from `publish.toml`, typically through `${env:SECRET}`
//! interpolation from `.mvnpub.env`:
//!
//! ```toml
//! [repositories.release]
//! url = "https://nexus.co/maven"
//! username = "${env:NEXUS_USER}"
//! password = "${env:NEXUS_PASS}"
//! ```
//!
//! By the time the config is loaded, `${env:...}` values are already
//! interpolated, so this module just applies the resolved credentials.

use reqwest::blocking::RequestBuilder;
use reqwest::{NoProxy, Proxy};

use mvnpub_util::errors::{MvnpubError, MvnpubResult};

use crate::repository::{Credentials, ProxyConfig};

/// Apply repository credentials to a request.
pub fn apply_auth(request: RequestBuilder, credentials: Option<&Credentials>) -> RequestBuilder {
    match credentials {
        Some(Credentials::Basic { username, password }) => {
            request.basic_auth(username, password.as_deref())
        }
        Some(Credentials::Token { token }) => request.bearer_auth(token),
        None => request,
    }
}

/// Build the `reqwest` proxy for a repository's proxy settings.
pub fn build_proxy(config: &ProxyConfig) -> MvnpubResult<Proxy> {
    let mut proxy = Proxy::all(config.url()).map_err(|e| {
        MvnpubError::config(format!("Invalid proxy {}: {e}", config.url()))
    })?;
    match &config.credentials {
        Some(Credentials::Basic { username, password }) => {
            proxy = proxy.basic_auth(username, password.as_deref().unwrap_or_default());
        }
        Some(Credentials::Token { .. }) => {
            tracing::warn!("Proxy {} ignores token credentials", config.url());
        }
        None => {}
    }
    if !config.non_proxy_hosts.is_empty() {
        proxy = proxy.no_proxy(NoProxy::from_string(&config.non_proxy_hosts.join(",")));
    }
    Ok(proxy)
}
