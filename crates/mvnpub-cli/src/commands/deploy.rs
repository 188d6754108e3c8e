//! Handler for `mvnpub deploy`.

use miette::Result;
use mvnpub_ops::ops_deploy::{self, DeployOptions};
use mvnpub_ops::PublishOptions;
use mvnpub_util::errors::MvnpubError;

pub fn exec(
    publish: PublishOptions,
    repository: Option<String>,
    snapshot_repository: Option<String>,
    non_unique: bool,
) -> Result<()> {
    let cwd = std::env::current_dir().map_err(MvnpubError::Io)?;
    let options = DeployOptions {
        publish,
        repository,
        snapshot_repository,
        non_unique,
    };
    ops_deploy::deploy(&options, &cwd)?;
    Ok(())
}
