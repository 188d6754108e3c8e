//! Handler for `mvnpub install`.

use std::path::PathBuf;

use miette::Result;
use mvnpub_ops::ops_install::{self, InstallOptions};
use mvnpub_ops::PublishOptions;
use mvnpub_util::errors::MvnpubError;

pub fn exec(publish: PublishOptions, local_repository: Option<PathBuf>) -> Result<()> {
    let cwd = std::env::current_dir().map_err(MvnpubError::Io)?;
    ops_install::install(
        &InstallOptions {
            publish,
            local_repository,
        },
        &cwd,
    )?;
    Ok(())
}
