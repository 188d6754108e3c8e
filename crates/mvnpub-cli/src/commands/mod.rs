//! Command dispatch and handler modules.

mod deploy;
mod install;

use miette::Result;
use mvnpub_ops::PublishOptions;

use crate::cli::{ArtifactArgs, Cli, Command};

/// Route a parsed CLI invocation to the appropriate command handler.
pub fn dispatch(cli: Cli) -> Result<()> {
    tracing::debug!("{cli:?}");
    match cli.command {
        Command::Deploy {
            artifacts,
            repository,
            snapshot_repository,
            non_unique,
        } => deploy::exec(
            publish_options(artifacts, cli.config),
            repository,
            snapshot_repository,
            non_unique,
        ),
        Command::Install {
            artifacts,
            local_repo,
        } => install::exec(publish_options(artifacts, cli.config), local_repo),
    }
}

fn publish_options(args: ArtifactArgs, config: Option<std::path::PathBuf>) -> PublishOptions {
    PublishOptions {
        pom: args.pom,
        artifact: args.artifact,
        attachments: args.attachments,
        include_missing: args.include_missing,
        config,
    }
}
