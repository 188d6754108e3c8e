//! CLI argument definitions for mvnpub.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use mvnpub_ops::Attachment;

#[derive(Parser, Debug)]
#[command(
    name = "mvnpub",
    version,
    about = "Publish artifacts to Maven repositories",
    long_about = "mvnpub deploys a POM, its main artifact and attached artifacts to a \
                  release or snapshot repository, or installs them into a local repository."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Use this publish.toml instead of searching for one
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Artifacts of one publication.
#[derive(Args, Debug)]
pub struct ArtifactArgs {
    /// POM describing the project
    #[arg(long, value_name = "FILE")]
    pub pom: PathBuf,

    /// Main artifact; omit for a POM-only publication
    #[arg(long, value_name = "FILE")]
    pub artifact: Option<PathBuf>,

    /// Attached artifact as type[:classifier]=file (repeatable)
    #[arg(long = "attach", value_name = "TYPE[:CLASSIFIER]=FILE")]
    pub attachments: Vec<Attachment>,

    /// Publish attachments even when their file is missing
    #[arg(long)]
    pub include_missing: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Deploy to a remote repository
    Deploy {
        #[command(flatten)]
        artifacts: ArtifactArgs,
        /// Release repository URL
        #[arg(long, value_name = "URL")]
        repository: Option<String>,
        /// Snapshot repository URL
        #[arg(long, value_name = "URL")]
        snapshot_repository: Option<String>,
        /// Deploy snapshots without timestamped versions
        #[arg(long)]
        non_unique: bool,
    },

    /// Install into the local repository
    Install {
        #[command(flatten)]
        artifacts: ArtifactArgs,
        /// Local repository root (default: ~/.m2/repository)
        #[arg(long, value_name = "DIR")]
        local_repo: Option<PathBuf>,
    },
}

pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_deploy_with_attachments() {
        let cli = Cli::try_parse_from([
            "mvnpub",
            "deploy",
            "--pom",
            "pom.xml",
            "--attach",
            "jar:sources=lib-sources.jar",
            "--attach",
            "javadoc=lib-javadoc.jar",
            "--non-unique",
        ])
        .unwrap();
        match cli.command {
            Command::Deploy {
                artifacts,
                non_unique,
                ..
            } => {
                assert!(non_unique);
                assert_eq!(artifacts.attachments.len(), 2);
                assert_eq!(artifacts.attachments[0].classifier.as_deref(), Some("sources"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn malformed_attachment_is_rejected() {
        let result = Cli::try_parse_from(["mvnpub", "install", "--pom", "p", "--attach", "x.jar"]);
        assert!(result.is_err());
    }
}
