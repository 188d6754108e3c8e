//! Maven repository publishing: artifact identity, snapshot versioning,
//! repository metadata, transports, and the deploy/install actions that tie
//! them together.

pub mod action;
pub mod artifact;
pub mod artifact_type;
pub mod auth;
pub mod checksum;
pub mod coordinate;
pub mod deploy;
pub mod generator;
pub mod http;
pub mod identity;
pub mod install;
pub mod metadata;
pub mod pom;
pub mod publish;
pub mod repository;
pub mod request;
pub mod snapshot;
pub mod system;
pub mod transport;
