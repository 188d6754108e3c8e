//! Shared utilities for mvnpub.
//!
//! This crate provides cross-cutting concerns used by all other mvnpub crates:
//! the error taxonomy, filesystem helpers, checksum hashing for repository
//! sidecar files, and terminal status output.

pub mod errors;
pub mod fs;
pub mod hash;
pub mod progress;
