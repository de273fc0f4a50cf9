//! Git repository access: conflicted paths, staging, and merge config.

pub mod client;

pub use client::{writes_base_section, ConflictKind, ConflictedFile, GitRepo};
