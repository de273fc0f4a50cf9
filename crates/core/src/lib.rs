//! git-mediate core library.
//!
//! This crate resolves trivial diff3 merge conflicts: it parses conflict
//! markers, settles blocks where one side is unchanged or both sides agree,
//! explains the rest with per-side diffs, and provides the surrounding
//! pieces (configuration, git index access, atomic file replacement, and
//! reporting) used by the `git-mediate` binary.

pub mod config;
pub mod conflict;
pub mod errors;
pub mod git;
pub mod report;
pub mod workspace;

// Re-exports for convenience.
pub use config::MediateConfig;
pub use conflict::{resolve_text, ResolutionResult};
pub use errors::ParseError;
pub use git::GitRepo;
