//! Error types for the git-mediate core library.
//!
//! Each subsystem has its own error type derived with `thiserror`.

use std::fmt;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Parse errors
// ---------------------------------------------------------------------------

/// The marker a conflict block was still waiting for when input ran out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingMarker {
    Base,
    Mid,
    End,
}

impl fmt::Display for MissingMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base => write!(f, "base (|||||||)"),
            Self::Mid => write!(f, "mid (=======)"),
            Self::End => write!(f, "end (>>>>>>>)"),
        }
    }
}

/// A start marker was found but one of its counterparts never appeared.
///
/// This is the only way parsing a file can fail; the file must be left
/// untouched when it occurs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unterminated conflict starting at line {line}: missing {missing} marker")]
pub struct ParseError {
    /// 1-based line of the `<<<<<<<` marker that opened the block.
    pub line: usize,
    /// Which marker was not found before end of input.
    pub missing: MissingMarker,
}

// ---------------------------------------------------------------------------
// Git errors
// ---------------------------------------------------------------------------

/// Errors from local Git (git2) operations.
#[derive(Debug, Error)]
pub enum GitError {
    /// The path is not inside a git repository.
    #[error("git repository not found at '{0}'")]
    RepositoryNotFound(String),

    /// The repository has no working directory (bare repository).
    #[error("git repository at '{0}' is bare")]
    BareRepository(String),

    /// An index entry path was not valid UTF-8.
    #[error("index path is not valid UTF-8: {0}")]
    InvalidPath(String),

    /// A `git2` library error.
    #[error("git2 error: {0}")]
    Git2Error(#[from] git2::Error),
}

// ---------------------------------------------------------------------------
// Workspace (file) errors
// ---------------------------------------------------------------------------

/// Errors reading or replacing a conflicted file on disk.
#[derive(Debug, Error)]
pub enum WorkspaceError {
    /// The file is not valid UTF-8 text.
    #[error("'{0}' is not valid UTF-8")]
    NotUtf8(String),

    /// The file has no parent directory to stage a temporary file in.
    #[error("'{0}' has no parent directory")]
    NoParent(String),

    /// Generic I/O wrapper.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file does not exist.
    #[error("configuration file not found: {0}")]
    FileNotFound(String),

    /// TOML syntax or schema error.
    #[error("configuration parse error: {0}")]
    ParseError(String),

    /// A config value is semantically invalid.
    #[error("invalid configuration value for '{field}': {detail}")]
    InvalidValue { field: String, detail: String },

    /// Generic I/O wrapper.
    #[error("configuration I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = ParseError {
            line: 12,
            missing: MissingMarker::Base,
        };
        assert_eq!(
            err.to_string(),
            "unterminated conflict starting at line 12: missing base (|||||||) marker"
        );
    }

}
