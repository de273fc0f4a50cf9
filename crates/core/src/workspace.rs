//! Reading conflicted files and replacing them atomically.
//!
//! New content is written to a temporary file next to the original and then
//! renamed over it, so a failure at any point leaves the original intact.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::errors::WorkspaceError;

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> WorkspaceError + '_ {
    move |source| WorkspaceError::Io {
        path: path.display().to_string(),
        source,
    }
}

/// Read a file that is expected to contain conflict markers.
pub fn read_conflicted(path: &Path) -> Result<String, WorkspaceError> {
    let bytes = std::fs::read(path).map_err(io_error(path))?;
    String::from_utf8(bytes).map_err(|_| WorkspaceError::NotUtf8(path.display().to_string()))
}

/// Replace the contents of `path` with `content` via write-then-rename.
///
/// The original file's permissions are carried over to the new file.
pub fn replace_atomically(path: &Path, content: &str) -> Result<(), WorkspaceError> {
    let parent = match path.parent() {
        Some(p) if p.as_os_str().is_empty() => Path::new("."),
        Some(p) => p,
        None => return Err(WorkspaceError::NoParent(path.display().to_string())),
    };

    let permissions = std::fs::metadata(path)
        .map_err(io_error(path))?
        .permissions();

    let mut tmp = NamedTempFile::new_in(parent).map_err(io_error(parent))?;
    debug!(tmp = %tmp.path().display(), "writing resolved content");
    tmp.write_all(content.as_bytes()).map_err(io_error(path))?;
    tmp.as_file().sync_all().map_err(io_error(path))?;
    std::fs::set_permissions(tmp.path(), permissions).map_err(io_error(path))?;

    tmp.persist(path).map_err(|e| io_error(path)(e.error))?;
    info!(path = %path.display(), "replaced file");
    Ok(())
}
