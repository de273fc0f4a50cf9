//! Local Git repository operations via `git2`.

use std::path::{Path, PathBuf};

use git2::{ConfigLevel, ErrorCode, Repository};
use tracing::{debug, info, instrument};

use crate::errors::GitError;

/// Config key controlling how git writes conflict markers.
pub const CONFLICT_STYLE_KEY: &str = "merge.conflictstyle";

/// What kind of index conflict a path has.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    /// Both sides have content; the file holds conflict markers.
    Content,
    /// One side deleted the file; there are no markers to resolve.
    DeleteModify,
}

/// A path with unmerged entries in the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictedFile {
    /// Path relative to the repository's working directory.
    pub path: PathBuf,
    pub kind: ConflictKind,
}

/// High-level client wrapping a `git2::Repository` with a working directory.
pub struct GitRepo {
    repo: Repository,
    workdir: PathBuf,
}

impl GitRepo {
    /// Open the repository containing `path`, searching parent directories.
    pub fn discover<P: AsRef<Path>>(path: P) -> Result<Self, GitError> {
        let path = path.as_ref();
        let repo = Repository::discover(path)
            .map_err(|_| GitError::RepositoryNotFound(path.display().to_string()))?;
        let workdir = repo
            .workdir()
            .ok_or_else(|| GitError::BareRepository(repo.path().display().to_string()))?
            .to_path_buf();
        info!(workdir = %workdir.display(), "opened git repository");
        Ok(Self { repo, workdir })
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// List every path with conflict entries in the index, sorted by path.
    #[instrument(skip(self))]
    pub fn conflicted_files(&self) -> Result<Vec<ConflictedFile>, GitError> {
        let index = self.repo.index()?;
        let mut files = Vec::new();

        for conflict in index.conflicts()? {
            let conflict = conflict?;
            let entry = conflict
                .our
                .as_ref()
                .or(conflict.their.as_ref())
                .or(conflict.ancestor.as_ref());
            let Some(entry) = entry else {
                continue;
            };

            let path = std::str::from_utf8(&entry.path).map_err(|_| {
                GitError::InvalidPath(String::from_utf8_lossy(&entry.path).into_owned())
            })?;
            let kind = if conflict.our.is_some() && conflict.their.is_some() {
                ConflictKind::Content
            } else {
                ConflictKind::DeleteModify
            };
            files.push(ConflictedFile {
                path: PathBuf::from(path),
                kind,
            });
        }

        files.sort_by(|a, b| a.path.cmp(&b.path));
        debug!(count = files.len(), "found conflicted files");
        Ok(files)
    }

    /// Mark a fully resolved file as merged, like `git add`.
    ///
    /// `path` is relative to the working directory.
    #[instrument(skip(self, path), fields(path = %path.display()))]
    pub fn stage(&self, path: &Path) -> Result<(), GitError> {
        let mut index = self.repo.index()?;
        index.add_path(path)?;
        index.write()?;
        info!("staged resolved file");
        Ok(())
    }

    /// Express `path` relative to the working directory, if it lies inside it.
    pub fn relative_path(&self, path: &Path) -> Option<PathBuf> {
        let absolute = path.canonicalize().ok()?;
        let workdir = self.workdir.canonicalize().ok()?;
        absolute.strip_prefix(workdir).ok().map(Path::to_path_buf)
    }

    /// The configured `merge.conflictStyle`, if any.
    pub fn conflict_style(&self) -> Result<Option<String>, GitError> {
        // Reading string values requires a snapshot of the config.
        let config = self.repo.config()?.snapshot()?;
        match config.get_string(CONFLICT_STYLE_KEY) {
            Ok(style) => Ok(Some(style)),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set `merge.conflictStyle = diff3` in the repository's local config.
    pub fn set_conflict_style_diff3(&self) -> Result<(), GitError> {
        let mut config = self.repo.config()?.open_level(ConfigLevel::Local)?;
        config.set_str(CONFLICT_STYLE_KEY, "diff3")?;
        info!("set merge.conflictstyle to diff3");
        Ok(())
    }
}

/// Whether a conflict style writes the base section the resolver relies on.
pub fn writes_base_section(style: Option<&str>) -> bool {
    matches!(style, Some("diff3") | Some("zdiff3"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discover_from_subdirectory() {
        let dir = tempfile::tempdir().unwrap();
        Repository::init(dir.path()).unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        let repo = GitRepo::discover(&nested).unwrap();
        assert_eq!(
            repo.workdir().canonicalize().unwrap(),
            dir.path().canonicalize().unwrap()
        );
        assert_eq!(
            repo.relative_path(&nested),
            Some(PathBuf::from("a").join("b"))
        );
    }

    #[test]
    fn test_no_conflicts_in_fresh_repo() {
        let dir = tempfile::tempdir().unwrap();
        Repository::init(dir.path()).unwrap();
        let repo = GitRepo::discover(dir.path()).unwrap();
        assert!(repo.conflicted_files().unwrap().is_empty());
    }

    #[test]
    fn test_conflict_style_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        Repository::init(dir.path()).unwrap();
        let repo = GitRepo::discover(dir.path()).unwrap();

        repo.set_conflict_style_diff3().unwrap();
        assert_eq!(repo.conflict_style().unwrap().as_deref(), Some("diff3"));
    }

    #[test]
    fn test_writes_base_section() {
        assert!(writes_base_section(Some("diff3")));
        assert!(writes_base_section(Some("zdiff3")));
        assert!(!writes_base_section(Some("merge")));
        assert!(!writes_base_section(None));
    }

    #[test]
    fn test_repo_not_found() {
        assert!(matches!(
            GitRepo::discover("/nonexistent"),
            Err(GitError::RepositoryNotFound(_))
        ));
    }
}
