//! Launching the user's editor on files that still have conflicts.

use std::path::Path;
use std::process::Command;

use anyhow::{bail, Context, Result};
use tracing::info;

/// Environment variables consulted for an editor, in priority order.
const EDITOR_VARS: &[&str] = &["GIT_EDITOR", "VISUAL", "EDITOR"];

const FALLBACK_EDITOR: &str = "vi";

/// Pick the editor command: config first, then the environment, then `vi`.
pub fn editor_command(configured: Option<&str>) -> String {
    configured
        .map(str::to_string)
        .or_else(|| {
            EDITOR_VARS
                .iter()
                .filter_map(|var| std::env::var(var).ok())
                .find(|value| !value.trim().is_empty())
        })
        .unwrap_or_else(|| FALLBACK_EDITOR.to_string())
}

/// Open `path` in `editor`, positioned at `line`, and wait for it to exit.
///
/// The command may carry its own arguments (e.g. `code --wait`); they are
/// split on whitespace and placed before `+LINE FILE`.
pub fn open_at(editor: &str, path: &Path, line: usize) -> Result<()> {
    let mut parts = editor.split_whitespace();
    let program = parts.next().context("editor command is empty")?;

    info!(editor = program, path = %path.display(), line, "launching editor");
    let status = Command::new(program)
        .args(parts)
        .arg(format!("+{line}"))
        .arg(path)
        .status()
        .with_context(|| format!("failed to launch editor '{editor}'"))?;

    if !status.success() {
        bail!("editor '{}' exited with {}", editor, status);
    }
    Ok(())
}
