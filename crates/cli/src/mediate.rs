//! Per-file mediation: read, resolve, write back, report, and stage.

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use tracing::{info, warn};

use gitmediate_core::conflict::{resolve_text, ResolutionResult};
use gitmediate_core::errors::{MissingMarker, ParseError};
use gitmediate_core::git::GitRepo;
use gitmediate_core::report::{self, FileOutcome};
use gitmediate_core::workspace;

use crate::editor;
use crate::style;

/// A file to mediate.
#[derive(Debug, Clone)]
pub struct Target {
    /// Name shown in output, normally the repo-relative path.
    pub display: String,
    /// Location on disk.
    pub path: PathBuf,
    /// Path relative to the repository workdir, when the file can be staged.
    pub stage_path: Option<PathBuf>,
}

/// Behaviour switches resolved from flags and config.
#[derive(Debug, Clone, Default)]
pub struct Options {
    pub dump_diffs: bool,
    pub stage: bool,
    /// Editor command to open on files that remain conflicted.
    pub editor: Option<String>,
}

/// Totals over a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub files: usize,
    pub failed: usize,
    pub resolved: usize,
    pub unresolved: usize,
}

impl Summary {
    /// Whether every file parsed and no conflict remains.
    pub fn is_clean(&self) -> bool {
        self.failed == 0 && self.unresolved == 0
    }
}

/// Mediate every target in order. A failure on one file is reported and
/// does not stop the others.
pub fn mediate_all(targets: &[Target], repo: Option<&GitRepo>, opts: &Options) -> Summary {
    let mut summary = Summary::default();
    for target in targets {
        summary.files += 1;
        match mediate_file(target, repo, opts) {
            Ok(result) => {
                summary.resolved += result.resolved_count;
                summary.unresolved += result.unresolved_count;
            }
            Err(e) => {
                warn!(file = %target.display, error = %e, "mediation failed");
                eprintln!("{}", style::error(&format!("{}: {:#}", target.display, e)));
                summary.failed += 1;
            }
        }
    }
    info!(?summary, "mediation finished");
    summary
}

fn mediate_file(target: &Target, repo: Option<&GitRepo>, opts: &Options) -> Result<ResolutionResult> {
    let text = workspace::read_conflicted(&target.path)?;
    let result = resolve_text(&text).map_err(explain_parse_error)?;

    if result.resolved_count > 0 {
        workspace::replace_atomically(&target.path, &result.content)?;
    }

    let outcome = FileOutcome::of(&result);
    let line = report::summary_line(&target.display, &result);
    let line = match outcome {
        FileOutcome::NoConflicts => line,
        FileOutcome::Resolved { .. } => style::success(&line),
        FileOutcome::Partial { .. } => style::warn(&line),
        FileOutcome::NoneResolved { .. } => style::error(&line),
    };
    println!("{line}");

    if opts.dump_diffs {
        for diff in &result.diffs {
            println!("{}", style::header(&report::diff_header(&target.display, diff)));
            for op in &diff.edits {
                println!("{}", style::diff_op(op));
            }
        }
    }

    if !outcome.is_conflicted() && opts.stage {
        if let (Some(repo), Some(stage_path)) = (repo, target.stage_path.as_deref()) {
            repo.stage(stage_path)
                .with_context(|| format!("failed to stage {}", target.display))?;
        }
    }

    if let (Some(editor), Some(line)) = (opts.editor.as_deref(), result.first_unresolved_line()) {
        editor::open_at(editor, &target.path, line)?;
    }

    Ok(result)
}

fn explain_parse_error(e: ParseError) -> anyhow::Error {
    match e.missing {
        MissingMarker::Base => anyhow!(
            "{e} (conflicts need a base section; run `git mediate --set-conflict-style` and redo the merge)"
        ),
        MissingMarker::Mid | MissingMarker::End => anyhow!(e),
    }
}
