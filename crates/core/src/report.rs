//! Human-readable per-file summaries and diff dumps.
//!
//! These produce plain text only; the CLI decides how to color it.

use crate::conflict::{DiffOp, ResolutionResult, SideDiff};

/// How a file fared, derived from its [`ResolutionResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    /// The file contained no conflict blocks.
    NoConflicts,
    /// Every conflict was resolved.
    Resolved { resolved: usize },
    /// Some conflicts were resolved and some remain.
    Partial { resolved: usize, unresolved: usize },
    /// Conflicts exist but none could be resolved.
    NoneResolved { unresolved: usize },
}

impl FileOutcome {
    pub fn of(result: &ResolutionResult) -> Self {
        match (result.resolved_count, result.unresolved_count) {
            (0, 0) => Self::NoConflicts,
            (resolved, 0) => Self::Resolved { resolved },
            (0, unresolved) => Self::NoneResolved { unresolved },
            (resolved, unresolved) => Self::Partial {
                resolved,
                unresolved,
            },
        }
    }

    /// Whether any conflict remains in the file.
    pub fn is_conflicted(self) -> bool {
        matches!(self, Self::Partial { .. } | Self::NoneResolved { .. })
    }
}

/// The one-line summary printed for each processed file.
pub fn summary_line(file: &str, result: &ResolutionResult) -> String {
    match FileOutcome::of(result) {
        FileOutcome::NoConflicts => format!("{file}: No conflicts"),
        FileOutcome::NoneResolved { unresolved } => {
            format!("{file}: Failed to resolve any of the {unresolved} conflicts")
        }
        FileOutcome::Resolved { resolved } => {
            format!("{file}: Successfully resolved {resolved} conflicts")
        }
        FileOutcome::Partial {
            resolved,
            unresolved,
        } => format!(
            "{file}: Successfully resolved {resolved} conflicts (failed to resolve {unresolved} conflicts)"
        ),
    }
}

/// Header line introducing one side's diff, e.g. `src/lib.rs:42:DiffOurs`.
pub fn diff_header(file: &str, diff: &SideDiff) -> String {
    format!("{file}:{}:Diff{}", diff.line_number, diff.side)
}

/// Render a single op as `+line`, `-line`, or ` line`.
pub fn render_op(op: &DiffOp) -> String {
    format!("{}{}", op.prefix(), op.line())
}
