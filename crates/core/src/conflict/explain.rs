//! Line diffs explaining unresolved conflicts.
//!
//! For each non-empty side of a conflict we compute the edit script that turns
//! the base section into that side, using `diffy` (Myers' algorithm, which
//! yields a minimal keep/insert/delete script).

use std::fmt;

use diffy::{DiffOptions, Line};

use super::parser::Conflict;

/// One side of a conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Ours,
    Theirs,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ours => write!(f, "Ours"),
            Self::Theirs => write!(f, "Theirs"),
        }
    }
}

/// A single step of an edit script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffOp {
    Keep(String),
    Insert(String),
    Delete(String),
}

impl DiffOp {
    /// The line this op refers to.
    pub fn line(&self) -> &str {
        match self {
            Self::Keep(l) | Self::Insert(l) | Self::Delete(l) => l,
        }
    }

    /// Unified-diff style prefix character.
    pub fn prefix(&self) -> char {
        match self {
            Self::Keep(_) => ' ',
            Self::Insert(_) => '+',
            Self::Delete(_) => '-',
        }
    }
}

/// The diff of one conflict side against its base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideDiff {
    pub side: Side,
    /// Line of the conflict's start marker in the original file.
    pub line_number: usize,
    pub edits: Vec<DiffOp>,
}

/// Compute the edit script turning `base` into `side`.
pub fn diff_lines(base: &[String], side: &[String]) -> Vec<DiffOp> {
    let original = join_lines(base);
    let modified = join_lines(side);

    // Enough context that the single hunk spans every line of both inputs.
    let context = base.len().max(side.len()) + 1;
    let patch = DiffOptions::new()
        .set_context_len(context)
        .create_patch(&original, &modified);

    let ops: Vec<DiffOp> = patch
        .hunks()
        .iter()
        .flat_map(|hunk| hunk.lines())
        .map(|line| match line {
            Line::Context(l) => DiffOp::Keep(strip_newline(l)),
            Line::Insert(l) => DiffOp::Insert(strip_newline(l)),
            Line::Delete(l) => DiffOp::Delete(strip_newline(l)),
        })
        .collect();

    if ops.is_empty() {
        // No hunks: the inputs are identical.
        return base.iter().cloned().map(DiffOp::Keep).collect();
    }
    ops
}

/// Diffs for each non-empty side of an unresolved conflict, ours first.
pub fn explain(conflict: &Conflict) -> Vec<SideDiff> {
    [
        (Side::Ours, &conflict.ours),
        (Side::Theirs, &conflict.theirs),
    ]
    .into_iter()
    .filter(|(_, lines)| !lines.is_empty())
    .map(|(side, lines)| SideDiff {
        side,
        line_number: conflict.line_number,
        edits: diff_lines(&conflict.base, lines),
    })
    .collect()
}

fn join_lines(lines: &[String]) -> String {
    let mut text = String::with_capacity(lines.iter().map(|l| l.len() + 1).sum());
    for line in lines {
        text.push_str(line);
        text.push('\n');
    }
    text
}

fn strip_newline(line: &str) -> String {
    line.strip_suffix('\n').unwrap_or(line).to_string()
}
