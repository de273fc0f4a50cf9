//! Reassembly of a parsed file into its resolved content.
//!
//! Literal lines pass through, resolvable conflicts are replaced by their
//! resolution, and the rest are written back verbatim while their diffs are
//! collected for display.

use tracing::debug;

use super::explain::{explain, SideDiff};
use super::parser::{parse, push_line, ParsedUnit};
use super::resolver::resolve;
use crate::errors::ParseError;

/// Aggregate outcome of resolving one file.
///
/// Results combine associatively with [`ResolutionResult::combine`]: counts
/// add up, while content and diffs are concatenated in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionResult {
    pub resolved_count: usize,
    pub unresolved_count: usize,
    /// The new file content. Remaining conflicts are reproduced verbatim.
    pub content: String,
    /// Diffs for every side of every unresolved conflict, in file order.
    pub diffs: Vec<SideDiff>,
    line_count: usize,
    unresolved_lines: Vec<usize>,
}

impl ResolutionResult {
    /// The result contributed by a single parsed unit.
    pub fn from_unit(unit: &ParsedUnit) -> Self {
        let mut result = Self::default();
        match unit {
            ParsedUnit::Line(line) => result.push(line),
            ParsedUnit::Conflict(conflict) => match resolve(conflict) {
                Some(lines) => {
                    lines.iter().for_each(|l| result.push(l));
                    result.resolved_count = 1;
                }
                None => {
                    result.unresolved_lines.push(1);
                    conflict.render_into(&mut result.content);
                    result.line_count = conflict.line_count();
                    result.unresolved_count = 1;
                    result.diffs = explain(conflict);
                }
            },
        }
        result
    }

    /// Append `other` after `self`.
    pub fn combine(mut self, other: Self) -> Self {
        let offset = self.line_count;
        self.resolved_count += other.resolved_count;
        self.unresolved_count += other.unresolved_count;
        self.content.push_str(&other.content);
        self.diffs.extend(other.diffs);
        self.unresolved_lines
            .extend(other.unresolved_lines.into_iter().map(|l| l + offset));
        self.line_count += other.line_count;
        self
    }

    /// Total number of conflicts seen.
    pub fn conflict_count(&self) -> usize {
        self.resolved_count + self.unresolved_count
    }

    /// Number of lines in [`Self::content`].
    pub fn line_count(&self) -> usize {
        self.line_count
    }

    /// Where the first remaining conflict starts in the new content.
    pub fn first_unresolved_line(&self) -> Option<usize> {
        self.unresolved_lines.first().copied()
    }

    fn push(&mut self, line: &str) {
        push_line(&mut self.content, line);
        self.line_count += 1;
    }
}

/// Fold parsed units, in order, into a single result.
pub fn assemble(units: &[ParsedUnit]) -> ResolutionResult {
    let result = units
        .iter()
        .map(ResolutionResult::from_unit)
        .fold(ResolutionResult::default(), ResolutionResult::combine);
    debug!(
        resolved = result.resolved_count,
        unresolved = result.unresolved_count,
        "assembled content"
    );
    result
}

/// Parse and resolve a whole file's text.
///
/// On a parse error nothing is produced; the caller must leave the file as
/// it is.
pub fn resolve_text(text: &str) -> Result<ResolutionResult, ParseError> {
    let units = parse(text)?;
    Ok(assemble(&units))
}
