//! Trivial conflict resolution.
//!
//! A conflict is resolvable when one side left the base untouched (the other
//! side's version wins) or when both sides made the identical change. All
//! comparisons are exact line-sequence equality.

use std::fmt;

use tracing::debug;

use super::parser::Conflict;

/// Which rule settled a conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Ours equals base, so theirs wins.
    OursUnchanged,
    /// Theirs equals base, so ours wins.
    TheirsUnchanged,
    /// Both sides made the same change.
    Converged,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OursUnchanged => write!(f, "ours unchanged, taking theirs"),
            Self::TheirsUnchanged => write!(f, "theirs unchanged, taking ours"),
            Self::Converged => write!(f, "both sides identical"),
        }
    }
}

/// Resolve a conflict, reporting the rule that applied.
///
/// Rules are tried in order: ours unchanged, theirs unchanged, converged.
/// When all three sections are equal the first rule wins, which yields the
/// same lines as the third would.
pub fn resolve_with_rule(conflict: &Conflict) -> Option<(Rule, &[String])> {
    let resolved = if conflict.ours == conflict.base {
        (Rule::OursUnchanged, conflict.theirs.as_slice())
    } else if conflict.theirs == conflict.base {
        (Rule::TheirsUnchanged, conflict.ours.as_slice())
    } else if conflict.ours == conflict.theirs {
        (Rule::Converged, conflict.ours.as_slice())
    } else {
        debug!(line = conflict.line_number, "conflict is not trivially resolvable");
        return None;
    };

    debug!(line = conflict.line_number, rule = %resolved.0, "resolved conflict");
    Some(resolved)
}

/// Resolve a conflict to its replacement lines, or `None` if both sides
/// diverged from the base in different ways.
pub fn resolve(conflict: &Conflict) -> Option<&[String]> {
    resolve_with_rule(conflict).map(|(_, lines)| lines)
}
