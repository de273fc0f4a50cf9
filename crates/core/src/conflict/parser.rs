//! diff3 conflict-marker parser.
//!
//! A single forward pass over the numbered lines of a file turns it into an
//! ordered sequence of [`ParsedUnit`]s: literal lines pass through untouched,
//! and every `<<<<<<<` ... `|||||||` ... `=======` ... `>>>>>>>` block becomes
//! one [`Conflict`].

use tracing::debug;

use crate::errors::{MissingMarker, ParseError};

/// Number of repeated marker characters that open a marker line.
pub const MARKER_LEN: usize = 7;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// The four kinds of diff3 marker line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    /// `<<<<<<<` opens the "ours" section.
    Start,
    /// `|||||||` opens the "base" section.
    Base,
    /// `=======` opens the "theirs" section.
    Mid,
    /// `>>>>>>>` closes the block.
    End,
}

impl MarkerKind {
    /// The character repeated [`MARKER_LEN`] times at the start of the line.
    pub fn marker_char(self) -> u8 {
        match self {
            Self::Start => b'<',
            Self::Base => b'|',
            Self::Mid => b'=',
            Self::End => b'>',
        }
    }

    /// Whether `line` is a marker of this kind.
    ///
    /// Only the first [`MARKER_LEN`] characters are inspected; anything after
    /// them (usually a branch label) is free text.
    pub fn matches(self, line: &str) -> bool {
        let c = self.marker_char();
        line.as_bytes()
            .get(..MARKER_LEN)
            .is_some_and(|prefix| prefix.iter().all(|&b| b == c))
    }
}

/// One conflict block as found in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    /// 1-based line of the start marker.
    pub line_number: usize,
    pub start_marker: String,
    pub base_marker: String,
    pub mid_marker: String,
    pub end_marker: String,
    /// Lines between the start and base markers.
    pub ours: Vec<String>,
    /// Lines between the base and mid markers (the common ancestor).
    pub base: Vec<String>,
    /// Lines between the mid and end markers.
    pub theirs: Vec<String>,
}

impl Conflict {
    /// Append the original block to `out`, every line newline-terminated.
    pub(crate) fn render_into(&self, out: &mut String) {
        push_line(out, &self.start_marker);
        self.ours.iter().for_each(|l| push_line(out, l));
        push_line(out, &self.base_marker);
        self.base.iter().for_each(|l| push_line(out, l));
        push_line(out, &self.mid_marker);
        self.theirs.iter().for_each(|l| push_line(out, l));
        push_line(out, &self.end_marker);
    }

    /// Number of source lines the block spans, markers included.
    pub fn line_count(&self) -> usize {
        4 + self.ours.len() + self.base.len() + self.theirs.len()
    }
}

/// A single item of the parse result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedUnit {
    /// A line outside any conflict block, without its newline.
    Line(String),
    /// A complete conflict block.
    Conflict(Conflict),
}

pub(crate) fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}

// ---------------------------------------------------------------------------
// Scanning
// ---------------------------------------------------------------------------

/// Split `text` into lines on `\n` only.
///
/// A trailing newline does not produce an empty final line, and carriage
/// returns stay attached to their line so CRLF files round-trip unchanged.
pub fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split_inclusive('\n')
        .map(|line| line.strip_suffix('\n').unwrap_or(line))
}

/// Parse `text` into literal lines and conflict blocks, in file order.
///
/// Fails only when a start marker is not followed by its base, mid, and end
/// markers before the input runs out.
pub fn parse(text: &str) -> Result<Vec<ParsedUnit>, ParseError> {
    let mut lines = split_lines(text).enumerate().map(|(i, line)| (i + 1, line));
    let mut units = Vec::new();

    while let Some((number, line)) = lines.next() {
        if MarkerKind::Start.matches(line) {
            let conflict = extract_conflict(&mut lines, number, line)?;
            debug!(
                line = number,
                ours = conflict.ours.len(),
                base = conflict.base.len(),
                theirs = conflict.theirs.len(),
                "found conflict"
            );
            units.push(ParsedUnit::Conflict(conflict));
        } else {
            units.push(ParsedUnit::Line(line.to_string()));
        }
    }

    Ok(units)
}

/// Consume the body of a conflict whose start marker has just been read.
fn extract_conflict<'a, I>(
    lines: &mut I,
    line_number: usize,
    start_marker: &str,
) -> Result<Conflict, ParseError>
where
    I: Iterator<Item = (usize, &'a str)>,
{
    let missing = |marker| ParseError {
        line: line_number,
        missing: marker,
    };

    let (ours, base_marker) =
        take_section(lines, MarkerKind::Base).ok_or_else(|| missing(MissingMarker::Base))?;
    let (base, mid_marker) =
        take_section(lines, MarkerKind::Mid).ok_or_else(|| missing(MissingMarker::Mid))?;
    let (theirs, end_marker) =
        take_section(lines, MarkerKind::End).ok_or_else(|| missing(MissingMarker::End))?;

    Ok(Conflict {
        line_number,
        start_marker: start_marker.to_string(),
        base_marker,
        mid_marker,
        end_marker,
        ours,
        base,
        theirs,
    })
}

/// Collect lines up to the next `terminator` marker.
///
/// Returns the collected lines and the marker line itself, or `None` if the
/// input ended first.
fn take_section<'a, I>(lines: &mut I, terminator: MarkerKind) -> Option<(Vec<String>, String)>
where
    I: Iterator<Item = (usize, &'a str)>,
{
    let mut section = Vec::new();
    for (_, line) in lines.by_ref() {
        if terminator.matches(line) {
            return Some((section, line.to_string()));
        }
        section.push(line.to_string());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE: &str = "\
before
<<<<<<< HEAD
ours
||||||| merged common ancestors
base
=======
theirs
>>>>>>> feature
after
";

    fn conflicts(units: &[ParsedUnit]) -> Vec<&Conflict> {
        units
            .iter()
            .filter_map(|u| match u {
                ParsedUnit::Conflict(c) => Some(c),
                ParsedUnit::Line(_) => None,
            })
            .collect()
    }

    #[test]
    fn test_no_markers_is_all_lines() {
        let units = parse("a\nb\n\nc\n").unwrap();
        assert_eq!(
            units,
            vec![
                ParsedUnit::Line("a".into()),
                ParsedUnit::Line("b".into()),
                ParsedUnit::Line("".into()),
                ParsedUnit::Line("c".into()),
            ]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(parse("").unwrap().is_empty());
    }

    #[test]
    fn test_single_conflict() {
        let units = parse(SIMPLE).unwrap();
        assert_eq!(units.len(), 3);
        assert_eq!(units[0], ParsedUnit::Line("before".into()));
        assert_eq!(units[2], ParsedUnit::Line("after".into()));

        let ParsedUnit::Conflict(c) = &units[1] else {
            panic!("expected a conflict, got {:?}", units[1]);
        };
        assert_eq!(c.line_number, 2);
        assert_eq!(c.start_marker, "<<<<<<< HEAD");
        assert_eq!(c.base_marker, "||||||| merged common ancestors");
        assert_eq!(c.mid_marker, "=======");
        assert_eq!(c.end_marker, ">>>>>>> feature");
        assert_eq!(c.ours, vec!["ours"]);
        assert_eq!(c.base, vec!["base"]);
        assert_eq!(c.theirs, vec!["theirs"]);
        assert_eq!(c.line_count(), 7);
    }

    #[test]
    fn test_empty_sections() {
        let text = "<<<<<<<\n|||||||\n=======\nadded\n>>>>>>>\n";
        let units = parse(text).unwrap();
        let c = conflicts(&units)[0];
        assert!(c.ours.is_empty());
        assert!(c.base.is_empty());
        assert_eq!(c.theirs, vec!["added"]);
    }

    #[test]
    fn test_multiple_conflicts_keep_order_and_line_numbers() {
        let text = format!("{SIMPLE}middle\n{SIMPLE}");
        let units = parse(&text).unwrap();
        let found = conflicts(&units);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].line_number, 2);
        assert_eq!(found[1].line_number, 12);
    }

    #[test]
    fn test_missing_base_marker() {
        let err = parse("x\n<<<<<<< HEAD\nours\n=======\ntheirs\n>>>>>>> b\n").unwrap_err();
        assert_eq!(
            err,
            ParseError {
                line: 2,
                missing: MissingMarker::Base
            }
        );
    }

    #[test]
    fn test_missing_mid_and_end_markers() {
        let err = parse("<<<<<<<\na\n|||||||\nb\n").unwrap_err();
        assert_eq!(err.missing, MissingMarker::Mid);

        let err = parse("<<<<<<<\na\n|||||||\nb\n=======\nc\n").unwrap_err();
        assert_eq!(err.missing, MissingMarker::End);
        assert_eq!(err.line, 1);
    }

    #[test]
    fn test_six_chars_is_not_a_marker() {
        assert!(!MarkerKind::Start.matches("<<<<<< HEAD"));
        assert!(!MarkerKind::Mid.matches("======"));
        assert!(MarkerKind::Mid.matches("======="));
        assert!(MarkerKind::End.matches(">>>>>>>>> extra"));
        assert!(!MarkerKind::Base.matches(""));

        let units = parse("<<<<<< not a marker\n").unwrap();
        assert_eq!(units, vec![ParsedUnit::Line("<<<<<< not a marker".into())]);
    }

    #[test]
    fn test_stray_non_start_markers_are_literal() {
        let units = parse("=======\n>>>>>>> x\n|||||||\n").unwrap();
        assert!(units.iter().all(|u| matches!(u, ParsedUnit::Line(_))));
    }

    #[test]
    fn test_render_reproduces_block() {
        let units = parse(SIMPLE).unwrap();
        let c = conflicts(&units)[0];
        let expected: String = SIMPLE.lines().skip(1).take(7).map(|l| format!("{l}\n")).collect();
        let mut rendered = String::new();
        c.render_into(&mut rendered);
        assert_eq!(rendered, expected);
    }

    #[test]
    fn test_split_lines_keeps_carriage_returns() {
        let lines: Vec<&str> = split_lines("a\r\nb\r\n").collect();
        assert_eq!(lines, vec!["a\r", "b\r"]);

        let lines: Vec<&str> = split_lines("no newline").collect();
        assert_eq!(lines, vec!["no newline"]);
    }
}
