//! diff3 conflict parsing, trivial resolution, and explanation.
//!
//! The conflict subsystem is responsible for:
//! 1. **Parsing** -- splitting a file into literal lines and conflict blocks.
//! 2. **Resolving** -- settling blocks where one side is unchanged or both agree.
//! 3. **Explaining** -- diffing each side of a remaining block against its base.
//! 4. **Assembling** -- rebuilding the file content and tallying the outcome.

pub mod assembler;
pub mod explain;
pub mod parser;
pub mod resolver;

pub use assembler::{assemble, resolve_text, ResolutionResult};
pub use explain::{diff_lines, explain, DiffOp, Side, SideDiff};
pub use parser::{parse, Conflict, MarkerKind, ParsedUnit};
pub use resolver::{resolve, resolve_with_rule, Rule};
