//! Shared styling utilities for terminal output.

use console::Style;

use gitmediate_core::conflict::DiffOp;
use gitmediate_core::report;

/// Create a success-styled string (green with checkmark).
pub fn success(msg: &str) -> String {
    let style = Style::new().green();
    format!("{} {}", style.apply_to("✓"), msg)
}

/// Create an error-styled string (red with cross).
pub fn error(msg: &str) -> String {
    let style = Style::new().red();
    format!("{} {}", style.apply_to("✗"), msg)
}

/// Create a warning-styled string (yellow).
pub fn warn(msg: &str) -> String {
    let style = Style::new().yellow();
    format!("{} {}", style.apply_to("⚠"), msg)
}

/// Create a header-styled string (bold).
pub fn header(msg: &str) -> String {
    let style = Style::new().bold();
    style.apply_to(msg).to_string()
}

/// One edit-script line: inserts green, deletes red, kept lines dim.
pub fn diff_op(op: &DiffOp) -> String {
    let style = match op {
        DiffOp::Insert(_) => Style::new().green(),
        DiffOp::Delete(_) => Style::new().red(),
        DiffOp::Keep(_) => Style::new().dim(),
    };
    style.apply_to(report::render_op(op)).to_string()
}
