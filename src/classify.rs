//! Column kind inference.
//!
//! Mirrors the elimination style of schema probing: a column starts out as a
//! numeric candidate and loses that status on the first non-null cell that
//! fails to parse. Deterministic and side-effect free.

use crate::dataset::Kind;

/// Numeric iff every non-null cell parses as a number; otherwise Textual.
/// Columns with no non-null cells are Textual — there is no evidence to
/// justify numeric dispatch.
pub fn classify(cells: &[Option<String>]) -> Kind {
    let mut saw_value = false;
    for cell in cells.iter().flatten() {
        saw_value = true;
        if !is_numeric(cell) {
            return Kind::Textual;
        }
    }
    if saw_value { Kind::Numeric } else { Kind::Textual }
}

fn is_numeric(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty() && trimmed.parse::<f64>().is_ok()
}
