//! Case-insensitive substring containment over one column.

use std::collections::BTreeSet;

use crate::dataset::Column;

/// Rows whose cell text contains `term`, case-insensitively. Numbers are
/// matched on their text form, so "3" matches both "23" and "35". Null cells
/// never match a non-empty term; an empty term matches every row.
pub fn apply(column: &Column, term: &str) -> BTreeSet<usize> {
    if term.is_empty() {
        return (0..column.cells.len()).collect();
    }
    let needle = term.to_lowercase();
    column
        .cells
        .iter()
        .enumerate()
        .filter_map(|(row, cell)| {
            cell.as_deref()
                .filter(|value| value.to_lowercase().contains(&needle))
                .map(|_| row)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Kind;

    fn column(values: &[Option<&str>]) -> Column {
        Column::new(
            "c",
            Kind::Textual,
            values.iter().map(|v| v.map(str::to_string)).collect(),
        )
    }

    #[test]
    fn containment_is_case_insensitive() {
        let col = column(&[Some("France"), Some("Germany"), Some("France")]);
        let rows = apply(&col, "franc");
        assert_eq!(rows.into_iter().collect::<Vec<_>>(), vec![0, 2]);
    }

    #[test]
    fn digits_match_inside_stringified_numbers() {
        let col = column(&[Some("23"), Some("35"), Some("7")]);
        let rows = apply(&col, "3");
        assert_eq!(rows.into_iter().collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn nulls_never_match_a_term() {
        let col = column(&[Some("France"), None]);
        let rows = apply(&col, "f");
        assert_eq!(rows.into_iter().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn empty_term_matches_every_row_including_nulls() {
        let col = column(&[Some("France"), None, Some("Spain")]);
        let rows = apply(&col, "");
        assert_eq!(rows.into_iter().collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn no_match_yields_empty_set() {
        let col = column(&[Some("France")]);
        assert!(apply(&col, "xyz").is_empty());
    }
}
