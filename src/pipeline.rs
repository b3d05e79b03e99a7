//! Criteria orchestration: dispatch, intersection, and warning collection.
//!
//! Each active criterion produces a row-index set for its column; the final
//! result is the intersection of those sets, so criteria order never affects
//! the outcome. Rows come back in original table order, not fuzzy-rank
//! order — a multi-column intersection has no single meaningful ranking.

use std::collections::BTreeSet;

use log::debug;

use crate::{
    criteria::{DEFAULT_FUZZY_LIMIT, DEFAULT_FUZZY_THRESHOLD, MatchMode, SearchCriterion},
    dataset::{Column, Kind, Table},
    errors::Warning,
    exact, fuzzy,
};

/// Session-level defaults a criterion can override per column.
#[derive(Debug, Clone, Copy)]
pub struct SearchOptions {
    pub default_mode: MatchMode,
    pub threshold: u8,
    pub limit: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            default_mode: MatchMode::Exact,
            threshold: DEFAULT_FUZZY_THRESHOLD,
            limit: DEFAULT_FUZZY_LIMIT,
        }
    }
}

/// Ordered matching row indices plus the warnings raised along the way.
#[derive(Debug, Clone, Default)]
pub struct FilterResult {
    pub rows: Vec<usize>,
    pub warnings: Vec<Warning>,
}

impl FilterResult {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Apply all criteria to the table with logical AND. Unknown columns raise a
/// [`Warning::ColumnNotFound`] and are skipped; an empty final intersection
/// is a valid outcome, not an error.
pub fn run(table: &Table, criteria: &[SearchCriterion], options: &SearchOptions) -> FilterResult {
    let mut warnings = Vec::new();
    let mut survivors: BTreeSet<usize> = (0..table.row_count()).collect();

    for criterion in criteria {
        if !criterion.is_active() {
            continue;
        }
        let Some(column) = table.column(&criterion.column) else {
            warnings.push(Warning::ColumnNotFound {
                column: criterion.column.clone(),
            });
            continue;
        };
        let mode = effective_mode(column, criterion, options);
        let matched = match mode {
            MatchMode::Exact => exact::apply(column, &criterion.term),
            MatchMode::Fuzzy => fuzzy::apply(
                column,
                &criterion.term,
                criterion.threshold.unwrap_or(options.threshold),
                criterion.limit.unwrap_or(options.limit),
            ),
        };
        debug!(
            "Criterion on '{}' ({mode:?}) matched {} row(s)",
            column.name,
            matched.len()
        );
        survivors = survivors.intersection(&matched).copied().collect();
        if survivors.is_empty() {
            // Intersections only shrink; nothing can rejoin.
            break;
        }
    }

    FilterResult {
        rows: survivors.into_iter().collect(),
        warnings,
    }
}

/// Numeric columns always use exact containment on the stringified value;
/// edit distance between numbers is not meaningful. Textual columns follow
/// the criterion's mode, falling back to the session default.
fn effective_mode(
    column: &Column,
    criterion: &SearchCriterion,
    options: &SearchOptions,
) -> MatchMode {
    if column.kind == Kind::Numeric {
        MatchMode::Exact
    } else {
        criterion.mode.unwrap_or(options.default_mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Column;

    fn sample_table() -> Table {
        let country = Column::new(
            "Country",
            Kind::Textual,
            vec![
                Some("France".to_string()),
                Some("Germany".to_string()),
                Some("France".to_string()),
            ],
        );
        let company = Column::new(
            "Company",
            Kind::Textual,
            vec![
                Some("Acme".to_string()),
                Some("Acme".to_string()),
                Some("Globex".to_string()),
            ],
        );
        let years = Column::new(
            "Years",
            Kind::Numeric,
            vec![
                Some("23".to_string()),
                Some("35".to_string()),
                Some("7".to_string()),
            ],
        );
        Table::new(vec![country, company, years]).unwrap()
    }

    #[test]
    fn no_criteria_returns_every_row_in_order() {
        let table = sample_table();
        let result = run(&table, &[], &SearchOptions::default());
        assert_eq!(result.rows, vec![0, 1, 2]);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn exact_criterion_narrows_by_substring() {
        let table = sample_table();
        let criteria = vec![SearchCriterion::exact("Country", "franc")];
        let result = run(&table, &criteria, &SearchOptions::default());
        assert_eq!(result.rows, vec![0, 2]);
    }

    #[test]
    fn fuzzy_criterion_tolerates_misspelling() {
        let table = sample_table();
        let criteria = vec![SearchCriterion::fuzzy("Country", "Frnace", Some(60))];
        let result = run(&table, &criteria, &SearchOptions::default());
        assert_eq!(result.rows, vec![0, 2]);
    }

    #[test]
    fn criteria_intersect_across_columns() {
        let table = sample_table();
        let criteria = vec![
            SearchCriterion::exact("Country", "France"),
            SearchCriterion::exact("Company", "Acme"),
        ];
        let result = run(&table, &criteria, &SearchOptions::default());
        assert_eq!(result.rows, vec![0]);
    }

    #[test]
    fn unknown_column_warns_and_leaves_result_unfiltered() {
        let table = sample_table();
        let criteria = vec![SearchCriterion::exact("Foo", "x")];
        let result = run(&table, &criteria, &SearchOptions::default());
        assert_eq!(result.rows, vec![0, 1, 2]);
        assert_eq!(
            result.warnings,
            vec![Warning::ColumnNotFound {
                column: "Foo".to_string()
            }]
        );
    }

    #[test]
    fn empty_terms_constrain_nothing_and_warn_nothing() {
        let table = sample_table();
        let criteria = vec![
            SearchCriterion::exact("Country", ""),
            SearchCriterion::exact("Company", ""),
        ];
        let result = run(&table, &criteria, &SearchOptions::default());
        assert_eq!(result.rows, vec![0, 1, 2]);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn numeric_columns_ignore_fuzzy_requests() {
        let table = sample_table();
        // Substring "3" on the stringified numbers, despite the fuzzy ask.
        let criteria = vec![SearchCriterion::fuzzy("Years", "3", Some(1))];
        let result = run(&table, &criteria, &SearchOptions::default());
        assert_eq!(result.rows, vec![0, 1]);
    }

    #[test]
    fn session_default_mode_applies_when_criterion_has_none() {
        let table = sample_table();
        let criteria = vec![SearchCriterion {
            column: "Country".to_string(),
            term: "Frnace".to_string(),
            mode: None,
            threshold: None,
            limit: None,
        }];
        let exact_result = run(&table, &criteria, &SearchOptions::default());
        assert!(exact_result.is_empty());

        let fuzzy_session = SearchOptions {
            default_mode: MatchMode::Fuzzy,
            ..SearchOptions::default()
        };
        let fuzzy_result = run(&table, &criteria, &fuzzy_session);
        assert_eq!(fuzzy_result.rows, vec![0, 2]);
    }

    #[test]
    fn contradictory_criteria_produce_empty_result() {
        let table = sample_table();
        let criteria = vec![
            SearchCriterion::exact("Country", "France"),
            SearchCriterion::exact("Country", "Germany"),
        ];
        let result = run(&table, &criteria, &SearchOptions::default());
        assert!(result.is_empty());
        assert!(result.warnings.is_empty());
    }
}
