//! In-memory table model and header normalization.
//!
//! A [`Table`] is built once by the loader and never mutated afterwards;
//! filtering produces row-index views over it. Cells are kept in their raw
//! text form (`None` for empty fields) — typed interpretation is limited to
//! the Numeric/Textual [`Kind`] that drives filter dispatch.

use std::{
    collections::{HashMap, HashSet},
    fmt,
};

use anyhow::{Result, ensure};
use serde::{Deserialize, Serialize};

use crate::errors::Warning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Numeric,
    Textual,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Numeric => write!(f, "numeric"),
            Kind::Textual => write!(f, "textual"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub kind: Kind,
    pub cells: Vec<Option<String>>,
}

impl Column {
    pub fn new(name: impl Into<String>, kind: Kind, cells: Vec<Option<String>>) -> Self {
        Self {
            name: name.into(),
            kind,
            cells,
        }
    }

    /// Text form of a cell; empty string for nulls and out-of-range rows.
    pub fn cell_text(&self, row: usize) -> &str {
        self.cells
            .get(row)
            .and_then(|cell| cell.as_deref())
            .unwrap_or("")
    }
}

#[derive(Debug, Clone)]
pub struct Table {
    columns: Vec<Column>,
    row_count: usize,
}

impl Table {
    /// Invariants: all columns equal length, names unique.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let row_count = columns.first().map(|c| c.cells.len()).unwrap_or(0);
        for column in &columns {
            ensure!(
                column.cells.len() == row_count,
                "column '{}' has {} cell(s), expected {}",
                column.name,
                column.cells.len(),
                row_count
            );
        }
        let mut seen = HashSet::new();
        for column in &columns {
            ensure!(
                seen.insert(column.name.as_str()),
                "duplicate column name '{}'",
                column.name
            );
        }
        Ok(Self { columns, row_count })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// One row rendered as display text, nulls as empty strings.
    pub fn row_text(&self, row: usize) -> Vec<String> {
        self.columns
            .iter()
            .map(|c| c.cell_text(row).to_string())
            .collect()
    }
}

/// Make raw header names unique, preserving first-seen order.
///
/// Repeats get a `.1`, `.2`, … suffix; blank headers become `column`.
pub fn dedup_headers(raw: &[String]) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::new();
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut names = Vec::with_capacity(raw.len());
    for header in raw {
        let base = match header.trim() {
            "" => "column",
            trimmed => trimmed,
        };
        let mut candidate = base.to_string();
        while used.contains(&candidate) {
            let counter = counts.entry(base.to_string()).or_insert(0);
            *counter += 1;
            candidate = format!("{base}.{counter}");
        }
        used.insert(candidate.clone());
        names.push(candidate);
    }
    names
}

/// Reconcile actual headers against an expected name list.
///
/// Expected names win positionally; extra actual columns keep placeholder
/// names, missing ones are reported. Rows are never dropped either way —
/// the repaired name list always covers every actual column.
pub fn reconcile_headers(actual: &[String], expected: &[String]) -> (Vec<String>, Vec<Warning>) {
    if expected.is_empty() {
        return (dedup_headers(actual), Vec::new());
    }
    let mut warnings = Vec::new();
    let mut names: Vec<String> = expected.iter().take(actual.len()).cloned().collect();
    if actual.len() > expected.len() {
        for index in expected.len()..actual.len() {
            names.push(format!("column_{}", index + 1));
        }
        warnings.push(Warning::SchemaMismatch {
            expected: expected.len(),
            actual: actual.len(),
            action: "kept extra columns under placeholder names".to_string(),
        });
    } else if actual.len() < expected.len() {
        warnings.push(Warning::SchemaMismatch {
            expected: expected.len(),
            actual: actual.len(),
            action: "ignored trailing expected names".to_string(),
        });
    }
    (dedup_headers(&names), warnings)
}
