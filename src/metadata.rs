//! Persisted column metadata (.meta JSON files).
//!
//! `probe` writes one of these; `search --meta` and `columns --meta` read it
//! back to supply the expected column names used for header reconciliation.

use std::{fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::dataset::{Kind, Table};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnMeta {
    pub name: String,
    pub kind: Kind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaMeta {
    pub columns: Vec<ColumnMeta>,
}

impl SchemaMeta {
    pub fn from_table(table: &Table) -> Self {
        let columns = table
            .columns()
            .iter()
            .map(|column| ColumnMeta {
                name: column.name.clone(),
                kind: column.kind,
            })
            .collect();
        Self { columns }
    }

    pub fn expected_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path).with_context(|| format!("Creating meta file {path:?}"))?;
        serde_json::to_writer_pretty(file, self).context("Writing metadata JSON")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Opening meta file {path:?}"))?;
        let reader = BufReader::new(file);
        let meta = serde_json::from_reader(reader).context("Parsing metadata JSON")?;
        Ok(meta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Column;

    #[test]
    fn meta_round_trips_through_json() {
        let table = Table::new(vec![
            Column::new("Country", Kind::Textual, vec![Some("France".to_string())]),
            Column::new("Years", Kind::Numeric, vec![Some("12".to_string())]),
        ])
        .unwrap();
        let meta = SchemaMeta::from_table(&table);

        let json = serde_json::to_string(&meta).unwrap();
        let parsed: SchemaMeta = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.expected_names(), vec!["Country", "Years"]);
        assert_eq!(parsed.columns[1].kind, Kind::Numeric);
    }
}
