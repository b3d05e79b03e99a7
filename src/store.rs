//! Table loading and the per-session load cache.
//!
//! [`TableStore`] owns every table loaded during a session. Loading is the
//! only operation that touches storage; repeated `load` calls for the same
//! canonical path return the cached table without re-reading the file. The
//! cache is an explicit object with explicit invalidation — no process-wide
//! state. A file replaced on disk is only picked up after [`TableStore::invalidate`].

use std::{
    collections::{HashMap, hash_map::Entry},
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use encoding_rs::{Encoding, UTF_8};
use log::{debug, info};

use crate::{
    classify::classify,
    dataset::{Column, Table, reconcile_headers},
    errors::{LoadError, Warning},
    io_utils::DEFAULT_CSV_DELIMITER,
};

#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub delimiter: u8,
    pub encoding: &'static Encoding,
    /// Expected column names for header reconciliation; empty = trust the file.
    pub expected_names: Vec<String>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_CSV_DELIMITER,
            encoding: UTF_8,
            expected_names: Vec::new(),
        }
    }
}

/// A loaded table together with the non-fatal warnings raised while loading.
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub table: Table,
    pub warnings: Vec<Warning>,
}

#[derive(Debug, Default)]
pub struct TableStore {
    cache: HashMap<PathBuf, LoadedTable>,
}

impl TableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a delimited file, or return the cached table for its canonical
    /// path. The first load wins: a cached entry keeps the options it was
    /// loaded with until invalidated.
    pub fn load(&mut self, path: &Path, options: &LoadOptions) -> Result<&LoadedTable, LoadError> {
        let key = canonical_key(path)?;
        match self.cache.entry(key) {
            Entry::Occupied(entry) => {
                debug!("Cache hit for {path:?}");
                Ok(entry.into_mut())
            }
            Entry::Vacant(entry) => {
                let loaded = load_table(path, options)?;
                info!(
                    "Loaded {} row(s) across {} column(s) from {path:?}",
                    loaded.table.row_count(),
                    loaded.table.columns().len()
                );
                Ok(entry.insert(loaded))
            }
        }
    }

    /// Drop the cached entry for a path. Returns whether one existed.
    pub fn invalidate(&mut self, path: &Path) -> bool {
        match canonical_key(path) {
            Ok(key) => self.cache.remove(&key).is_some(),
            Err(_) => false,
        }
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }

    pub fn cached_count(&self) -> usize {
        self.cache.len()
    }
}

fn canonical_key(path: &Path) -> Result<PathBuf, LoadError> {
    path.canonicalize().map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })
}

fn load_table(path: &Path, options: &LoadOptions) -> Result<LoadedTable, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(options.delimiter)
        .double_quote(true)
        .flexible(false)
        .from_reader(BufReader::new(file));

    let raw_headers = reader
        .byte_headers()
        .map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })?
        .clone();
    if raw_headers.is_empty() {
        return Err(LoadError::Empty {
            path: path.to_path_buf(),
        });
    }
    let decoded_headers = decode_fields(&raw_headers, options.encoding, path)?;
    let (names, warnings) = reconcile_headers(&decoded_headers, &options.expected_names);

    let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); names.len()];
    for record in reader.byte_records() {
        let record = record.map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let fields = decode_fields(&record, options.encoding, path)?;
        for (index, field) in fields.into_iter().enumerate() {
            let cell = if field.is_empty() { None } else { Some(field) };
            cells[index].push(cell);
        }
    }

    let columns = names
        .into_iter()
        .zip(cells)
        .map(|(name, cells)| {
            let kind = classify(&cells);
            Column::new(name, kind, cells)
        })
        .collect();
    let table = Table::new(columns).map_err(|err| LoadError::Invalid {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;

    Ok(LoadedTable { table, warnings })
}

fn decode_fields(
    record: &csv::ByteRecord,
    encoding: &'static Encoding,
    path: &Path,
) -> Result<Vec<String>, LoadError> {
    record
        .iter()
        .map(|field| {
            let (text, _, had_errors) = encoding.decode(field);
            if had_errors {
                Err(LoadError::Decode {
                    path: path.to_path_buf(),
                    encoding: encoding.name().to_string(),
                })
            } else {
                Ok(text.into_owned())
            }
        })
        .collect()
}
