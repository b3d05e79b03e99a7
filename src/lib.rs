pub mod classify;
pub mod cli;
pub mod criteria;
pub mod dataset;
pub mod errors;
pub mod exact;
pub mod fuzzy;
pub mod io_utils;
pub mod metadata;
pub mod pipeline;
pub mod store;
pub mod table;

use std::{env, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, info, warn};

use crate::{
    cli::{Cli, Commands},
    metadata::{ColumnMeta, SchemaMeta},
    pipeline::SearchOptions,
    store::{LoadOptions, TableStore},
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("csv_sift", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Probe(args) => handle_probe(&args),
        Commands::Columns(args) => handle_columns(&args),
        Commands::Search(args) => handle_search(&args),
    }
}

fn handle_probe(args: &cli::ProbeArgs) -> Result<()> {
    let delimiter = io_utils::resolve_input_delimiter(&args.input, args.delimiter);
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    info!(
        "Probing '{}' with delimiter '{}'",
        args.input.display(),
        printable_delimiter(delimiter)
    );

    let mut store = TableStore::new();
    let options = LoadOptions {
        delimiter,
        encoding,
        expected_names: Vec::new(),
    };
    let loaded = store
        .load(&args.input, &options)
        .with_context(|| format!("Loading table from {:?}", args.input))?;
    report_warnings(&loaded.warnings);

    let columns = loaded
        .table
        .columns()
        .iter()
        .map(|column| {
            let cells = sample(&column.cells, args.sample_rows);
            ColumnMeta {
                name: column.name.clone(),
                kind: classify::classify(cells),
            }
        })
        .collect();
    let meta = SchemaMeta { columns };
    meta.save(&args.meta)
        .with_context(|| format!("Writing metadata to {:?}", args.meta))?;
    info!(
        "Inferred kinds for {} column(s) written to {:?}",
        meta.columns.len(),
        args.meta
    );
    Ok(())
}

fn handle_columns(args: &cli::ColumnsArgs) -> Result<()> {
    let delimiter = io_utils::resolve_input_delimiter(&args.input, args.delimiter);
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let expected_names = load_expected_names(args.meta.as_deref())?;

    let mut store = TableStore::new();
    let options = LoadOptions {
        delimiter,
        encoding,
        expected_names,
    };
    let loaded = store
        .load(&args.input, &options)
        .with_context(|| format!("Loading table from {:?}", args.input))?;
    report_warnings(&loaded.warnings);

    let headers = vec!["#".to_string(), "name".to_string(), "kind".to_string()];
    let rows = loaded
        .table
        .columns()
        .iter()
        .enumerate()
        .map(|(idx, column)| {
            vec![
                (idx + 1).to_string(),
                column.name.clone(),
                column.kind.to_string(),
            ]
        })
        .collect::<Vec<_>>();
    table::print_table(&headers, &rows);
    info!(
        "Listed {} column(s) from {:?}",
        loaded.table.columns().len(),
        args.input
    );
    Ok(())
}

fn handle_search(args: &cli::SearchArgs) -> Result<()> {
    let delimiter = io_utils::resolve_input_delimiter(&args.input, args.delimiter);
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let expected_names = load_expected_names(args.meta.as_deref())?;
    let criteria = criteria::parse_criteria(&args.criteria)?;

    let mut store = TableStore::new();
    let options = LoadOptions {
        delimiter,
        encoding,
        expected_names,
    };
    let loaded = store
        .load(&args.input, &options)
        .with_context(|| format!("Loading table from {:?}", args.input))?;
    report_warnings(&loaded.warnings);

    let search_options = SearchOptions {
        default_mode: args.mode,
        threshold: args.threshold,
        limit: args.limit,
    };
    let result = pipeline::run(&loaded.table, &criteria, &search_options);
    report_warnings(&result.warnings);

    let mut headers = loaded.table.column_names();
    if args.row_numbers {
        headers.insert(0, "row_number".to_string());
    }
    let rows: Vec<Vec<String>> = result
        .rows
        .iter()
        .map(|&row| {
            let mut cells = loaded.table.row_text(row);
            if args.row_numbers {
                cells.insert(0, (row + 1).to_string());
            }
            cells
        })
        .collect();

    match &args.output {
        Some(path) => {
            let out_delimiter =
                io_utils::resolve_output_delimiter(Some(path.as_path()), None, delimiter);
            let mut writer = io_utils::open_csv_writer(Some(path.as_path()), out_delimiter)?;
            writer.write_record(&headers)?;
            for row in &rows {
                writer.write_record(row)?;
            }
            writer.flush().context("Flushing output CSV")?;
        }
        None => table::print_table(&headers, &rows),
    }

    if result.is_empty() {
        info!("No rows matched the active criteria");
    }
    info!(
        "Matched {} of {} row(s)",
        result.rows.len(),
        loaded.table.row_count()
    );
    Ok(())
}

fn load_expected_names(meta: Option<&std::path::Path>) -> Result<Vec<String>> {
    match meta {
        Some(path) => {
            let meta = SchemaMeta::load(path)
                .with_context(|| format!("Loading metadata from {path:?}"))?;
            Ok(meta.expected_names())
        }
        None => Ok(Vec::new()),
    }
}

fn report_warnings(warnings: &[errors::Warning]) {
    for warning in warnings {
        warn!("{warning}");
    }
}

fn sample(cells: &[Option<String>], limit: usize) -> &[Option<String>] {
    if limit > 0 && cells.len() > limit {
        &cells[..limit]
    } else {
        cells
    }
}

pub(crate) fn printable_delimiter(delimiter: u8) -> String {
    match delimiter {
        b',' => ",".to_string(),
        b'\t' => "\\t".to_string(),
        b'\n' => "\\n".to_string(),
        other => (other as char).to_string(),
    }
}
