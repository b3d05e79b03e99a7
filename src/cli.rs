use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::criteria::{DEFAULT_FUZZY_LIMIT, DEFAULT_FUZZY_THRESHOLD, MatchMode};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Search CSV datasets with exact and fuzzy per-column criteria",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Probe a CSV file and record each column's kind in a .meta file
    Probe(ProbeArgs),
    /// List a CSV file's columns with their inferred kinds
    Columns(ColumnsArgs),
    /// Filter rows by per-column search criteria
    Search(SearchArgs),
}

#[derive(Debug, Args)]
pub struct ProbeArgs {
    /// Input CSV file to inspect
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Destination .meta file path
    #[arg(short, long)]
    pub meta: PathBuf,
    /// Number of rows to sample when inferring kinds (0 means full scan)
    #[arg(long, default_value_t = 2000)]
    pub sample_rows: usize,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct ColumnsArgs {
    /// Input CSV file to list
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Metadata file supplying expected column names
    #[arg(short, long)]
    pub meta: Option<PathBuf>,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Input CSV file to search
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Output CSV file (formatted table on stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Metadata file supplying expected column names
    #[arg(short, long)]
    pub meta: Option<PathBuf>,
    /// Search criteria such as `Country=France` or `Country~Frnace:60`
    #[arg(short = 'w', long = "where", action = clap::ArgAction::Append)]
    pub criteria: Vec<String>,
    /// Default match mode for criteria that do not choose one
    #[arg(long, value_enum, default_value_t = MatchMode::Exact)]
    pub mode: MatchMode,
    /// Default minimum fuzzy score, 0-100 inclusive
    #[arg(long, default_value_t = DEFAULT_FUZZY_THRESHOLD, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub threshold: u8,
    /// Fuzzy candidates considered per column before thresholding
    #[arg(long, default_value_t = DEFAULT_FUZZY_LIMIT)]
    pub limit: usize,
    /// Emit 1-based original row numbers as the first column
    #[arg(long = "row-numbers")]
    pub row_numbers: bool,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
