//! Search criteria and their textual grammar.
//!
//! A criterion is one column's search configuration. On the command line it
//! is written as `column=term` for exact containment or `column~term` for
//! fuzzy matching, with an optional `:threshold` suffix on fuzzy terms
//! (`Country~Frnace:60`). Quoted terms are unquoted. An empty term is legal
//! and means "no constraint on this column".

use anyhow::{Result, anyhow};
use clap::ValueEnum;

pub const DEFAULT_FUZZY_THRESHOLD: u8 = 50;
pub const DEFAULT_FUZZY_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
#[value(rename_all = "kebab-case")]
pub enum MatchMode {
    #[default]
    Exact,
    Fuzzy,
}

#[derive(Debug, Clone)]
pub struct SearchCriterion {
    pub column: String,
    pub term: String,
    /// None = follow the session default.
    pub mode: Option<MatchMode>,
    /// Minimum fuzzy score (0–100, inclusive); None = session default.
    pub threshold: Option<u8>,
    /// Candidates considered before thresholding; None = session default.
    pub limit: Option<usize>,
}

impl SearchCriterion {
    pub fn exact(column: impl Into<String>, term: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            term: term.into(),
            mode: Some(MatchMode::Exact),
            threshold: None,
            limit: None,
        }
    }

    pub fn fuzzy(
        column: impl Into<String>,
        term: impl Into<String>,
        threshold: Option<u8>,
    ) -> Self {
        Self {
            column: column.into(),
            term: term.into(),
            mode: Some(MatchMode::Fuzzy),
            threshold,
            limit: None,
        }
    }

    /// A criterion with an empty term constrains nothing.
    pub fn is_active(&self) -> bool {
        !self.term.is_empty()
    }
}

pub fn parse_criteria(specs: &[String]) -> Result<Vec<SearchCriterion>> {
    specs.iter().map(|spec| parse_criterion(spec)).collect()
}

fn parse_criterion(spec: &str) -> Result<SearchCriterion> {
    let trimmed = spec.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("Empty search criterion"));
    }

    // Whichever separator appears first decides the mode.
    let exact_at = trimmed.find('=');
    let fuzzy_at = trimmed.find('~');
    match (exact_at, fuzzy_at) {
        (Some(eq), at) if at.is_none_or(|tilde| eq < tilde) => {
            let column = trimmed[..eq].trim();
            ensure_column(column, trimmed)?;
            let term = unquote(trimmed[eq + 1..].trim());
            Ok(SearchCriterion::exact(column, term))
        }
        (_, Some(tilde)) => {
            let column = trimmed[..tilde].trim();
            ensure_column(column, trimmed)?;
            let rest = trimmed[tilde + 1..].trim();
            let (term, threshold) = split_threshold(rest)?;
            Ok(SearchCriterion::fuzzy(column, unquote(term), threshold))
        }
        _ => Err(anyhow!(
            "Failed to parse criterion '{trimmed}': expected 'column=term' or 'column~term[:threshold]'"
        )),
    }
}

fn ensure_column(column: &str, spec: &str) -> Result<()> {
    if column.is_empty() {
        Err(anyhow!("Criterion '{spec}' is missing a column name"))
    } else {
        Ok(())
    }
}

/// Split a trailing `:NN` threshold off a fuzzy term. Quoted terms never
/// carry a threshold suffix, so `~":60"` searches for the literal text.
fn split_threshold(raw: &str) -> Result<(&str, Option<u8>)> {
    if is_quoted(raw) {
        return Ok((raw, None));
    }
    let Some((term, suffix)) = raw.rsplit_once(':') else {
        return Ok((raw, None));
    };
    match suffix.trim().parse::<u8>() {
        Ok(value) if value <= 100 => Ok((term.trim_end(), Some(value))),
        Ok(value) => Err(anyhow!("Fuzzy threshold {value} is out of range 0-100")),
        // Not a number: the colon belongs to the term itself.
        Err(_) => Ok((raw, None)),
    }
}

fn is_quoted(value: &str) -> bool {
    if value.len() < 2 {
        return false;
    }
    let bytes = value.as_bytes();
    (bytes[0] == b'"' && bytes[value.len() - 1] == b'"')
        || (bytes[0] == b'\'' && bytes[value.len() - 1] == b'\'')
}

fn unquote(value: &str) -> &str {
    if is_quoted(value) {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_exact_criterion() {
        let criterion = parse_criterion("Country=France").unwrap();
        assert_eq!(criterion.column, "Country");
        assert_eq!(criterion.term, "France");
        assert_eq!(criterion.mode, Some(MatchMode::Exact));
    }

    #[test]
    fn parses_fuzzy_criterion_with_threshold() {
        let criterion = parse_criterion("Country~Frnace:60").unwrap();
        assert_eq!(criterion.column, "Country");
        assert_eq!(criterion.term, "Frnace");
        assert_eq!(criterion.mode, Some(MatchMode::Fuzzy));
        assert_eq!(criterion.threshold, Some(60));
    }

    #[test]
    fn fuzzy_without_threshold_defers_to_session_default() {
        let criterion = parse_criterion("Company~Acme").unwrap();
        assert_eq!(criterion.threshold, None);
    }

    #[test]
    fn colon_without_numeric_suffix_stays_in_the_term() {
        let criterion = parse_criterion("Description~large: format").unwrap();
        assert_eq!(criterion.term, "large: format");
        assert_eq!(criterion.threshold, None);
    }

    #[test]
    fn out_of_range_threshold_is_rejected() {
        assert!(parse_criterion("Country~France:250").is_err());
    }

    #[test]
    fn quoted_terms_are_unquoted() {
        let criterion = parse_criterion("Company='Acme Corp'").unwrap();
        assert_eq!(criterion.term, "Acme Corp");
    }

    #[test]
    fn empty_term_is_inactive() {
        let criterion = parse_criterion("Country=").unwrap();
        assert!(!criterion.is_active());
    }

    #[test]
    fn missing_separator_or_column_fails() {
        assert!(parse_criterion("Country").is_err());
        assert!(parse_criterion("=France").is_err());
        assert!(parse_criterion("  ").is_err());
    }

    #[test]
    fn first_separator_wins() {
        let criterion = parse_criterion("note=a~b").unwrap();
        assert_eq!(criterion.mode, Some(MatchMode::Exact));
        assert_eq!(criterion.term, "a~b");
    }
}
