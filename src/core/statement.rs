//! Normalizes a broker holdings statement into fund records.
//!
//! Broker exports carry metadata rows above the real header, summary rows at
//! the bottom, locale formatted numbers and one line per purchase lot. This
//! module finds the header, cleans the cells and merges lots of the same fund
//! into a single record with a value-weighted average return.
use super::FundRecord;
use super::numeric::{clean_number, finite_or_zero, round_to};
use std::borrow::Cow;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, trace};

pub const SCHEME_NAME: &str = "Scheme Name";
pub const CURRENT_VALUE: &str = "Current Value";
pub const XIRR: &str = "XIRR";
/// Rows whose name contains this marker are summaries, not holdings.
pub const SUMMARY_MARKER: &str = "Total";

/// A single scalar cell as produced by a file reader.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Empty,
}

pub type RawRow = Vec<Cell>;

impl Cell {
    /// Text form of the cell, `None` for empty cells.
    pub fn text(&self) -> Option<Cow<'_, str>> {
        match self {
            Cell::Text(s) => Some(Cow::Borrowed(s)),
            Cell::Number(n) => Some(Cow::Owned(n.to_string())),
            Cell::Empty => None,
        }
    }

    /// Numeric value of the cell, cleaned; anything unparsable is `0.0`.
    pub fn to_number(&self) -> f64 {
        match self {
            Cell::Number(n) => finite_or_zero(*n),
            Cell::Text(s) => clean_number(s),
            Cell::Empty => 0.0,
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(s.to_string())
        }
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatementError {
    #[error("Could not find 'Scheme Name' header. Invalid statement file.")]
    HeaderNotFound,
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

#[derive(Debug, Clone, Copy)]
struct Columns {
    name: usize,
    value: usize,
    xirr: Option<usize>,
}

impl Columns {
    fn resolve(header: &[Cell]) -> Result<Self, StatementError> {
        let labels: Vec<String> = header
            .iter()
            .map(|c| c.text().map(|t| t.trim().to_string()).unwrap_or_default())
            .collect();
        let position = |label: &str| labels.iter().position(|l| l == label);

        match (position(SCHEME_NAME), position(CURRENT_VALUE)) {
            (Some(name), Some(value)) => Ok(Self {
                name,
                value,
                xirr: position(XIRR),
            }),
            (name, value) => {
                let mut missing = Vec::new();
                if name.is_none() {
                    missing.push(SCHEME_NAME.to_string());
                }
                if value.is_none() {
                    missing.push(CURRENT_VALUE.to_string());
                }
                Err(StatementError::MissingColumns(missing))
            }
        }
    }

    fn number_at(row: &[Cell], index: Option<usize>) -> f64 {
        index
            .and_then(|i| row.get(i))
            .map_or(0.0, Cell::to_number)
    }
}

/// Running totals for every lot of one fund.
#[derive(Debug, Default)]
struct Holding {
    total_value: f64,
    weighted_return: f64,
}

impl Holding {
    fn add(&mut self, value: f64, xirr: f64) {
        self.total_value += value;
        self.weighted_return += value * xirr;
    }

    fn into_record(self, name: String) -> FundRecord {
        let expected_return = if self.total_value != 0.0 {
            round_to(self.weighted_return / self.total_value, 2)
        } else {
            0.0
        };
        FundRecord::new(name, round_to(self.total_value, 2), expected_return, 0.0)
    }
}

fn label_positions(row: &[Cell], label: &str) -> Vec<usize> {
    row.iter()
        .enumerate()
        .filter(|(_, cell)| cell.text().is_some_and(|t| t.contains(label)))
        .map(|(i, _)| i)
        .collect()
}

fn is_header_row(row: &[Cell]) -> bool {
    let names = label_positions(row, SCHEME_NAME);
    let values = label_positions(row, CURRENT_VALUE);
    // Both labels have to sit in separate cells
    names.iter().any(|n| values.iter().any(|v| v != n))
}

/// Index of the first row carrying both the scheme name and current value
/// labels.
pub fn find_header_row(rows: &[RawRow]) -> Option<usize> {
    rows.iter().position(|row| is_header_row(row))
}

/// Turns raw statement rows into one [`FundRecord`] per distinct fund name.
///
/// Records come back in order of first appearance with `target_percent` set
/// to zero; assigning targets is up to the caller. Malformed rows are skipped
/// and malformed numbers read as zero, only a missing header is an error.
pub fn normalize(rows: &[RawRow]) -> Result<Vec<FundRecord>, StatementError> {
    let header_index = find_header_row(rows).ok_or(StatementError::HeaderNotFound)?;
    let columns = Columns::resolve(&rows[header_index])?;
    debug!(header_index, ?columns, "Found statement header");

    let mut order: Vec<String> = Vec::new();
    let mut holdings: HashMap<String, Holding> = HashMap::new();

    for row in &rows[header_index + 1..] {
        let Some(name) = row.get(columns.name).and_then(Cell::text) else {
            continue;
        };
        let name = name.trim();
        let value = Columns::number_at(row, Some(columns.value));
        if name.is_empty() || value == 0.0 || name.contains(SUMMARY_MARKER) {
            trace!(fund = name, value, "Skipping statement row");
            continue;
        }

        let xirr = Columns::number_at(row, columns.xirr);
        if !holdings.contains_key(name) {
            order.push(name.to_string());
        }
        holdings.entry(name.to_string()).or_default().add(value, xirr);
    }

    let records: Vec<FundRecord> = order
        .into_iter()
        .filter_map(|name| {
            let holding = holdings.remove(&name)?;
            Some(holding.into_record(name))
        })
        .collect();
    debug!(count = records.len(), "Normalized statement holdings");
    Ok(records)
}
