use super::ReadError;
use crate::core::{Cell, RawRow};
use calamine::{Data, Reader, open_workbook_auto_from_rs};
use std::io::Cursor;
use tracing::debug;

/// Reads the first worksheet of an Excel or OpenDocument workbook.
///
/// The used range may start after column A; rows are padded so each cell
/// keeps its sheet column index.
pub fn parse_rows(bytes: &[u8]) -> Result<Vec<RawRow>, ReadError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(ReadError::EmptyWorkbook)??;
    let first_column = range.start().map_or(0, |(_, col)| col as usize);
    debug!(size = ?range.get_size(), first_column, "Loaded first worksheet");

    Ok(range
        .rows()
        .map(|row| {
            std::iter::repeat_n(Cell::Empty, first_column)
                .chain(row.iter().map(to_cell))
                .collect()
        })
        .collect())
}

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::String(s) => Cell::from(s.as_str()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        other => Cell::Text(other.to_string()),
    }
}
