use super::ReadError;
use crate::core::{Cell, RawRow};
use csv::ReaderBuilder;

/// Splits CSV bytes into rows without treating any line as a header.
///
/// Rows may have different lengths and invalid UTF-8 is replaced rather than
/// rejected.
pub fn parse_rows(bytes: &[u8]) -> Result<Vec<RawRow>, ReadError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for record in reader.byte_records() {
        let record = record?;
        let row: RawRow = record
            .iter()
            .map(|field| Cell::from(String::from_utf8_lossy(field).as_ref()))
            .collect();
        rows.push(row);
    }
    Ok(rows)
}
