//! File format adapters that turn uploaded statements into raw rows.
//!
//! Readers never interpret the content; header discovery and cleaning happen
//! in [`crate::core::statement`].

pub mod delimited;
pub mod spreadsheet;

use crate::core::RawRow;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("Unsupported file format '{0}'. Please upload .csv or .xlsx")]
    UnsupportedFormat(String),
    #[error("Failed to read statement file: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Excel parsing error: {0}")]
    Spreadsheet(#[from] calamine::Error),
    #[error("Workbook does not contain any worksheet")]
    EmptyWorkbook,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementFormat {
    Csv,
    Spreadsheet,
}

impl StatementFormat {
    /// Picks the format from the file extension, case-insensitively.
    pub fn from_path(path: &Path) -> Result<Self, ReadError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "csv" => Ok(StatementFormat::Csv),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(StatementFormat::Spreadsheet),
            _ => Err(ReadError::UnsupportedFormat(extension)),
        }
    }

    pub fn parse(self, bytes: &[u8]) -> Result<Vec<RawRow>, ReadError> {
        match self {
            StatementFormat::Csv => delimited::parse_rows(bytes),
            StatementFormat::Spreadsheet => spreadsheet::parse_rows(bytes),
        }
    }
}

/// Loads the whole statement into memory and splits it into rows.
pub async fn read_rows(path: &Path) -> Result<Vec<RawRow>, ReadError> {
    let format = StatementFormat::from_path(path)?;
    let bytes = tokio::fs::read(path).await?;
    debug!(?format, size = bytes.len(), path = %path.display(), "Read statement file");
    format.parse(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Cell, normalize};
    use std::io::Write;

    #[test]
    fn test_format_from_extension() {
        let format = |p: &str| StatementFormat::from_path(Path::new(p));

        assert_eq!(format("holdings.csv").unwrap(), StatementFormat::Csv);
        assert_eq!(format("Holdings.XLSX").unwrap(), StatementFormat::Spreadsheet);
        assert_eq!(format("old.xls").unwrap(), StatementFormat::Spreadsheet);

        match format("image.png") {
            Err(ReadError::UnsupportedFormat(ext)) => assert_eq!(ext, "png"),
            other => panic!("expected unsupported format, got {other:?}"),
        }
        let err = format("no_extension").unwrap_err();
        assert!(err.to_string().contains("Unsupported file format"));
    }

    #[tokio::test]
    async fn test_read_rows_from_csv_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .unwrap();
        writeln!(file, "Scheme Name,Current Value,XIRR").unwrap();
        writeln!(file, "Axis Midcap,\"1,500\",12%").unwrap();

        let rows = read_rows(file.path()).await.unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1][1], Cell::Text("1,500".to_string()));
    }

    #[tokio::test]
    async fn test_workbook_and_csv_statements_agree() {
        let workbook = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/holdings.xlsx");
        let mut csv = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .unwrap();
        write!(
            csv,
            "Name,John Doe\nPAN,ABCDE1234F\n\n\
             Scheme Name,Folio No,Invested Value,Current Value,XIRR\n\
             Nippon Small Cap,123,10000,12000,10%\n\
             Nippon Small Cap,456,5000,8000,20\n\
             HDFC Top 100,789,50000,50000,5\n\
             Total,,,70000,\n"
        )
        .unwrap();

        let from_workbook = normalize(&read_rows(&workbook).await.unwrap()).unwrap();
        let from_csv = normalize(&read_rows(csv.path()).await.unwrap()).unwrap();

        assert_eq!(from_workbook.len(), 2);
        assert_eq!(from_workbook, from_csv);
    }

    #[tokio::test]
    async fn test_unsupported_format_checked_before_reading() {
        // The file does not exist; the extension alone decides the error
        let err = read_rows(Path::new("/missing/statement.pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, ReadError::UnsupportedFormat(_)));

        let err = read_rows(Path::new("/missing/statement.csv"))
            .await
            .unwrap_err();
        assert!(matches!(err, ReadError::Io(_)));
    }
}
