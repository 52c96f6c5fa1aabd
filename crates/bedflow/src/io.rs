//! CSV table files at the stage boundaries.
//!
//! Tables are read with every column as text; each stage normalizes the
//! types it needs. Empty fields are read as null.

use crate::error::TableError;
use crate::timestamp::TIMESTAMP_FORMAT;
use polars::prelude::*;
use std::fs::{self, File};
use std::path::Path;
use tracing::info;

/// Read a CSV table with a header row, every column as text.
pub fn read_table(path: &Path) -> Result<DataFrame, TableError> {
    info!(path = %path.display(), "loading table");

    if !path.is_file() {
        return Err(TableError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .and_then(|reader| reader.finish())
        .map_err(|source| TableError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    info!(rows = df.height(), columns = df.width(), "table loaded");
    Ok(df)
}

/// Write `df` as a CSV table with a header row, creating parent directories.
pub fn write_table(df: &mut DataFrame, path: &Path) -> Result<(), TableError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let mut file = File::create(path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_datetime_format(Some(TIMESTAMP_FORMAT.to_string()))
        .finish(df)
        .map_err(|source| TableError::Write {
            path: path.to_path_buf(),
            source,
        })?;

    info!(path = %path.display(), rows = df.height(), "table written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_table(&dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, TableError::NotFound { .. }));
    }

    #[test]
    fn test_read_everything_as_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("raw.csv");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "hpid,hvec,duty_addr").unwrap();
        writeln!(file, "123,4,Seoul").unwrap();
        writeln!(file, "124,,").unwrap();
        drop(file);

        let df = read_table(&path).unwrap();
        assert_eq!(df.height(), 2);
        for column in df.get_columns() {
            assert_eq!(column.dtype(), &DataType::String);
        }
        let hvec = df.column("hvec").unwrap().as_materialized_series();
        assert_eq!(hvec.str().unwrap().get(0), Some("4"));
        assert_eq!(hvec.null_count(), 1);
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.csv");
        let mut df = DataFrame::new(vec![
            Column::new("hpid".into(), ["A1", "A2"]),
            Column::new("hvec".into(), [1.5, 0.0]),
        ])
        .unwrap();

        write_table(&mut df, &path).unwrap();
        let back = read_table(&path).unwrap();
        assert_eq!(back.shape(), (2, 2));
        assert_eq!(back.get_column_names(), df.get_column_names());
    }
}
