//! SQLite row source.

use crate::error::Result;
use crate::source::{RawRecord, RowSource};
use rusqlite::types::Value;
use rusqlite::{Connection, OpenFlags, Row, params};
use std::path::Path;

/// Join of the availability snapshots with the hospital directory,
/// in raw-table column order.
const PAGE_QUERY: &str = "
    SELECT h.hpid, h.last_updated, h.hvec, h.hvicc, h.hvoc, hi.hpbdn,
           h.hvctayn, h.hvmriayn, h.hvventisoayn,
           hi.duty_name, hi.duty_addr, hi.wgs84_lon, hi.wgs84_lat
    FROM emergency_hospital_data_raw h
    INNER JOIN hospital_information hi ON h.hpid = hi.hpid
    ORDER BY h.rowid
    LIMIT ?1 OFFSET ?2
";

/// Reads the raw join from a SQLite database.
#[derive(Debug)]
pub struct SqliteSource {
    conn: Connection,
    label: String,
}

impl SqliteSource {
    /// Open an existing database file read-only.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(Self {
            conn,
            label: format!("sqlite:{}", path.display()),
        })
    }

    /// Wrap an already-open connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn,
            label: "sqlite:<connection>".to_string(),
        }
    }

    /// Number of rows the join yields.
    pub fn count(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*)
             FROM emergency_hospital_data_raw h
             INNER JOIN hospital_information hi ON h.hpid = hi.hpid",
            [],
            |row| row.get(0),
        )?;
        Ok(usize::try_from(count).unwrap_or(0))
    }
}

fn field(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<String>> {
    let value = match row.get::<_, Value>(idx)? {
        Value::Null => None,
        Value::Integer(i) => Some(i.to_string()),
        Value::Real(f) => Some(f.to_string()),
        Value::Text(s) => Some(s),
        Value::Blob(b) => Some(String::from_utf8_lossy(&b).into_owned()),
    };
    Ok(value)
}

fn record(row: &Row<'_>) -> rusqlite::Result<RawRecord> {
    Ok(RawRecord {
        hpid: field(row, 0)?.unwrap_or_default(),
        last_updated: field(row, 1)?,
        hvec: field(row, 2)?,
        hvicc: field(row, 3)?,
        hvoc: field(row, 4)?,
        hpbdn: field(row, 5)?,
        hvctayn: field(row, 6)?,
        hvmriayn: field(row, 7)?,
        hvventisoayn: field(row, 8)?,
        duty_name: field(row, 9)?,
        duty_addr: field(row, 10)?,
        wgs84_lon: field(row, 11)?,
        wgs84_lat: field(row, 12)?,
    })
}

impl RowSource for SqliteSource {
    fn fetch_page(&mut self, offset: usize, limit: usize) -> Result<Vec<RawRecord>> {
        let mut stmt = self.conn.prepare_cached(PAGE_QUERY)?;
        let rows = stmt
            .query_map(params![limit as i64, offset as i64], record)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    fn describe(&self) -> String {
        self.label.clone()
    }
}
