//! Row sources for the raw hospital join.

use crate::error::Result;
use serde::Serialize;

/// One row of the raw join. Fields follow the raw-table column order and
/// carry the source value as text, untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RawRecord {
    /// Hospital identifier
    pub hpid: String,
    /// Snapshot time
    pub last_updated: Option<String>,
    /// Emergency-room beds available
    pub hvec: Option<String>,
    /// Intensive-care beds available
    pub hvicc: Option<String>,
    /// Operating rooms available
    pub hvoc: Option<String>,
    /// Total beds
    pub hpbdn: Option<String>,
    /// CT available flag
    pub hvctayn: Option<String>,
    /// MRI available flag
    pub hvmriayn: Option<String>,
    /// Ventilator available flag
    pub hvventisoayn: Option<String>,
    /// Hospital name
    pub duty_name: Option<String>,
    /// Hospital address
    pub duty_addr: Option<String>,
    /// Longitude
    pub wgs84_lon: Option<String>,
    /// Latitude
    pub wgs84_lat: Option<String>,
}

/// Paginated access to the raw join.
pub trait RowSource {
    /// Fetch up to `limit` rows starting at `offset`. An empty page ends extraction.
    fn fetch_page(&mut self, offset: usize, limit: usize) -> Result<Vec<RawRecord>>;

    /// Short human-readable description for logs.
    fn describe(&self) -> String;
}

impl<S: RowSource + ?Sized> RowSource for &mut S {
    fn fetch_page(&mut self, offset: usize, limit: usize) -> Result<Vec<RawRecord>> {
        (**self).fetch_page(offset, limit)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bedflow::schema::raw_column_names;

    #[test]
    fn test_field_order_matches_raw_schema() {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.serialize(RawRecord::default()).unwrap();
        let bytes = writer.into_inner().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let header = text.lines().next().unwrap();
        assert_eq!(header, raw_column_names().join(","));
    }

    #[test]
    fn test_none_serializes_as_empty_field() {
        let record = RawRecord {
            hpid: "A1".to_string(),
            hvec: Some("3".to_string()),
            ..RawRecord::default()
        };
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());
        writer.serialize(&record).unwrap();
        let text = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        assert_eq!(text.trim_end(), "A1,,3,,,,,,,,,,");
    }
}
