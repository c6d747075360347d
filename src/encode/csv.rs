//! CSV encoder: one header row, one data row per record.
//!
//! The header is the union of keys across all records: the first
//! record's keys in their own order, then keys seen only in later
//! records appended in encounter order. A record missing a column gets
//! an empty cell; quoting and escaping are left to the `csv` crate.

use indexmap::IndexSet;

use super::Encoder;
use crate::error::{EncodeError, EncodeResult};
use crate::flatten::{scalar_to_string, FlatRecord};

pub struct CsvEncoder;

impl Encoder for CsvEncoder {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn content_type(&self) -> &'static str {
        "text/csv"
    }

    fn file_extension(&self) -> &'static str {
        "csv"
    }

    fn encode(&self, records: &[FlatRecord]) -> EncodeResult<Vec<u8>> {
        let columns = column_union(records);
        if columns.is_empty() {
            // No keys anywhere (empty record set, or records that
            // flattened to nothing) - no header to write.
            return Ok(Vec::new());
        }

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(&columns)
            .map_err(|e| EncodeError::new("csv", e.to_string()))?;

        for record in records {
            let row: Vec<String> = columns
                .iter()
                .map(|col| record.get(col).map(scalar_to_string).unwrap_or_default())
                .collect();
            writer
                .write_record(&row)
                .map_err(|e| EncodeError::new("csv", e.to_string()))?;
        }

        writer
            .into_inner()
            .map_err(|e| EncodeError::new("csv", e.to_string()))
    }
}

/// Union of keys across all records, encounter order, first record first.
pub(crate) fn column_union(records: &[FlatRecord]) -> Vec<String> {
    let mut columns: IndexSet<String> = IndexSet::new();
    for record in records {
        for key in record.keys() {
            columns.insert(key.clone());
        }
    }
    columns.into_iter().collect()
}
