//! Excel encoder: one worksheet, same grid shape as the CSV output.
//!
//! Numbers and booleans are written as native cell types so the
//! spreadsheet stays sortable/filterable; everything else is text.
//! The workbook is built entirely in memory via `save_to_buffer`.

use rust_xlsxwriter::Workbook;
use serde_json::Value;

use super::csv::column_union;
use super::Encoder;
use crate::error::{EncodeError, EncodeResult};
use crate::flatten::{scalar_to_string, FlatRecord};

pub struct ExcelEncoder;

impl Encoder for ExcelEncoder {
    fn name(&self) -> &'static str {
        "excel"
    }

    fn content_type(&self) -> &'static str {
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    }

    fn file_extension(&self) -> &'static str {
        "xlsx"
    }

    fn encode(&self, records: &[FlatRecord]) -> EncodeResult<Vec<u8>> {
        let err = |e: rust_xlsxwriter::XlsxError| EncodeError::new("excel", e.to_string());

        let columns = column_union(records);

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("Sheet1").map_err(err)?;

        for (col, name) in columns.iter().enumerate() {
            worksheet
                .write_string(0, col as u16, name.as_str())
                .map_err(err)?;
        }

        for (row, record) in records.iter().enumerate() {
            let row = (row + 1) as u32;
            for (col, name) in columns.iter().enumerate() {
                let col = col as u16;
                match record.get(name) {
                    Some(Value::Number(n)) if n.as_f64().is_some() => {
                        worksheet
                            .write_number(row, col, n.as_f64().unwrap_or_default())
                            .map_err(err)?;
                    }
                    Some(Value::Bool(b)) => {
                        worksheet.write_boolean(row, col, *b).map_err(err)?;
                    }
                    Some(Value::Null) | None => {
                        // blank cell
                    }
                    Some(other) => {
                        worksheet
                            .write_string(row, col, scalar_to_string(other))
                            .map_err(err)?;
                    }
                }
            }
        }

        workbook.save_to_buffer().map_err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flatten::normalize;
    use serde_json::json;

    #[test]
    fn test_produces_xlsx_container() {
        let records = normalize(&json!({"name": "Ann", "age": 30})).unwrap();
        let bytes = ExcelEncoder.encode(&records).unwrap();

        // xlsx is a zip archive
        assert!(bytes.len() > 4);
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn test_handles_all_scalar_kinds() {
        let records = normalize(&json!({
            "s": "text",
            "n": 1.5,
            "b": true,
            "z": null
        }))
        .unwrap();

        let bytes = ExcelEncoder.encode(&records).unwrap();
        assert!(!bytes.is_empty());
    }

    #[test]
    fn test_empty_record_set_still_valid_workbook() {
        let records = normalize(&json!([])).unwrap();
        let bytes = ExcelEncoder.encode(&records).unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }
}
