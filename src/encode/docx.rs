//! Word encoder: one paragraph per key-value pair.
//!
//! Paragraphs are concatenated in record order then key order, so the
//! document reads top to bottom the same way the CSV output reads left
//! to right. An empty paragraph separates consecutive records.

use std::io::Cursor;

use docx_rs::{Docx, Paragraph, Run};

use super::Encoder;
use crate::error::{EncodeError, EncodeResult};
use crate::flatten::{scalar_to_string, FlatRecord};

pub struct DocxEncoder;

impl Encoder for DocxEncoder {
    fn name(&self) -> &'static str {
        "docx"
    }

    fn content_type(&self) -> &'static str {
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
    }

    fn file_extension(&self) -> &'static str {
        "docx"
    }

    fn encode(&self, records: &[FlatRecord]) -> EncodeResult<Vec<u8>> {
        let mut docx = Docx::new();

        for (i, record) in records.iter().enumerate() {
            if i > 0 {
                docx = docx.add_paragraph(Paragraph::new());
            }
            for (key, value) in record {
                let text = format!("{}: {}", key, scalar_to_string(value));
                docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(text)));
            }
        }

        let mut buffer = Cursor::new(Vec::new());
        docx.build()
            .pack(&mut buffer)
            .map_err(|e| EncodeError::new("docx", e.to_string()))?;
        Ok(buffer.into_inner())
    }
}
