//! PDF encoder: one textual block per record.
//!
//! Each record is rendered as `key: value` lines in the record's own
//! key order, starting on a fresh A4 page. A record longer than one
//! page continues on the next page, so the page break lands after every
//! record except the last.

use printpdf::{BuiltinFont, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};

use super::Encoder;
use crate::error::{EncodeError, EncodeResult};
use crate::flatten::{scalar_to_string, FlatRecord};

pub struct PdfEncoder;

impl Encoder for PdfEncoder {
    fn name(&self) -> &'static str {
        "pdf"
    }

    fn content_type(&self) -> &'static str {
        "application/pdf"
    }

    fn file_extension(&self) -> &'static str {
        "pdf"
    }

    fn encode(&self, records: &[FlatRecord]) -> EncodeResult<Vec<u8>> {
        // A4 portrait, 15mm margin, 6mm line spacing at 11pt Helvetica.
        let (doc, first_page, first_layer) =
            PdfDocument::new("data", Mm(210.0), Mm(297.0), "content");
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| EncodeError::new("pdf", e.to_string()))?;

        let mut layer = doc.get_page(first_page).get_layer(first_layer);
        let mut cursor_y = 297.0 - 15.0;

        for (i, record) in records.iter().enumerate() {
            // Page break between records; the first record uses the
            // page PdfDocument::new already created.
            if i > 0 {
                layer = add_page(&doc);
                cursor_y = 297.0 - 15.0;
            }

            for (key, value) in record {
                if cursor_y < 15.0 {
                    layer = add_page(&doc);
                    cursor_y = 297.0 - 15.0;
                }
                let line = format!("{}: {}", key, scalar_to_string(value));
                layer.use_text(line, 11.0, Mm(15.0), Mm(cursor_y), &font);
                cursor_y -= 6.0;
            }
        }

        doc.save_to_bytes()
            .map_err(|e| EncodeError::new("pdf", e.to_string()))
    }
}

fn add_page(doc: &PdfDocumentReference) -> PdfLayerReference {
    let (page, layer) = doc.add_page(Mm(210.0), Mm(297.0), "content");
    doc.get_page(page).get_layer(layer)
}
