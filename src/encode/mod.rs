//! Output format encoders and the process-wide registry.
//!
//! Every format implements [`Encoder`]: take an ordered slice of flat
//! records, produce output bytes or fail. The byte-level work is
//! delegated to the per-format library; the submodules only decide how a
//! [`FlatRecord`](crate::flatten::FlatRecord) maps onto that library's
//! document model.
//!
//! The registry is read-only after startup and looked up by
//! case-insensitive name. Adding a format means adding a submodule and
//! one line in [`registry`]; the pipeline never changes.

use once_cell::sync::Lazy;

use crate::error::EncodeResult;
use crate::flatten::FlatRecord;

mod csv;
mod docx;
mod excel;
mod pdf;
mod xml;

pub use csv::CsvEncoder;
pub use docx::DocxEncoder;
pub use excel::ExcelEncoder;
pub use pdf::PdfEncoder;
pub use xml::XmlEncoder;

/// A pluggable serializer from a record set to one output format.
///
/// `encode` must be synchronous and self-contained: it owns its output
/// buffer and returns it by value. The pipeline runs every encoder on
/// the blocking pool, so implementations are free to do CPU-bound work.
pub trait Encoder: Send + Sync {
    /// Registry name, lowercase.
    fn name(&self) -> &'static str;

    /// MIME type for the `Content-Type` response header.
    fn content_type(&self) -> &'static str;

    /// Extension used in the `data.<ext>` download filename.
    fn file_extension(&self) -> &'static str;

    /// Serialize the record set into output bytes.
    fn encode(&self, records: &[FlatRecord]) -> EncodeResult<Vec<u8>>;
}

/// Fixed encoder set, initialized once at first use.
static REGISTRY: Lazy<Vec<Box<dyn Encoder>>> = Lazy::new(|| {
    vec![
        Box::new(CsvEncoder),
        Box::new(ExcelEncoder),
        Box::new(PdfEncoder),
        Box::new(DocxEncoder),
        Box::new(XmlEncoder),
    ]
});

/// Look up an encoder by case-insensitive name.
pub fn lookup(name: &str) -> Option<&'static dyn Encoder> {
    REGISTRY
        .iter()
        .find(|e| e.name().eq_ignore_ascii_case(name))
        .map(|e| e.as_ref())
}

/// Registered format names, registration order.
pub fn supported_formats() -> Vec<&'static str> {
    REGISTRY.iter().map(|e| e.name()).collect()
}
