//! # recast - JSON to document format conversion
//!
//! recast accepts arbitrary JSON and re-encodes it into one of five
//! output document formats: CSV, Excel, PDF, Word and XML.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  JSON data  │────▶│  Flattener  │────▶│   Encoder   │────▶│    bytes    │
//! │ (any shape) │     │ (flat rows) │     │ (registry)  │     │ + mime type │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use recast::{convert, ConvertRequest};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() {
//!     let request = ConvertRequest {
//!         data: Some(json!({"name": "Ann", "age": 30})),
//!         output_type: Some("csv".into()),
//!     };
//!     let out = convert(request).await.unwrap();
//!     println!("{} bytes of {}", out.bytes.len(), out.content_type);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`flatten`] - Nested JSON → flat record transform
//! - [`encode`] - Encoder trait, registry and per-format encoders
//! - [`pipeline`] - Validate, flatten, dispatch, encode
//! - [`api`] - HTTP API server

// Core modules
pub mod error;
pub mod flatten;

// Encoders
pub mod encode;

// Orchestration
pub mod pipeline;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    ConvertError, ConvertResult, EncodeError, EncodeResult, RequestError, RequestResult,
};

// =============================================================================
// Re-exports - Flattener
// =============================================================================

pub use flatten::{flatten_record, flatten_value, normalize, FlatRecord, RecordSet};

// =============================================================================
// Re-exports - Encoders
// =============================================================================

pub use encode::{
    lookup, supported_formats, CsvEncoder, DocxEncoder, Encoder, ExcelEncoder, PdfEncoder,
    XmlEncoder,
};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use pipeline::{convert, Conversion, ConvertRequest};

// Server
pub mod server {
    pub use crate::api::server::{router, start_server};
}
