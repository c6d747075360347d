//! Conversion pipeline: validate → normalize → flatten → encode.
//!
//! This is the single code path every format goes through. The request
//! is validated before any flattening work starts, the encoder is run
//! on the blocking pool, and the caller awaits exactly one outcome -
//! there is no per-format branching at the call site and no second
//! place a response can be produced from.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::logs::{log_error, log_info, log_success};
use crate::encode::{self, Encoder};
use crate::error::{ConvertError, ConvertResult, EncodeError, EncodeResult, RequestError};
use crate::flatten::RecordSet;
use crate::flatten::normalize;

/// A decoded conversion request, as handed over by the transport layer.
///
/// Both fields are optional at the serde level so that absence is
/// reported through [`RequestError::MissingField`] with a stable error
/// body, not through a deserialization failure. `fileType` is accepted
/// as an alias of `outputType`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertRequest {
    /// Payload to convert: an object or an array of objects.
    #[serde(default)]
    pub data: Option<Value>,

    /// Requested output format, case-insensitive.
    #[serde(default, alias = "fileType")]
    pub output_type: Option<String>,
}

/// A successful conversion, ready for transmission.
///
/// The byte buffer is owned by the caller from here on; nothing in the
/// pipeline retains or reuses it.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub filename: String,
}

/// Run one conversion end to end.
///
/// Steps, failing fast in this order:
/// 1. `data` and `outputType` present ([`RequestError::MissingField`])
/// 2. format registered ([`RequestError::UnsupportedFormat`])
/// 3. `data` normalized to a record set ([`RequestError::InvalidShape`])
/// 4. encoder invoked on the blocking pool; failure or panic surfaces
///    as an [`EncodeError`], never as a crashed request
pub async fn convert(request: ConvertRequest) -> ConvertResult<Conversion> {
    let data = request.data.ok_or(RequestError::MissingField("data"))?;
    let format = request
        .output_type
        .ok_or(RequestError::MissingField("outputType"))?;

    let encoder = encode::lookup(&format).ok_or_else(|| RequestError::UnsupportedFormat {
        requested: format.clone(),
        supported: encode::supported_formats().join(", "),
    })?;

    let records = normalize(&data)?;
    log_info(format!(
        "Converting {} record(s) to {}",
        records.len(),
        encoder.name()
    ));

    match run_encoder(encoder, records).await {
        Ok(bytes) => {
            log_success(format!(
                "Encoded {} bytes of {}",
                bytes.len(),
                encoder.name()
            ));
            Ok(Conversion {
                bytes,
                content_type: encoder.content_type(),
                filename: format!("data.{}", encoder.file_extension()),
            })
        }
        Err(encode_err) => {
            // Full cause stays in the server log; the client body only
            // carries the format name and a short message.
            log_error(encode_err.to_string());
            Err(ConvertError::Encode(encode_err))
        }
    }
}

/// Single completion point for every format: the encoder runs to
/// completion on the blocking pool and this await resolves exactly
/// once, whether the underlying library returned bytes directly or
/// buffered them internally. A panicking encoder comes back as a
/// `JoinError` and is mapped to an [`EncodeError`] like any other
/// failure, so the request still gets its one outcome.
async fn run_encoder(encoder: &'static dyn Encoder, records: RecordSet) -> EncodeResult<Vec<u8>> {
    tokio::task::spawn_blocking(move || encoder.encode(&records))
        .await
        .map_err(|panic_err| EncodeError::new(encoder.name(), panic_err.to_string()))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(data: Value, format: &str) -> ConvertRequest {
        ConvertRequest {
            data: Some(data),
            output_type: Some(format.to_string()),
        }
    }

    #[tokio::test]
    async fn test_missing_data_is_client_error() {
        let err = convert(ConvertRequest {
            data: None,
            output_type: Some("csv".into()),
        })
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            ConvertError::Request(RequestError::MissingField("data"))
        ));
    }

    #[tokio::test]
    async fn test_missing_format_is_client_error() {
        let err = convert(ConvertRequest {
            data: Some(json!({"x": 1})),
            output_type: None,
        })
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            ConvertError::Request(RequestError::MissingField("outputType"))
        ));
    }

    #[tokio::test]
    async fn test_unsupported_format_checked_before_shape() {
        // Format lookup fails fast even though data is also unusable.
        let err = convert(request(json!("scalar"), "yaml")).await.unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("yaml"));
        assert!(msg.contains("csv, excel, pdf, docx, xml"));
    }

    #[tokio::test]
    async fn test_invalid_shape_is_client_error() {
        let err = convert(request(json!([1, 2]), "csv")).await.unwrap_err();

        assert!(matches!(
            err,
            ConvertError::Request(RequestError::InvalidShape(_))
        ));
    }

    #[tokio::test]
    async fn test_every_format_succeeds_with_documented_content_type() {
        let expected = [
            ("csv", "text/csv", "data.csv"),
            (
                "excel",
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
                "data.xlsx",
            ),
            ("pdf", "application/pdf", "data.pdf"),
            (
                "docx",
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
                "data.docx",
            ),
            ("xml", "application/xml", "data.xml"),
        ];

        for (format, content_type, filename) in expected {
            let result = convert(request(json!({"name": "Ann", "age": 30}), format))
                .await
                .unwrap();
            assert_eq!(result.content_type, content_type, "format {}", format);
            assert_eq!(result.filename, filename, "format {}", format);
            assert!(!result.bytes.is_empty(), "format {}", format);
        }
    }

    #[tokio::test]
    async fn test_format_name_case_insensitive() {
        let result = convert(request(json!({"x": 1}), "CSV")).await.unwrap();
        assert_eq!(result.filename, "data.csv");
    }

    #[tokio::test]
    async fn test_file_type_alias_deserializes() {
        let req: ConvertRequest =
            serde_json::from_value(json!({"data": {"x": 1}, "fileType": "pdf"})).unwrap();
        assert_eq!(req.output_type.as_deref(), Some("pdf"));

        let req: ConvertRequest =
            serde_json::from_value(json!({"data": {"x": 1}, "outputType": "pdf"})).unwrap();
        assert_eq!(req.output_type.as_deref(), Some("pdf"));
    }

    struct PanickingEncoder;

    impl Encoder for PanickingEncoder {
        fn name(&self) -> &'static str {
            "boom"
        }

        fn content_type(&self) -> &'static str {
            "application/octet-stream"
        }

        fn file_extension(&self) -> &'static str {
            "bin"
        }

        fn encode(&self, _records: &[crate::flatten::FlatRecord]) -> EncodeResult<Vec<u8>> {
            panic!("encoder blew up");
        }
    }

    #[tokio::test]
    async fn test_encoder_panic_surfaces_as_encode_error() {
        let encoder: &'static dyn Encoder = Box::leak(Box::new(PanickingEncoder));

        // The await resolves exactly once, with an error, not a crash.
        let err = run_encoder(encoder, vec![]).await.unwrap_err();
        assert_eq!(err.format, "boom");
        assert!(err.message.contains("panic"));

        let convert_err: ConvertError = err.into();
        assert_eq!(
            convert_err.status(),
            axum::http::StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_csv_end_to_end() {
        let result = convert(request(json!({"name": "Ann", "age": 30}), "csv"))
            .await
            .unwrap();
        assert_eq!(String::from_utf8(result.bytes).unwrap(), "name,age\nAnn,30\n");
    }
}
