//! HTTP server for the conversion API.
//!
//! # API Endpoints
//!
//! | Method | Path        | Description                          |
//! |--------|-------------|--------------------------------------|
//! | GET    | `/health`   | Health check                         |
//! | POST   | `/convert`  | Convert a JSON payload to a document |
//! | GET    | `/api/logs` | SSE stream for real-time logs        |
//!
//! Success responses stream the encoded bytes with the encoder's
//! content type and an attachment filename; every failure produces a
//! JSON body with a single `error` field and never partial output.

use axum::{
    extract::rejection::JsonRejection,
    http::{header, Method, StatusCode},
    response::{sse::Event, IntoResponse, Json, Response, Sse},
    routing::{get, post},
    Router,
};
use futures::stream::Stream;
use serde_json::{json, Value};
use std::{convert::Infallible, net::SocketAddr, time::Duration};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;
use tower_http::cors::CorsLayer;

use super::logs::LOG_BROADCASTER;
use super::types::error_body;
use crate::encode::supported_formats;
use crate::pipeline::{convert, ConvertRequest};

/// Build the application router.
pub fn router() -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE, header::CONTENT_DISPOSITION]);

    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/convert", post(convert_handler))
        .route("/api/logs", get(sse_logs))
        .layer(cors)
}

/// Start the HTTP server.
pub async fn start_server(port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    println!("recast server running on http://localhost:{}", port);
    println!("   POST /convert   - Convert JSON to a document format");
    println!("   GET  /api/logs  - SSE log stream");
    println!("   GET  /health    - Health check");
    println!("   Formats: {}", supported_formats().join(", "));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router()).await?;

    Ok(())
}

/// Health check endpoint.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "recast",
        "version": env!("CARGO_PKG_VERSION"),
        "formats": supported_formats(),
    }))
}

/// SSE endpoint for real-time log streaming.
async fn sse_logs() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = LOG_BROADCASTER.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(entry) => {
            let json = serde_json::to_string(&entry).ok()?;
            Some(Ok(Event::default().data(json)))
        }
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

/// Conversion endpoint.
///
/// The `Result` extractor keeps malformed JSON bodies inside the same
/// `{ "error": ... }` contract instead of axum's plain-text rejection.
pub async fn convert_handler(payload: Result<Json<ConvertRequest>, JsonRejection>) -> Response {
    let Json(request) = match payload {
        Ok(json) => json,
        Err(rejection) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(error_body(&rejection.body_text())),
            )
                .into_response();
        }
    };

    match convert(request).await {
        Ok(conversion) => (
            [
                (header::CONTENT_TYPE, conversion.content_type.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename={}", conversion.filename),
                ),
            ],
            conversion.bytes,
        )
            .into_response(),
        Err(err) => (err.status(), Json(error_body(&err.to_string()))).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::json;
    use tower::ServiceExt;

    async fn post_convert(body: Value) -> (StatusCode, Response) {
        let request: ConvertRequest = serde_json::from_value(body).unwrap();
        let response = convert_handler(Ok(Json(request))).await;
        (response.status(), response)
    }

    async fn body_string(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_csv_end_to_end() {
        let (status, response) =
            post_convert(json!({"data": {"name": "Ann", "age": 30}, "outputType": "csv"})).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE.as_str()],
            "text/csv"
        );
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION.as_str()],
            "attachment; filename=data.csv"
        );
        assert_eq!(body_string(response).await, "name,age\nAnn,30\n");
    }

    #[tokio::test]
    async fn test_xml_end_to_end() {
        let (status, response) =
            post_convert(json!({"data": [{"x": 1}, {"x": 2}], "outputType": "xml"})).await;

        assert_eq!(status, StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.starts_with("<records>"));
        assert_eq!(body.matches("<x>").count(), 2);
    }

    #[tokio::test]
    async fn test_missing_field_is_400_with_error_body() {
        let (status, response) = post_convert(json!({"outputType": "csv"})).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert!(body["error"].as_str().unwrap().contains("data"));
    }

    #[tokio::test]
    async fn test_unsupported_format_is_400() {
        let (status, response) =
            post_convert(json!({"data": {"x": 1}, "outputType": "yaml"})).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert!(body["error"].as_str().unwrap().contains("yaml"));
    }

    #[tokio::test]
    async fn test_file_type_alias_accepted() {
        let (status, _) = post_convert(json!({"data": {"x": 1}, "fileType": "pdf"})).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_malformed_json_body_is_400_with_error_shape() {
        // Goes through the real extractor: the rejection must land in
        // the same { "error": ... } contract as validation failures.
        let request = Request::builder()
            .method("POST")
            .uri("/convert")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let response = router().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert!(body["error"].as_str().is_some());
        assert_eq!(body.as_object().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_error_response_has_no_attachment_header() {
        let (_, response) = post_convert(json!({"data": [1], "outputType": "csv"})).await;
        assert!(response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .is_none());
    }
}
