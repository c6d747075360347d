//! REST API response helpers.
//!
//! The error contract is a single-field JSON body: `{ "error": <msg> }`.
//! Success responses carry the encoded bytes directly with the format's
//! content type and a `data.<ext>` attachment filename, so there is no
//! success wrapper type here.

use serde_json::{json, Value};

/// Build the JSON error body used by every failure response.
pub fn error_body(message: &str) -> Value {
    json!({ "error": message })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_shape() {
        let body = error_body("Missing required field: data");
        assert_eq!(body["error"], "Missing required field: data");
        assert_eq!(body.as_object().unwrap().len(), 1);
    }
}
