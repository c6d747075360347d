//! Recursive JSON flattening into tabular records.
//!
//! Converts arbitrarily nested JSON into a single-level key → scalar
//! mapping so that row/column encoders can consume it uniformly.
//!
//! # Key convention
//!
//! One fixed convention for the whole crate:
//!
//! - object keys are joined to their parent path with `.`
//! - array indices are appended in brackets: `key[index]`
//!
//! ```text
//! { "user": { "name": "Ann", "tags": ["a", "b"] } }
//!     → user.name = "Ann", user.tags[0] = "a", user.tags[1] = "b"
//! ```
//!
//! The bracketed form is deliberately asymmetric with the dot join: from
//! a flat key alone you can always tell an array index from a literal
//! object key named `"0"`.
//!
//! Key order within a record is encounter order during the walk. If two
//! input paths collapse to the same flat key (only possible with keys
//! that already contain `.` or `[`), the later value overwrites the
//! earlier one; that is documented behavior, not an error.

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::{RequestError, RequestResult};

/// One flattened unit: flat key → scalar value, in encounter order.
///
/// Invariant: no value is itself an object or array.
pub type FlatRecord = IndexMap<String, Value>;

/// Ordered collection of all records derived from one request's `data`.
/// Order determines row order in tabular outputs and page/section order
/// in document outputs.
pub type RecordSet = Vec<FlatRecord>;

/// Flatten one JSON value into `out` under `prefix`.
///
/// Scalars (including `null`) are written directly; objects and arrays
/// recurse with an extended path. Empty objects and arrays contribute
/// zero entries, so their path disappears from the record.
pub fn flatten_value(value: &Value, prefix: &str, out: &mut FlatRecord) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let child_path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                flatten_value(child, &child_path, out);
            }
        }
        Value::Array(items) => {
            for (i, child) in items.iter().enumerate() {
                let child_path = format!("{}[{}]", prefix, i);
                flatten_value(child, &child_path, out);
            }
        }
        scalar => {
            out.insert(prefix.to_string(), scalar.clone());
        }
    }
}

/// Flatten a single top-level object into one [`FlatRecord`].
pub fn flatten_record(value: &Value) -> FlatRecord {
    let mut out = FlatRecord::new();
    flatten_value(value, "", &mut out);
    out
}

/// Normalize a request's `data` payload into a [`RecordSet`].
///
/// - object → one record
/// - array of objects → one record per element, input order preserved
/// - anything else → [`RequestError::InvalidShape`]
///
/// Top-level scalars are rejected here rather than producing the
/// degenerate empty-string-keyed record the flattener would emit.
pub fn normalize(data: &Value) -> RequestResult<RecordSet> {
    match data {
        Value::Object(_) => Ok(vec![flatten_record(data)]),
        Value::Array(items) => {
            let mut records = RecordSet::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                if !item.is_object() {
                    return Err(RequestError::InvalidShape(format!(
                        "data[{}] is {}, expected an object",
                        i,
                        type_name(item)
                    )));
                }
                records.push(flatten_record(item));
            }
            Ok(records)
        }
        other => Err(RequestError::InvalidShape(format!(
            "data is {}, expected an object or an array of objects",
            type_name(other)
        ))),
    }
}

/// Render a scalar leaf for textual outputs. `null` becomes the empty
/// string only at this point, never during flattening.
pub fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
