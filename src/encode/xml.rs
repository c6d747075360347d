//! XML encoder: `<records>` root, one `<record>` per flat record.
//!
//! Flat keys become element names after sanitization: every character
//! outside `[A-Za-z0-9_-]` is replaced with `_`, so `tags[0]` becomes
//! `tags_0_`. A name that would not start with a letter or `_` gets a
//! leading `_` on top of the substitution rule, since XML names cannot
//! begin with a digit or `-` (a key `"0"` becomes `<_0>`). Element text
//! is the scalar's string form; text escaping is handled by `quick-xml`.

use std::io::Cursor;

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use super::Encoder;
use crate::error::{EncodeError, EncodeResult};
use crate::flatten::{scalar_to_string, FlatRecord};

pub struct XmlEncoder;

impl Encoder for XmlEncoder {
    fn name(&self) -> &'static str {
        "xml"
    }

    fn content_type(&self) -> &'static str {
        "application/xml"
    }

    fn file_extension(&self) -> &'static str {
        "xml"
    }

    fn encode(&self, records: &[FlatRecord]) -> EncodeResult<Vec<u8>> {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

        writer
            .write_event(Event::Start(BytesStart::new("records")))
            .map_err(xml_err)?;

        for record in records {
            writer
                .write_event(Event::Start(BytesStart::new("record")))
                .map_err(xml_err)?;

            for (key, value) in record {
                let name = element_name(key);
                writer
                    .write_event(Event::Start(BytesStart::new(name.as_str())))
                    .map_err(xml_err)?;
                writer
                    .write_event(Event::Text(BytesText::new(&scalar_to_string(value))))
                    .map_err(xml_err)?;
                writer
                    .write_event(Event::End(BytesEnd::new(name.as_str())))
                    .map_err(xml_err)?;
            }

            writer
                .write_event(Event::End(BytesEnd::new("record")))
                .map_err(xml_err)?;
        }

        writer
            .write_event(Event::End(BytesEnd::new("records")))
            .map_err(xml_err)?;

        Ok(writer.into_inner().into_inner())
    }
}

fn xml_err(e: impl std::fmt::Display) -> EncodeError {
    EncodeError::new("xml", e.to_string())
}

/// Replace every character outside `[A-Za-z0-9_-]` with `_`, then
/// prefix `_` if the result does not start with a valid name-start
/// character (letter or `_`).
fn element_name(key: &str) -> String {
    let mut name: String = key
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let starts_valid = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    if !starts_valid {
        name.insert(0, '_');
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flatten::normalize;
    use serde_json::json;

    fn encode_str(data: serde_json::Value) -> String {
        let records = normalize(&data).unwrap();
        let bytes = XmlEncoder.encode(&records).unwrap();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_root_and_one_child_per_record() {
        let out = encode_str(json!([{"x": 1}, {"x": 2}]));

        assert!(out.starts_with("<records>"));
        assert!(out.trim_end().ends_with("</records>"));
        assert_eq!(out.matches("<record>").count(), 2);
        assert_eq!(out.matches("<x>").count(), 2);
        assert!(out.contains("<x>1</x>"));
        assert!(out.contains("<x>2</x>"));
    }

    #[test]
    fn test_element_name_sanitization() {
        assert_eq!(element_name("tags[0]"), "tags_0_");
        assert_eq!(element_name("user.name"), "user_name");
        assert_eq!(element_name("plain_OK-2"), "plain_OK-2");
        assert_eq!(element_name("a b/c"), "a_b_c");
    }

    #[test]
    fn test_element_name_gets_valid_start_character() {
        assert_eq!(element_name("0"), "_0");
        assert_eq!(element_name("123abc"), "_123abc");
        assert_eq!(element_name("-x"), "_-x");
        assert_eq!(element_name(""), "_");
        assert_eq!(element_name("_ok"), "_ok");
    }

    #[test]
    fn test_digit_leading_key_is_well_formed() {
        let out = encode_str(json!({"0": 1}));
        assert!(out.contains("<_0>1</_0>"));
        assert!(!out.contains("<0>"));
    }

    #[test]
    fn test_bracketed_keys_in_output() {
        let out = encode_str(json!({"tags": ["a"]}));
        assert!(out.contains("<tags_0_>a</tags_0_>"));
    }

    #[test]
    fn test_text_escaping() {
        let out = encode_str(json!({"note": "a < b & c"}));
        assert!(out.contains("a &lt; b &amp; c"));
    }

    #[test]
    fn test_null_is_empty_element() {
        let out = encode_str(json!({"a": null}));
        assert!(out.contains("<a></a>"));
    }

    #[test]
    fn test_deterministic_output() {
        let data = json!([{"a": 1}, {"b": true}]);
        assert_eq!(encode_str(data.clone()), encode_str(data));
    }
}
