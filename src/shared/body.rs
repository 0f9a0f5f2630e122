//! Wire-body canonicalization.

use serde::Serialize;
use serde_json::{Map, Value};

/// Serialization of a request into its JSON POST body.
///
/// Optional fields are declared with `skip_serializing_if = "Option::is_none"`,
/// so the body contains exactly the fields the caller set, under their Rust
/// field names. Nested legs expand the same way.
pub trait PostBody: Serialize {
    fn to_post_body(&self) -> Result<Map<String, Value>, serde_json::Error> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(serde::ser::Error::custom(format!(
                "request body must be a JSON object, got {}",
                other
            ))),
        }
    }
}

/// Serialization of a request into URL query parameters.
pub trait QueryParams: Serialize {
    /// Encoded query string without the leading `?` (empty when nothing is set).
    fn to_query_string(&self) -> Result<String, serde_urlencoded::ser::Error> {
        serde_urlencoded::to_string(self)
    }
}
