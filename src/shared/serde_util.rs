//! Custom serde helpers for backend wire formats.

/// `skip_serializing_if` predicate: absent or empty lists are left off the wire.
pub fn is_none_or_empty<T>(values: &Option<Vec<T>>) -> bool {
    values.as_ref().map_or(true, Vec::is_empty)
}

/// Serializes a list of strings as one comma-joined string.
///
/// The backend takes multi-valued query parameters as `a,b,c`
/// (e.g. `statuses=ACTIVE,COMPLETE`).
pub mod comma_separated {
    use serde::Serializer;

    pub fn serialize<S>(values: &Option<Vec<String>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match values {
            Some(values) => serialize_vec(values, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn serialize_vec<S>(values: &[String], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&values.join(","))
    }
}
