//! Document and patch primitives.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde_json::Value;

/// Field map of a stored document.
pub type Fields = serde_json::Map<String, Value>;

/// A document as returned by the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Store-assigned id: the last path segment for keyed documents, a
    /// generated id for appended ones.
    pub id: String,
    /// Insertion order within the store. Breaks ties between documents
    /// carrying equal timestamps.
    pub seq: u64,
    /// Server-assigned creation time of the document.
    pub created_at: DateTime<Utc>,
    pub fields: Fields,
}

/// One field write inside a [`Patch`].
#[derive(Debug, Clone)]
pub enum WriteValue {
    /// Store this literal value.
    Set(Value),
    /// Resolve to the backend clock at write time. Client clocks never end
    /// up in stored data.
    ServerTimestamp,
}

/// A field-level mutation. Only the named fields are touched, so two
/// devices patching different fields of the same document never clobber
/// each other.
#[derive(Debug, Clone, Default)]
pub struct Patch {
    entries: BTreeMap<String, WriteValue>,
}

impl Patch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field to a literal value.
    pub fn set(mut self, field: &str, value: Value) -> Self {
        self.entries.insert(field.to_string(), WriteValue::Set(value));
        self
    }

    /// Set a field to the server-assigned write timestamp.
    pub fn server_timestamp(mut self, field: &str) -> Self {
        self.entries
            .insert(field.to_string(), WriteValue::ServerTimestamp);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve into concrete fields, using `now` as the server clock
    /// reading.
    pub(crate) fn resolve(self, now: DateTime<Utc>) -> Fields {
        let mut fields = Fields::new();
        for (name, write) in self.entries {
            let value = match write {
                WriteValue::Set(v) => v,
                WriteValue::ServerTimestamp => Value::String(now.to_rfc3339()),
            };
            fields.insert(name, value);
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_patch_resolves_server_timestamps() {
        let now = Utc.with_ymd_and_hms(2025, 9, 1, 8, 0, 0).unwrap();
        let fields = Patch::new()
            .set("text", json!("hi"))
            .server_timestamp("createdAt")
            .resolve(now);

        assert_eq!(fields["text"], json!("hi"));
        let stamped: DateTime<Utc> =
            serde_json::from_value(fields["createdAt"].clone()).unwrap();
        assert_eq!(stamped, now);
    }

    #[test]
    fn test_patch_last_write_wins_per_field() {
        let now = Utc.with_ymd_and_hms(2025, 9, 1, 8, 0, 0).unwrap();
        let fields = Patch::new()
            .set("text", json!("first"))
            .set("text", json!("second"))
            .resolve(now);

        assert_eq!(fields["text"], json!("second"));
    }
}
