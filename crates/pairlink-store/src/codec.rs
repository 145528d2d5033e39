//! JSON (de)serialization between models and backend documents.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use pairlink_sync::Document;

use crate::error::Result;

/// Decode a document's fields into a model.
pub(crate) fn decode<T: DeserializeOwned>(doc: &Document) -> Result<T> {
    Ok(serde_json::from_value(Value::Object(doc.fields.clone()))?)
}

/// Decode a document, injecting the store-assigned id as the `id` field.
pub(crate) fn decode_with_id<T: DeserializeOwned>(doc: &Document) -> Result<T> {
    let mut fields = doc.fields.clone();
    fields.insert("id".to_string(), Value::String(doc.id.clone()));
    Ok(serde_json::from_value(Value::Object(fields))?)
}

pub(crate) fn to_value<T: Serialize>(model: &T) -> Result<Value> {
    Ok(serde_json::to_value(model)?)
}
