//! Records returned by the gateway: dynamically typed rows and entity metadata.

use base64::Engine;
use chrono::{DateTime, Utc};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// One decoded cell.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Timestamp(DateTime<Utc>),
    /// JSON/JSONB document, passed through structurally.
    Json(serde_json::Value),
    /// Raw bytes, also used for column types without a dedicated variant.
    Bytes(Vec<u8>),
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Null => serializer.serialize_unit(),
            FieldValue::Bool(b) => serializer.serialize_bool(*b),
            FieldValue::Int(n) => serializer.serialize_i64(*n),
            FieldValue::Float(f) => serializer.serialize_f64(*f),
            FieldValue::Text(s) => serializer.serialize_str(s),
            FieldValue::Timestamp(t) => serializer.serialize_str(&t.to_rfc3339()),
            FieldValue::Json(v) => v.serialize(serializer),
            FieldValue::Bytes(b) => {
                serializer.serialize_str(&base64::engine::general_purpose::STANDARD.encode(b))
            }
        }
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Int(n)
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float(f)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(t: DateTime<Utc>) -> Self {
        FieldValue::Timestamp(t)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

/// A row as ordered `(column, value)` pairs. Serializes as a JSON object in column order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GenericRecord {
    fields: Vec<(String, FieldValue)>,
}

impl GenericRecord {
    pub fn with_capacity(n: usize) -> Self {
        GenericRecord {
            fields: Vec::with_capacity(n),
        }
    }

    pub fn push(&mut self, column: impl Into<String>, value: FieldValue) {
        self.fields.push((column.into(), value));
    }

    /// First value for `column`. Duplicate column names (e.g. from joins) keep all entries in order.
    pub fn get(&self, column: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(c, _)| c == column).map(|(_, v)| v)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(c, _)| c.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(c, v)| (c.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, FieldValue)> for GenericRecord {
    fn from_iter<I: IntoIterator<Item = (K, FieldValue)>>(iter: I) -> Self {
        GenericRecord {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl Serialize for GenericRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Row of the `entities` metadata table.
#[derive(Clone, Debug, PartialEq, Serialize, sqlx::FromRow)]
pub struct EntityMeta {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    #[sqlx(rename = "created_by_id")]
    pub created_by: i64,
    pub updated_at: DateTime<Utc>,
    #[sqlx(rename = "updated_by_id")]
    pub updated_by: i64,
    pub deleted: bool,
}

/// Offset/limit for list reads. Zero means "not applied".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PaginationOptions {
    pub skip: u64,
    pub take: u64,
}
