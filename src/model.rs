// model-catalog/src/model.rs

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const UNKNOWN_PROVIDER: &str = "unknown";

/// One model offering as written on disk: any JSON object. `attributes` is
/// the whole source object in source order; `provider` and `model_name` are
/// its identifying fields read as labels, `None` when absent or falsy
/// (`null`, `false`, `0`, `""`, `[]`, `{}`).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct ModelRecord {
    pub provider: Option<String>,
    pub model_name: Option<String>,
    pub attributes: Map<String, Value>,
}

impl From<Map<String, Value>> for ModelRecord {
    fn from(attributes: Map<String, Value>) -> Self {
        Self {
            provider: attributes.get("provider").and_then(label),
            model_name: attributes.get("model_name").and_then(label),
            attributes,
        }
    }
}

impl From<ModelRecord> for Map<String, Value> {
    fn from(r: ModelRecord) -> Self { r.attributes }
}

impl ModelRecord {
    pub fn provider_or_unknown(&self) -> &str {
        self.provider.as_deref().unwrap_or(UNKNOWN_PROVIDER)
    }

    /// `model_name`, or `fallback` (the file stem).
    pub fn model_name_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.model_name.as_deref().unwrap_or(fallback)
    }
}

/// Text used for a field inside an id. Falsy values have none; `true`
/// renders as `True`, numbers as written, containers as compact JSON.
fn label(v: &Value) -> Option<String> {
    match v {
        Value::Null | Value::Bool(false) => None,
        Value::Bool(true) => Some("True".into()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Array(a) if a.is_empty() => None,
        Value::Object(o) if o.is_empty() => None,
        other => Some(other.to_string()),
    }
}

/// A record as it appears in the bundle: the source fields in source order,
/// with `id` and `__filename` set. A key the source already had keeps its
/// position; otherwise the two are appended.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct BundledModel {
    pub id: String,
    pub filename: String,
    pub record: ModelRecord,
}

impl BundledModel {
    pub fn new(record: ModelRecord, file_name: &str, file_stem: &str) -> Self {
        let id = format!("{}/{}", record.provider_or_unknown(), record.model_name_or(file_stem));
        Self { id, filename: file_name.to_owned(), record }
    }
}

impl From<BundledModel> for Map<String, Value> {
    fn from(m: BundledModel) -> Self {
        let mut out = m.record.attributes;
        out.insert("id".into(), Value::String(m.id));
        out.insert("__filename".into(), Value::String(m.filename));
        out
    }
}

impl TryFrom<Map<String, Value>> for BundledModel {
    type Error = String;

    fn try_from(mut map: Map<String, Value>) -> Result<Self, Self::Error> {
        let mut take = |key: &str| match map.shift_remove(key) {
            Some(Value::String(s)) => Ok(s),
            _ => Err(format!("bundled model without string `{key}`")),
        };
        let id = take("id")?;
        let filename = take("__filename")?;
        Ok(Self { id, filename, record: map.into() })
    }
}

/// The generated artifact handed to the UI.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bundle {
    pub generated_at: String,
    pub models: Vec<BundledModel>,
}
