// File: src/document/json.rs
use crate::core::engine::PronunciationRecord;
use crate::core::types::MappingEntry;
use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::{Map, Value};

/// `nucleus` may be the XML-style string or a real boolean; any other value is not a nucleus.
fn is_nucleus(value: &Value) -> bool {
    matches!(value, Value::Bool(true)) || value.as_str() == Some("true")
}

#[derive(Debug, Deserialize)]
struct MappingRow {
    ipa: String,
    pron: String,
    #[serde(default)]
    nucleus: Option<Value>,
}

pub fn parse_mapping(content: &str) -> Result<Vec<MappingEntry>> {
    let rows: Vec<MappingRow> =
        serde_json::from_str(content).context("mapping must be an array of {ipa, pron, nucleus}")?;
    Ok(rows
        .into_iter()
        .map(|row| MappingEntry {
            nucleus: row.nucleus.as_ref().is_some_and(is_nucleus),
            ipa: row.ipa,
            pron: row.pron,
        })
        .collect())
}

pub type JsonRecord = Map<String, Value>;

pub fn parse_lexicon(content: &str) -> Result<Vec<JsonRecord>> {
    serde_json::from_str(content).context("lexicon must be an array of objects")
}

impl PronunciationRecord for JsonRecord {
    fn ipa(&self) -> Option<&str> {
        self.get("ipa").and_then(Value::as_str)
    }

    fn set_field(&mut self, key: &str, value: &str) {
        self.insert(key.to_string(), Value::String(value.to_string()));
    }
}
