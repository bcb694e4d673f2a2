use crate::canon::{canon_json, canon_str};
use crate::error::{RemapError, Result};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Old-to-new identifier mapping with canonical keys and values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalMapping {
    entries: HashMap<String, String>,
}

impl CanonicalMapping {
    /// Canonicalize every entry of a raw JSON mapping.
    ///
    /// Entries are applied in document order, so when two raw keys collapse to
    /// the same canonical key the later one wins. A `null` value shadows any
    /// earlier entry for its key and is itself never matched.
    pub fn load(raw: &Map<String, Value>) -> Self {
        let mut entries = HashMap::with_capacity(raw.len());
        for (old, new) in raw {
            let key = canon_str(old);
            match canon_json(new) {
                Some(value) => {
                    entries.insert(key, value);
                }
                None => {
                    entries.remove(&key);
                }
            }
        }
        Self { entries }
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let bytes = bytes.strip_prefix("\u{feff}".as_bytes()).unwrap_or(bytes);
        match serde_json::from_slice::<Value>(bytes)? {
            Value::Object(raw) => Ok(Self::load(&raw)),
            other => Err(RemapError::InvalidMapping {
                found: json_type_name(&other),
            }),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)?;
        let mapping = Self::from_slice(&bytes)?;
        log::debug!(
            "Loaded {} canonical mapping entries from {}",
            mapping.len(),
            path.display()
        );
        Ok(mapping)
    }

    /// Look up an already canonical key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
