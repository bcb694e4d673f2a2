use crate::error::Result;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Canonical identifiers that had no mapping entry, deduplicated, in the
/// order they were first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnmappedSet {
    keys: Vec<String>,
    seen: HashSet<String>,
}

impl UnmappedSet {
    /// Record a key; returns false if it was already present.
    pub fn insert(&mut self, key: &str) -> bool {
        if self.seen.contains(key) {
            return false;
        }
        self.seen.insert(key.to_string());
        self.keys.push(key.to_string());
        true
    }

    pub fn as_slice(&self) -> &[String] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.keys
    }

    /// Overwrite `path` with one key per line. An empty set writes nothing and
    /// leaves any earlier report in place. Returns whether a file was written.
    pub fn write_report(&self, path: &Path) -> Result<bool> {
        if self.is_empty() {
            return Ok(false);
        }
        let mut body = String::new();
        for key in &self.keys {
            body.push_str(key);
            body.push('\n');
        }
        fs::write(path, body)?;
        log::info!("Wrote {} unmapped keys to {}", self.len(), path.display());
        Ok(true)
    }
}
