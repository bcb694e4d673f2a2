use std::path::PathBuf;
use thiserror::Error;

/// Result type for remap operations
pub type Result<T> = std::result::Result<T, RemapError>;

/// Errors that can occur while running a remap job
#[derive(Error, Debug)]
pub enum RemapError {
    /// One or more input files do not exist
    #[error("File not found: {}", join_paths(.paths))]
    NotFound { paths: Vec<PathBuf> },

    /// The table lacks the required identifier column
    #[error("Column '{column}' not found in CSV.")]
    MissingColumn { column: String },

    /// The mapping document is not a JSON object
    #[error("Invalid mapping: expected a JSON object, found {found}")]
    InvalidMapping { found: &'static str },

    /// A record has more fields than the header
    #[error("Malformed CSV at line {line}: expected {expected} fields, found {found}")]
    RaggedRow {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RemapError {
    pub fn not_found(paths: Vec<PathBuf>) -> Self {
        Self::NotFound { paths }
    }

    pub fn missing_column(column: impl Into<String>) -> Self {
        Self::MissingColumn {
            column: column.into(),
        }
    }

    /// HTTP-style status class: 404 for missing inputs, 400 for schema
    /// problems, 500 for everything else.
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::MissingColumn { .. } => 400,
            _ => 500,
        }
    }

    pub const fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_lists_every_path() {
        let err = RemapError::not_found(vec![
            PathBuf::from("./mapping.json"),
            PathBuf::from("./table.csv"),
        ]);
        assert_eq!(err.status_code(), 404);
        assert_eq!(
            err.to_string(),
            "File not found: ./mapping.json, ./table.csv"
        );
    }

    #[test]
    fn classifies_status_codes() {
        assert_eq!(RemapError::missing_column("id_perkiraan").status_code(), 400);
        assert!(RemapError::missing_column("id_perkiraan").is_client_error());

        let io = RemapError::from(std::io::Error::other("disk full"));
        assert_eq!(io.status_code(), 500);
        assert!(!io.is_client_error());
    }
}
