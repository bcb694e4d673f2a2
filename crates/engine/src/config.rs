use serde::{Deserialize, Serialize};

pub const DEFAULT_ID_COLUMN: &str = "id_perkiraan";
pub const DEFAULT_PARENT_COLUMN: &str = "id_parent";

/// Cell values read as missing, in addition to the empty field.
pub const DEFAULT_NA_VALUES: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Column names and parsing rules for a remap job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RemapConfig {
    /// Identifier column; required in every input table
    pub id_column: String,

    /// Parent identifier column; remapped only when present
    pub parent_column: String,

    /// Tokens treated as missing cells. The empty field is always missing.
    pub na_values: Vec<String>,
}

impl Default for RemapConfig {
    fn default() -> Self {
        Self {
            id_column: DEFAULT_ID_COLUMN.to_string(),
            parent_column: DEFAULT_PARENT_COLUMN.to_string(),
            na_values: DEFAULT_NA_VALUES.iter().map(|v| (*v).to_string()).collect(),
        }
    }
}

impl RemapConfig {
    pub fn is_missing(&self, field: &str) -> bool {
        field.is_empty() || self.na_values.iter().any(|na| na == field)
    }

    /// The columns coerced to integers after remapping
    pub fn identifier_columns(&self) -> [&str; 2] {
        [self.id_column.as_str(), self.parent_column.as_str()]
    }
}
