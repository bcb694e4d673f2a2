//! Identifier canonicalization.
//!
//! Every identifier, whether it comes from the mapping file or from a table
//! cell, is reduced to a canonical key before it is compared: invisible
//! characters and all whitespace are removed, a trailing `.0` float artifact is
//! dropped, and the result is uppercased.

use crate::types::Cell;
use serde_json::Value;

const BYTE_ORDER_MARK: char = '\u{feff}';
const ZERO_WIDTH_SPACE: char = '\u{200b}';
const FLOAT_ARTIFACT: &str = ".0";

/// Canonical key of a table cell; `None` for missing cells.
pub fn canon(cell: &Cell) -> Option<String> {
    match cell {
        Cell::Null => None,
        Cell::Text(text) => Some(canon_str(text)),
        Cell::Int(value) => Some(canon_str(&value.to_string())),
    }
}

/// Canonical key of a JSON scalar; `None` for `null` and containers.
pub fn canon_json(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Array(_) | Value::Object(_) => None,
        Value::String(text) => Some(canon_str(text)),
        Value::Number(number) => Some(canon_str(&number.to_string())),
        Value::Bool(true) => Some(canon_str("True")),
        Value::Bool(false) => Some(canon_str("False")),
    }
}

/// Canonicalize raw identifier text. Never fails; empty input yields `""`.
pub fn canon_str(raw: &str) -> String {
    let mut key: String = raw
        .chars()
        .filter(|c| *c != BYTE_ORDER_MARK && *c != ZERO_WIDTH_SPACE && !c.is_whitespace())
        .collect();

    // Repeated so that canon(canon(x)) == canon(x) also holds for "1.0.0".
    while key.ends_with(FLOAT_ARTIFACT) {
        key.truncate(key.len() - FLOAT_ARTIFACT.len());
    }

    key.to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ignores_case_whitespace_and_invisible_characters() {
        let expected = canon_str("ABC");
        assert_eq!(canon_str("  abc "), expected);
        assert_eq!(canon_str("\u{feff}abc"), expected);
        assert_eq!(canon_str("a\u{200b}b c"), expected);
        assert_eq!(canon_str("a \t b\n c"), expected);
    }

    #[test]
    fn strips_float_artifact() {
        assert_eq!(canon_str("123.0"), "123");
        assert_eq!(canon_str("123"), "123");
        assert_eq!(canon_str("12.05"), "12.05");
        assert_eq!(canon_str("1.00"), "1.00");
    }

    #[test]
    fn is_idempotent() {
        for raw in ["  x1 ", "1.0.0", "\u{feff}9.0", "ab cd", "", "ß", "0"] {
            let once = canon_str(raw);
            assert_eq!(canon_str(&once), once, "input {raw:?}");
        }
    }

    #[test]
    fn empty_text_is_a_key_but_null_is_not() {
        assert_eq!(canon(&Cell::text("   ")), Some(String::new()));
        assert_eq!(canon(&Cell::Null), None);
        assert_eq!(canon(&Cell::Int(42)), Some("42".to_string()));
    }

    #[test]
    fn renders_json_scalars() {
        assert_eq!(canon_json(&json!("a-1")), Some("A-1".to_string()));
        assert_eq!(canon_json(&json!(100)), Some("100".to_string()));
        assert_eq!(canon_json(&json!(12.0)), Some("12".to_string()));
        assert_eq!(canon_json(&json!(true)), Some("TRUE".to_string()));
        assert_eq!(canon_json(&json!(null)), None);
        assert_eq!(canon_json(&json!([1])), None);
    }
}
