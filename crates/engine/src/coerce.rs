use crate::config::RemapConfig;
use crate::types::{Cell, Table};

/// Convert the identifier columns that are present to integers. Never fails:
/// anything that does not parse as a finite number in `i64` range becomes 0.
///
/// Distinct identifier strings can land on the same integer (`007` and `7`),
/// so a parent equal to its row's identifier is reset to 0 once more after
/// conversion.
pub fn coerce(mut table: Table, config: &RemapConfig) -> Table {
    for name in config.identifier_columns() {
        let Some(idx) = table.column_index(name) else {
            continue;
        };
        let values: Vec<Cell> = table
            .column(idx)
            .map(|cell| Cell::Int(coerce_identifier(cell)))
            .collect();
        table.set_column(idx, values);
    }

    let id_idx = table.column_index(&config.id_column);
    let parent_idx = table.column_index(&config.parent_column);
    if let (Some(id_idx), Some(parent_idx)) = (id_idx, parent_idx) {
        if id_idx != parent_idx {
            let parents: Vec<Cell> = table
                .column(id_idx)
                .zip(table.column(parent_idx))
                .map(|(id, parent)| match (id, parent) {
                    (Cell::Int(id), Cell::Int(parent)) if id == parent && *id != 0 => {
                        Cell::Int(0)
                    }
                    (_, parent) => parent.clone(),
                })
                .collect();
            table.set_column(parent_idx, parents);
        }
    }
    table
}

pub fn coerce_identifier(cell: &Cell) -> i64 {
    match cell {
        Cell::Null => 0,
        Cell::Int(value) => *value,
        Cell::Text(text) => parse_integer(text.trim()),
    }
}

fn parse_integer(text: &str) -> i64 {
    if let Ok(value) = text.parse::<i64>() {
        return value;
    }
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= i64::MIN as f64 && value < i64::MAX as f64 => {
            value.trunc() as i64
        }
        _ => 0,
    }
}
