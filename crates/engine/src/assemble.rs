use crate::error::{RemapError, Result};
use crate::types::Table;
use csv::WriterBuilder;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

pub type JsonRow = Map<String, Value>;

/// A finished table in both output forms
#[derive(Debug, Clone)]
pub struct Assembled {
    /// Comma-separated text with a header row and no index column
    pub csv: Vec<u8>,
    /// One object per row, keys in column order, missing cells as `null`
    pub rows: Vec<JsonRow>,
}

pub fn assemble(table: &Table) -> Result<Assembled> {
    Ok(Assembled {
        csv: to_csv_bytes(table)?,
        rows: to_json_rows(table),
    })
}

pub fn to_csv_bytes(table: &Table) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new().delimiter(b',').from_writer(Vec::new());
    writer.write_record(table.columns())?;
    for row in table.rows() {
        writer.write_record(row.iter().map(|cell| cell.to_field().into_owned()))?;
    }
    writer
        .into_inner()
        .map_err(|err| RemapError::Io(err.into_error()))
}

pub fn to_json_rows(table: &Table) -> Vec<JsonRow> {
    table
        .rows()
        .iter()
        .map(|row| {
            table
                .columns()
                .iter()
                .zip(row)
                .map(|(column, cell)| (column.clone(), cell.to_json()))
                .collect()
        })
        .collect()
}

/// Overwrite `path` with the assembled CSV.
pub fn write_output(path: &Path, csv: &[u8]) -> Result<()> {
    fs::write(path, csv)?;
    log::info!("Wrote {} bytes to {}", csv.len(), path.display());
    Ok(())
}
