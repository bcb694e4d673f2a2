use crate::config::RemapConfig;
use crate::error::Result;
use crate::types::{Cell, Table};
use csv::ReaderBuilder;
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Read a comma-separated table with a header row. Every field is kept as
/// text so large integer identifiers survive unchanged; NA tokens become
/// missing cells. Repeated header names get a `.N` suffix so every column
/// keeps its own key.
pub fn read_table<R: Read>(input: R, config: &RemapConfig) -> Result<Table> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);

    let columns = dedupe_columns(
        reader
            .headers()?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').to_string()),
    );

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row = record
            .iter()
            .map(|field| {
                if config.is_missing(field) {
                    Cell::Null
                } else {
                    Cell::text(field)
                }
            })
            .collect();
        rows.push(row);
    }

    Table::new(columns, rows)
}

fn dedupe_columns(headers: impl Iterator<Item = String>) -> Vec<String> {
    let headers: Vec<String> = headers.collect();
    let mut taken: HashSet<String> = headers.iter().cloned().collect();
    let mut seen = HashSet::new();
    let mut columns = Vec::with_capacity(headers.len());
    for header in headers {
        if seen.insert(header.clone()) {
            columns.push(header);
            continue;
        }
        let mut suffix = 1;
        let renamed = loop {
            let candidate = format!("{header}.{suffix}");
            if !taken.contains(&candidate) {
                break candidate;
            }
            suffix += 1;
        };
        log::debug!("Renamed duplicate column {header:?} to {renamed:?}");
        taken.insert(renamed.clone());
        columns.push(renamed);
    }
    columns
}

pub fn read_table_path(path: &Path, config: &RemapConfig) -> Result<Table> {
    let table = read_table(File::open(path)?, config)?;
    log::debug!(
        "Read {} rows x {} columns from {}",
        table.len(),
        table.columns().len(),
        path.display()
    );
    Ok(table)
}
