use crate::assemble::{assemble, write_output, JsonRow};
use crate::coerce::coerce;
use crate::config::RemapConfig;
use crate::error::{RemapError, Result};
use crate::mapping::CanonicalMapping;
use crate::reader::read_table_path;
use crate::remapper::remap;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Input and output locations of one remap run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemapJob {
    /// JSON object of old identifier to new identifier
    pub mapping_path: PathBuf,
    /// CSV table to correct
    pub table_path: PathBuf,
    /// Corrected CSV, overwritten on success
    pub output_path: PathBuf,
    /// Unmapped identifiers, one per line; only written when there are any
    pub unmapped_path: PathBuf,
}

/// Result of a successful run
#[derive(Debug, Clone, Serialize)]
pub struct RemapOutcome {
    pub rows: Vec<JsonRow>,
    pub unmapped: Vec<String>,
    pub unmapped_written: bool,
    pub output_path: PathBuf,
}

impl RemapJob {
    /// Run the job start to finish. The identifier column is checked before
    /// anything is written; a later failure may leave the output file already
    /// replaced.
    pub fn run(&self, config: &RemapConfig) -> Result<RemapOutcome> {
        self.ensure_inputs()?;
        log::info!(
            "Remapping {} with {}",
            self.table_path.display(),
            self.mapping_path.display()
        );

        let mapping = CanonicalMapping::from_path(&self.mapping_path)?;
        let table = read_table_path(&self.table_path, config)?;
        let (table, unmapped) = remap(table, &mapping, config)?;
        let table = coerce(table, config);
        let assembled = assemble(&table)?;

        write_output(&self.output_path, &assembled.csv)?;
        let unmapped_written = unmapped.write_report(&self.unmapped_path)?;
        if !unmapped.is_empty() {
            log::warn!("{} identifiers had no mapping entry", unmapped.len());
        }

        Ok(RemapOutcome {
            rows: assembled.rows,
            unmapped: unmapped.into_vec(),
            unmapped_written,
            output_path: self.output_path.clone(),
        })
    }

    /// Fail with every missing input listed, mapping first.
    fn ensure_inputs(&self) -> Result<()> {
        let missing: Vec<PathBuf> = [&self.mapping_path, &self.table_path]
            .into_iter()
            .filter(|path| !path.exists())
            .cloned()
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(RemapError::not_found(missing))
        }
    }
}
