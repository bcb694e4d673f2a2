use crate::canon::{canon, canon_str};
use crate::config::RemapConfig;
use crate::error::{RemapError, Result};
use crate::mapping::CanonicalMapping;
use crate::types::{Cell, Table};
use crate::unmapped::UnmappedSet;

/// Parent value meaning "no parent". Never remapped.
pub const NO_PARENT: &str = "0";

/// Rewrite the identifier and parent columns of `table` through `mapping`.
///
/// Identifiers are resolved in two passes; an identifier without a mapping
/// entry keeps its canonical form and is reported in the returned set. The
/// set reflects the table's own identifiers, i.e. the first pass. Parents
/// without a mapping entry collapse to [`NO_PARENT`], as does any parent equal
/// to its row's identifier.
pub fn remap(
    mut table: Table,
    mapping: &CanonicalMapping,
    config: &RemapConfig,
) -> Result<(Table, UnmappedSet)> {
    let id_idx = table
        .column_index(&config.id_column)
        .ok_or_else(|| RemapError::missing_column(&config.id_column))?;

    let keys: Vec<Option<String>> = table.column(id_idx).map(canon).collect();
    let (first_pass, unmapped) = resolve_identifiers(keys, mapping);

    let keys = first_pass
        .into_iter()
        .map(|value| value.as_deref().map(canon_str))
        .collect();
    let (ids, _) = resolve_identifiers(keys, mapping);
    log::debug!(
        "Resolved {} identifiers, {} unmapped",
        ids.len(),
        unmapped.len()
    );

    if let Some(parent_idx) = table.column_index(&config.parent_column) {
        let parents: Vec<Cell> = table
            .column(parent_idx)
            .zip(&ids)
            .map(|(cell, id)| {
                let parent = resolve_parent(cell, mapping);
                if id.as_deref() == Some(parent.as_str()) {
                    Cell::text(NO_PARENT)
                } else {
                    Cell::Text(parent)
                }
            })
            .collect();
        table.set_column(parent_idx, parents);
    }

    table.set_column(id_idx, ids.into_iter().map(Cell::from));
    Ok((table, unmapped))
}

/// One lookup pass: hits take the mapped value, misses keep the key itself.
fn resolve_identifiers(
    keys: Vec<Option<String>>,
    mapping: &CanonicalMapping,
) -> (Vec<Option<String>>, UnmappedSet) {
    let mut unmapped = UnmappedSet::default();
    let resolved = keys
        .into_iter()
        .map(|key| {
            let key = key?;
            match mapping.get(&key) {
                Some(new) => Some(new.to_string()),
                None => {
                    unmapped.insert(&key);
                    Some(key)
                }
            }
        })
        .collect();
    (resolved, unmapped)
}

fn resolve_parent(cell: &Cell, mapping: &CanonicalMapping) -> String {
    let key = canon(cell).unwrap_or_else(|| NO_PARENT.to_string());
    if key == NO_PARENT {
        return key;
    }
    mapping
        .get(&key)
        .map_or_else(|| NO_PARENT.to_string(), str::to_string)
}
