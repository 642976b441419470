//! Read a catalog snapshot from a loosely-structured workbook

use std::collections::HashSet;
use std::path::Path;

use calamine::{Reader, open_workbook_auto};

use crate::catalog::cell::{self, cell_text};
use crate::catalog::columns::{ColumnMap, ColumnRole};
use crate::catalog::sheet::{RawTable, select_sheet};
use crate::catalog::{CatalogError, CatalogRecord, CatalogSnapshot};

/// Load the catalog stored at `path`
///
/// A missing file is an empty catalog. A file that exists but cannot be
/// parsed is a `StorageRead` error, never a partial snapshot.
pub fn read_catalog_excel(path: &Path) -> Result<CatalogSnapshot, CatalogError> {
    if !path.exists() {
        log::info!("No catalog at {}, starting empty", path.display());
        return Ok(CatalogSnapshot::empty());
    }

    let tables = read_tables(path)?;
    let table = select_sheet(tables);
    log::debug!(
        "Using sheet '{}' ({} rows) from {}",
        table.name,
        table.rows.len(),
        path.display()
    );

    Ok(records_from_table(&table))
}

fn read_tables(path: &Path) -> Result<Vec<RawTable>, CatalogError> {
    let mut workbook = open_workbook_auto(path).map_err(|e| CatalogError::read(path, e))?;

    let mut tables = Vec::new();
    for sheet_name in workbook.sheet_names() {
        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| CatalogError::read(path, format!("sheet '{}': {}", sheet_name, e)))?;
        tables.push(RawTable::from_range(sheet_name, &range));
    }

    Ok(tables)
}

/// Build canonical records from the selected table
pub fn records_from_table(table: &RawTable) -> CatalogSnapshot {
    let columns = ColumnMap::resolve(&table.headers);
    log::debug!("Resolved columns: {:?}", columns);
    for (role, col) in [
        (ColumnRole::Sequence, columns.seq),
        (ColumnRole::Description, columns.descricao),
        (ColumnRole::Quantity, columns.quantidade),
    ] {
        if col.is_none() && !table.headers.is_empty() {
            log::info!("No {} column in sheet '{}', using defaults", role, table.name);
        }
    }

    let mut records = Vec::new();
    let mut seen = HashSet::new();
    let mut dropped = 0usize;

    for (idx, row) in table.non_empty_rows().enumerate() {
        let position = idx + 1;

        let seq = match columns.seq {
            Some(col) => match cell::sequence(row.get(col), position) {
                Ok(seq) => seq,
                Err(e) => {
                    log::debug!("Dropping row: {}", e);
                    dropped += 1;
                    continue;
                }
            },
            None => position as u64,
        };

        if !seen.insert(seq) {
            log::warn!("Dropping row {}: duplicate sequence {}", position, seq);
            dropped += 1;
            continue;
        }

        let descricao = columns
            .descricao
            .and_then(|col| row.get(col))
            .map(cell_text)
            .unwrap_or_default();

        let quantidade = cell::quantity(columns.quantidade.and_then(|col| row.get(col)));
        if quantidade.is_fallback() {
            log::debug!("Row {}: quantity coerced to {}", position, quantidade.value());
        }

        records.push(CatalogRecord {
            seq,
            descricao,
            quantidade: quantidade.value(),
        });
    }

    if dropped > 0 {
        log::warn!("Skipped {} rows without a usable sequence number", dropped);
    }

    CatalogSnapshot::from_records(records)
}
