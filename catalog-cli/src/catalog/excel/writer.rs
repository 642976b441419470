//! Write a catalog snapshot to the canonical workbook layout

use std::path::{Path, PathBuf};

use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};

use crate::catalog::cell::MAX_EXACT_FLOAT_INTEGER;
use crate::catalog::types::columns;
use crate::catalog::{CatalogError, CatalogSnapshot};

/// Sheet name of the canonical workbook
pub const SHEET_NAME: &str = "catalogo";

/// Column indices for the catalog sheet
mod cols {
    pub const SEQ: u16 = 0;
    pub const DESCRICAO: u16 = 1;
    pub const QUANTIDADE: u16 = 2;
}

/// Serialize a snapshot to xlsx bytes: one sheet, seq/descricao/quantidade
pub fn catalog_xlsx_bytes(snapshot: &CatalogSnapshot) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    worksheet.write_string(0, cols::SEQ, columns::SEQ)?;
    worksheet.write_string(0, cols::DESCRICAO, columns::DESCRICAO)?;
    worksheet.write_string(0, cols::QUANTIDADE, columns::QUANTIDADE)?;

    // Snapshots are kept sorted by seq, so row order is already canonical
    for (idx, (seq, descricao, quantidade)) in snapshot.rows().enumerate() {
        let row = (idx + 1) as u32;
        write_whole(worksheet, row, cols::SEQ, seq)?;
        if !descricao.is_empty() {
            worksheet.write_string(row, cols::DESCRICAO, descricao)?;
        }
        write_whole(worksheet, row, cols::QUANTIDADE, quantidade)?;
    }

    workbook.save_to_buffer()
}

/// Numbers above 2^53 are stored as text so they read back unchanged
fn write_whole(worksheet: &mut Worksheet, row: u32, col: u16, value: u64) -> Result<(), XlsxError> {
    if value <= MAX_EXACT_FLOAT_INTEGER {
        worksheet.write_number(row, col, value as f64)?;
    } else {
        worksheet.write_string(row, col, value.to_string())?;
    }
    Ok(())
}

/// Overwrite the catalog file at `path` with `snapshot`
///
/// The workbook goes to a sibling temporary file first and is renamed into
/// place, so a failed write leaves the previous file untouched.
pub fn write_catalog_excel(snapshot: &CatalogSnapshot, path: &Path) -> Result<(), CatalogError> {
    let bytes = catalog_xlsx_bytes(snapshot).map_err(|e| CatalogError::write(path, e))?;

    let tmp_path = temp_sibling(path);
    if let Err(e) = std::fs::write(&tmp_path, &bytes) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(CatalogError::write(path, e));
    }

    if let Err(e) = std::fs::rename(&tmp_path, path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(CatalogError::write(path, e));
    }

    log::info!("Saved {} records to {}", snapshot.len(), path.display());
    Ok(())
}

fn temp_sibling(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "catalog".to_string());
    path.with_file_name(format!(".{}.{}.tmp", file_name, uuid::Uuid::new_v4()))
}
