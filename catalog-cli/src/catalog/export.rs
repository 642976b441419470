//! CSV and XLSX export of the canonical catalog table

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use csv::Writer;

use super::excel::catalog_xlsx_bytes;
use super::types::columns;
use super::CatalogSnapshot;

/// Export format selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Csv,
    Xlsx,
}

impl ExportFormat {
    pub fn default_file_name(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "catalogo.csv",
            ExportFormat::Xlsx => "catalogo.xlsx",
        }
    }
}

/// Write the catalog as UTF-8 CSV with a seq,descricao,quantidade header
pub fn export_csv<W: Write>(snapshot: &CatalogSnapshot, out: W) -> Result<()> {
    let mut wtr = Writer::from_writer(out);

    wtr.write_record(columns::ALL)
        .context("Failed to write CSV header")?;

    for (seq, descricao, quantidade) in snapshot.rows() {
        wtr.write_record([seq.to_string().as_str(), descricao, quantidade.to_string().as_str()])
            .with_context(|| format!("Failed to write record {}", seq))?;
    }

    wtr.flush().context("Failed to flush CSV writer")?;
    Ok(())
}

/// Canonical workbook bytes, as written to the catalog file
pub fn export_xlsx_bytes(snapshot: &CatalogSnapshot) -> Result<Vec<u8>> {
    catalog_xlsx_bytes(snapshot).context("Failed to build Excel workbook")
}

/// Export the catalog to a file in the given format
pub fn export_to_file(snapshot: &CatalogSnapshot, format: ExportFormat, path: &Path) -> Result<()> {
    match format {
        ExportFormat::Csv => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;
            export_csv(snapshot, file)?;
        }
        ExportFormat::Xlsx => {
            let bytes = export_xlsx_bytes(snapshot)?;
            std::fs::write(path, bytes)
                .with_context(|| format!("Failed to save Excel file: {}", path.display()))?;
        }
    }

    log::info!("Exported {} records to {}", snapshot.len(), path.display());
    Ok(())
}
