//! Export command handler

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use colored::*;

use crate::catalog::export::{ExportFormat, export_csv, export_to_file};
use crate::cli::ExportArgs;
use crate::services::catalog::CatalogService;

pub fn handle_export_command(service: &CatalogService, args: ExportArgs) -> Result<()> {
    // Exports must reflect the file as it is now, and must not silently
    // export an empty table when the catalog is unreadable
    let snapshot = service.load()?;

    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(args.format.default_file_name()));

    if output == Path::new("-") {
        if args.format != ExportFormat::Csv {
            bail!("Only CSV can be written to stdout");
        }
        return export_csv(&snapshot, std::io::stdout().lock());
    }

    export_to_file(&snapshot, args.format, &output)?;
    println!(
        "{} Exported {} items to {}",
        "✓".green().bold(),
        snapshot.len(),
        output.display().to_string().cyan()
    );
    Ok(())
}
