//! Image lookup and path commands

use std::path::Path;

use anyhow::Result;
use colored::*;

use crate::cli::ImageArgs;
use crate::config::CatalogConfig;
use crate::services::catalog::CatalogService;

pub fn handle_image_command(service: &mut CatalogService, args: ImageArgs) -> Result<()> {
    let outcome = service.snapshot();
    match outcome.snapshot.get(args.seq) {
        Some(record) => log::info!("Item {}: {}", record.seq, record.descricao),
        None if outcome.warning.is_none() => {
            eprintln!("{} item {} is not in the catalog", "note:".dimmed(), args.seq);
        }
        None => {}
    }

    match service.image_for(args.seq) {
        Some(path) => println!("{}", path.display()),
        None => {
            eprintln!(
                "{} no image for item {} in {}",
                "warning:".yellow().bold(),
                args.seq,
                service.images_dir().display()
            );
        }
    }
    Ok(())
}

pub fn handle_paths_command(config: &CatalogConfig, config_file: Option<&Path>) -> Result<()> {
    let config_file = config_file
        .map(Path::to_path_buf)
        .or_else(CatalogConfig::default_config_file)
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(no config directory)".to_string());

    println!("{:<14}{}", "catalog:".bold(), config.catalog_path.display());
    println!("{:<14}{}", "images:".bold(), config.images_dir.display());
    println!("{:<14}{}", "jpeg quality:".bold(), config.jpeg_quality);
    println!("{:<14}{}", "config file:".bold(), config_file.dimmed());
    Ok(())
}
