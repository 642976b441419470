//! Add command handler

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use colored::*;
use dialoguer::Input;
use is_terminal::IsTerminal;

use crate::cli::AddArgs;
use crate::images::ImageUpload;
use crate::services::catalog::CatalogService;

pub fn handle_add_command(service: &mut CatalogService, args: AddArgs) -> Result<()> {
    let interactive = std::io::stdin().is_terminal();

    let description = match args.description {
        Some(description) => description,
        None if interactive => Input::<String>::new()
            .with_prompt("Description")
            .allow_empty(true)
            .interact_text()?,
        None => bail!("--description is required when not running interactively"),
    };

    let quantity = match args.quantity {
        Some(quantity) => quantity,
        None if interactive => Input::<u64>::new()
            .with_prompt("Quantity")
            .default(0)
            .interact_text()?,
        None => 0,
    };

    let image_path = match args.image {
        Some(path) => Some(path),
        None if interactive => {
            let entered: String = Input::new()
                .with_prompt("Image file (jpg/png/webp)")
                .allow_empty(true)
                .interact_text()?;
            Some(entered.trim().to_string())
                .filter(|p| !p.is_empty())
                .map(PathBuf::from)
        }
        None => None,
    };

    let upload = match &image_path {
        Some(path) => Some(
            ImageUpload::from_path(path)
                .with_context(|| format!("Failed to read image file: {}", path.display()))?,
        ),
        None => None,
    };

    let seq = match service.add(&description, quantity, upload.as_ref()) {
        Ok(seq) => seq,
        Err(e) if e.is_recoverable() => bail!("{} (nothing was saved)", e),
        Err(e) => return Err(e).context("Failed to add item"),
    };

    let image = service
        .image_for(seq)
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_default();
    println!(
        "{} Item {} added (image: {})",
        "✓".green().bold(),
        seq.to_string().cyan(),
        image
    );

    Ok(())
}
