//! Command-line interface definitions

pub mod commands;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::catalog::export::ExportFormat;
use crate::config::ConfigOverrides;

#[derive(Parser, Debug)]
#[command(name = "catalog-cli", version, about = "Browse and extend a spreadsheet item catalog")]
pub struct Cli {
    /// Config file to use instead of ~/.config/catalog-cli/config.toml
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Catalog spreadsheet (overrides config and CATALOG_PATH)
    #[arg(long, global = true, value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    /// Image directory (overrides config and CATALOG_IMAGES_DIR)
    #[arg(long, global = true, value_name = "DIR")]
    pub images: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn config_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            config_file: self.config.clone(),
            catalog_path: self.catalog.clone(),
            images_dir: self.images.clone(),
            jpeg_quality: match &self.command {
                Commands::Add(args) => args.quality,
                _ => None,
            },
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List catalog items, optionally filtered by description
    List(ListArgs),
    /// Add an item with its image
    Add(AddArgs),
    /// Export the catalog table to CSV or Excel
    Export(ExportArgs),
    /// Show the image file for a sequence number
    Image(ImageArgs),
    /// Show the effective catalog and image locations
    Paths,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only items whose description contains this text (case-insensitive)
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Print items as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Item description (prompted when omitted on a terminal)
    #[arg(short, long)]
    pub description: Option<String>,

    /// Quantity in stock (prompted when omitted on a terminal)
    #[arg(short, long)]
    pub quantity: Option<u64>,

    /// Image file (jpg, jpeg, png, webp; other formats are converted to jpg)
    #[arg(short, long, value_name = "FILE")]
    pub image: Option<PathBuf>,

    /// JPEG quality for the stored image (1-100)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: Option<u8>,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = ExportFormat::Csv)]
    pub format: ExportFormat,

    /// Output file ("-" writes CSV to stdout); defaults to catalogo.<ext>
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ImageArgs {
    /// Sequence number of the item
    pub seq: u64,
}
