mod catalog;
mod cli;
mod config;
mod images;
mod services;

use anyhow::Result;
use clap::Parser;

use cli::commands::{
    handle_add_command, handle_export_command, handle_image_command, handle_list_command,
    handle_paths_command,
};
use cli::{Cli, Commands};
use config::CatalogConfig;
use services::catalog::CatalogService;

fn init_logging(verbose: u8) {
    let mut builder = match verbose {
        0 => env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")),
        1 => {
            let mut b = env_logger::Builder::new();
            b.filter_level(log::LevelFilter::Info);
            b
        }
        _ => {
            let mut b = env_logger::Builder::new();
            b.filter_level(log::LevelFilter::Debug);
            b
        }
    };
    builder.format_timestamp(None).init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.no_color {
        colored::control::set_override(false);
    }

    let config = CatalogConfig::load(&cli.config_overrides())?;
    config.ensure_folders()?;
    log::info!(
        "Catalog {} with images in {}",
        config.catalog_path.display(),
        config.images_dir.display()
    );

    let mut service = CatalogService::from_config(&config);

    match cli.command {
        Commands::List(args) => handle_list_command(&mut service, args),
        Commands::Add(args) => handle_add_command(&mut service, args),
        Commands::Export(args) => handle_export_command(&service, args),
        Commands::Image(args) => handle_image_command(&mut service, args),
        Commands::Paths => handle_paths_command(&config, cli.config.as_deref()),
    }
}
