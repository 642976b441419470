//! Subcommand handlers

pub mod add;
pub mod export;
pub mod image;
pub mod list;

pub use add::handle_add_command;
pub use export::handle_export_command;
pub use image::{handle_image_command, handle_paths_command};
pub use list::handle_list_command;
