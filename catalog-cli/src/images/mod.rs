//! Catalog images: resolving files by sequence number and storing uploads

pub mod ingest;
pub mod resolver;

pub use ingest::{ImageStore, ImageUpload, StagedImage};
pub use resolver::{ImageIndex, ImageResolver};

/// Image file extensions the catalog reads and writes (lower-case, no dot)
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];
