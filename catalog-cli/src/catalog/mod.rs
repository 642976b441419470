//! Catalog reconciliation: loading loosely-structured spreadsheets into
//! canonical records and writing them back in canonical form.

pub mod cell;
pub mod columns;
pub mod error;
pub mod excel;
pub mod export;
pub mod sheet;
pub mod types;

pub use error::CatalogError;
pub use excel::{read_catalog_excel, write_catalog_excel};
pub use types::{CatalogRecord, CatalogSnapshot};
