//! Excel I/O for the catalog workbook

mod reader;
mod writer;

pub use reader::read_catalog_excel;
pub use writer::{catalog_xlsx_bytes, write_catalog_excel};
