//! Raw sheet tables and selection of the sheet that holds the data

use calamine::{Data, Range};

use super::cell::{header_text, is_blank};

/// A sheet as read from the workbook: first row split off as the header
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Data>>,
}

impl RawTable {
    pub fn from_range(name: impl Into<String>, range: &Range<Data>) -> Self {
        let mut rows = range.rows();

        let headers = rows
            .next()
            .map(|header| header.iter().map(header_text).collect())
            .unwrap_or_default();

        Self {
            name: name.into(),
            headers,
            rows: rows.map(|r| r.to_vec()).collect(),
        }
    }

    /// Data rows where at least one cell holds something
    pub fn non_empty_rows(&self) -> impl Iterator<Item = &Vec<Data>> {
        self.rows.iter().filter(|row| !row.iter().all(is_blank))
    }
}

/// Pick the table with the most non-empty data rows
///
/// Ties go to the first table in workbook order. No tables yields an empty one.
pub fn select_sheet(tables: Vec<RawTable>) -> RawTable {
    let mut best: Option<(usize, RawTable)> = None;

    for table in tables {
        let count = table.non_empty_rows().count();
        log::debug!("Sheet '{}' has {} non-empty rows", table.name, count);

        match &best {
            Some((best_count, _)) if *best_count >= count => {}
            _ => best = Some((count, table)),
        }
    }

    best.map(|(_, table)| table).unwrap_or_default()
}
