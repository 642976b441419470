//! Column role resolution for loosely-named spreadsheet headers

/// Role a source column plays in the canonical record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    Sequence,
    Description,
    Quantity,
}

impl ColumnRole {
    /// Accepted header names, highest priority first (lower-case)
    pub fn candidates(&self) -> &'static [&'static str] {
        match self {
            ColumnRole::Sequence => &["seq", "sequencia", "sequência", "ordem", "id"],
            ColumnRole::Description => &[
                "descrição",
                "descricao",
                "descr",
                "descri",
                "descrição do item",
                "item",
                "produto",
                "nome",
            ],
            ColumnRole::Quantity => &["quantidade", "qtde", "qtd", "qtd.", "quant", "quant."],
        }
    }
}

impl std::fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnRole::Sequence => write!(f, "sequence"),
            ColumnRole::Description => write!(f, "description"),
            ColumnRole::Quantity => write!(f, "quantity"),
        }
    }
}

/// Find the column for a candidate list
///
/// An exact (trimmed, lower-cased) name match wins; otherwise the first
/// column whose name starts with any candidate. `None` when nothing fits.
pub fn resolve_column<S: AsRef<str>>(headers: &[S], candidates: &[&str]) -> Option<usize> {
    let normalized: Vec<String> = headers
        .iter()
        .map(|h| h.as_ref().trim().to_lowercase())
        .collect();

    normalized
        .iter()
        .position(|h| candidates.contains(&h.as_str()))
        .or_else(|| {
            normalized
                .iter()
                .position(|h| candidates.iter().any(|c| h.starts_with(c)))
        })
}

/// Column indices for each role in a raw table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnMap {
    pub seq: Option<usize>,
    pub descricao: Option<usize>,
    pub quantidade: Option<usize>,
}

impl ColumnMap {
    pub fn resolve<S: AsRef<str>>(headers: &[S]) -> Self {
        Self {
            seq: resolve_column(headers, ColumnRole::Sequence.candidates()),
            descricao: resolve_column(headers, ColumnRole::Description.candidates()),
            quantidade: resolve_column(headers, ColumnRole::Quantity.candidates()),
        }
    }
}
