//! Canonical catalog records and snapshots

use serde::Serialize;

/// Canonical column names, in the order they are written
pub mod columns {
    pub const SEQ: &str = "seq";
    pub const DESCRICAO: &str = "descricao";
    pub const QUANTIDADE: &str = "quantidade";

    pub const ALL: [&str; 3] = [SEQ, DESCRICAO, QUANTIDADE];
}

/// One catalog item after role resolution and type coercion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogRecord {
    pub seq: u64,
    pub descricao: String,
    pub quantidade: u64,
}

impl CatalogRecord {
    pub fn new(seq: u64, descricao: impl Into<String>, quantidade: u64) -> Self {
        Self {
            seq,
            descricao: descricao.into(),
            quantidade,
        }
    }
}

/// Records sorted ascending by seq
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CatalogSnapshot {
    records: Vec<CatalogRecord>,
}

impl CatalogSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a snapshot from records in any order
    pub fn from_records(mut records: Vec<CatalogRecord>) -> Self {
        records.sort_by_key(|r| r.seq);
        Self { records }
    }

    pub fn records(&self) -> &[CatalogRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, seq: u64) -> Option<&CatalogRecord> {
        self.records
            .binary_search_by_key(&seq, |r| r.seq)
            .ok()
            .map(|idx| &self.records[idx])
    }

    /// Next free sequence number: max seq + 1, or 1 for an empty catalog
    ///
    /// `None` once the largest seq is `u64::MAX`.
    pub fn next_seq(&self) -> Option<u64> {
        match self.records.last() {
            Some(last) => last.seq.checked_add(1),
            None => Some(1),
        }
    }

    /// Insert a record, keeping the seq order
    pub fn push(&mut self, record: CatalogRecord) {
        let idx = self.records.partition_point(|r| r.seq <= record.seq);
        self.records.insert(idx, record);
    }

    /// (seq, descricao, quantidade) tuples for exporters
    pub fn rows(&self) -> impl Iterator<Item = (u64, &str, u64)> + '_ {
        self.records
            .iter()
            .map(|r| (r.seq, r.descricao.as_str(), r.quantidade))
    }

    /// Keep records matching the predicate, preserving order
    pub fn retain_view<F>(&self, mut keep: F) -> CatalogSnapshot
    where
        F: FnMut(&CatalogRecord) -> bool,
    {
        CatalogSnapshot {
            records: self.records.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(seqs: &[u64]) -> CatalogSnapshot {
        CatalogSnapshot::from_records(
            seqs.iter()
                .map(|s| CatalogRecord::new(*s, format!("item {}", s), 1))
                .collect(),
        )
    }

    #[test]
    fn test_next_seq_empty_is_one() {
        assert_eq!(CatalogSnapshot::empty().next_seq(), Some(1));
    }

    #[test]
    fn test_next_seq_exceeds_every_seq() {
        let snap = snapshot(&[7, 2, 40, 3]);
        let next = snap.next_seq().unwrap();
        assert_eq!(next, 41);
        assert!(snap.records().iter().all(|r| r.seq < next));
    }

    #[test]
    fn test_next_seq_exhausted_at_max() {
        let snap = snapshot(&[3, u64::MAX]);
        assert_eq!(snap.next_seq(), None);
        assert_eq!(snapshot(&[u64::MAX - 1]).next_seq(), Some(u64::MAX));
    }

    #[test]
    fn test_from_records_sorts_by_seq() {
        let snap = snapshot(&[3, 1, 2]);
        let seqs: Vec<u64> = snap.records().iter().map(|r| r.seq).collect();
        assert_eq!(seqs, vec![1, 2, 3]);
    }

    #[test]
    fn test_push_keeps_order() {
        let mut snap = snapshot(&[1, 5]);
        snap.push(CatalogRecord::new(3, "middle", 0));
        snap.push(CatalogRecord::new(9, "last", 0));
        let seqs: Vec<u64> = snap.records().iter().map(|r| r.seq).collect();
        assert_eq!(seqs, vec![1, 3, 5, 9]);
    }

    #[test]
    fn test_rows_exposes_canonical_tuples() {
        let snap = CatalogSnapshot::from_records(vec![
            CatalogRecord::new(2, "Copo", 4),
            CatalogRecord::new(1, "Vaso", 0),
        ]);
        let rows: Vec<_> = snap.rows().collect();
        assert_eq!(rows, vec![(1, "Vaso", 0), (2, "Copo", 4)]);
    }

    #[test]
    fn test_get_by_seq() {
        let snap = snapshot(&[1, 4, 9]);
        assert_eq!(snap.get(4).map(|r| r.seq), Some(4));
        assert!(snap.get(5).is_none());
    }

    #[test]
    fn test_serializes_as_array() {
        let snap = CatalogSnapshot::from_records(vec![CatalogRecord::new(1, "Vaso", 3)]);
        let json = serde_json::to_string(&snap).unwrap();
        assert_eq!(json, r#"[{"seq":1,"descricao":"Vaso","quantidade":3}]"#);
    }
}
