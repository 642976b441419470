//! Explicit cache for the loaded catalog snapshot

use crate::catalog::{CatalogError, CatalogSnapshot};

/// Holds the last successfully loaded snapshot until invalidated
#[derive(Debug, Default)]
pub struct CatalogCache {
    snapshot: Option<CatalogSnapshot>,
}

impl CatalogCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached snapshot, loading it on a miss
    ///
    /// Load failures are not cached; the next call tries again.
    pub fn get_or_load<F>(&mut self, load: F) -> Result<&CatalogSnapshot, CatalogError>
    where
        F: FnOnce() -> Result<CatalogSnapshot, CatalogError>,
    {
        let snapshot = match self.snapshot.take() {
            Some(snapshot) => {
                log::debug!("Catalog cache hit");
                snapshot
            }
            None => load()?,
        };
        Ok(self.snapshot.insert(snapshot))
    }

    pub fn invalidate(&mut self) {
        if self.snapshot.take().is_some() {
            log::debug!("Catalog cache invalidated");
        }
    }

    pub fn is_cached(&self) -> bool {
        self.snapshot.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogRecord;
    use std::cell::Cell;
    use std::path::Path;

    fn one_record() -> CatalogSnapshot {
        CatalogSnapshot::from_records(vec![CatalogRecord::new(1, "Vaso", 1)])
    }

    #[test]
    fn test_loads_once_until_invalidated() {
        let mut cache = CatalogCache::new();
        let loads = Cell::new(0);
        let load = || {
            loads.set(loads.get() + 1);
            Ok(one_record())
        };

        assert_eq!(cache.get_or_load(load).unwrap().len(), 1);
        assert_eq!(cache.get_or_load(load).unwrap().len(), 1);
        assert_eq!(loads.get(), 1);

        cache.invalidate();
        assert!(!cache.is_cached());
        cache.get_or_load(load).unwrap();
        assert_eq!(loads.get(), 2);
    }

    #[test]
    fn test_failures_are_not_cached() {
        let mut cache = CatalogCache::new();

        let err = cache
            .get_or_load(|| Err(CatalogError::read(Path::new("x.xlsx"), "corrupt")))
            .unwrap_err();
        assert!(matches!(err, CatalogError::StorageRead { .. }));
        assert!(!cache.is_cached());

        assert_eq!(cache.get_or_load(|| Ok(one_record())).unwrap().len(), 1);
    }
}
