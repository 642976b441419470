// Catalog service: add-item and listing operations
//
// Combines the spreadsheet loader/writer with the image resolver and image
// store. Owns the snapshot cache so callers never hold module-level state.

pub mod cache;

pub use cache::CatalogCache;

use std::path::{Path, PathBuf};

use crate::catalog::{
    CatalogError, CatalogRecord, CatalogSnapshot, read_catalog_excel, write_catalog_excel,
};
use crate::config::CatalogConfig;
use crate::images::{ImageIndex, ImageResolver, ImageStore, ImageUpload};

/// Result of loading for display: always a snapshot, plus the error if the
/// catalog file could not be read
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub snapshot: CatalogSnapshot,
    pub warning: Option<CatalogError>,
}

/// Orchestrates catalog reads and writes against one catalog file and one
/// image directory
#[derive(Debug)]
pub struct CatalogService {
    catalog_path: PathBuf,
    resolver: ImageResolver,
    store: ImageStore,
    cache: CatalogCache,
}

impl CatalogService {
    pub fn new(catalog_path: impl Into<PathBuf>, images_dir: impl Into<PathBuf>, jpeg_quality: u8) -> Self {
        let images_dir = images_dir.into();
        Self {
            catalog_path: catalog_path.into(),
            resolver: ImageResolver::new(images_dir.clone()),
            store: ImageStore::new(images_dir, jpeg_quality),
            cache: CatalogCache::new(),
        }
    }

    pub fn from_config(config: &CatalogConfig) -> Self {
        Self::new(&config.catalog_path, &config.images_dir, config.jpeg_quality)
    }

    pub fn catalog_path(&self) -> &Path {
        &self.catalog_path
    }

    pub fn images_dir(&self) -> &Path {
        self.resolver.dir()
    }

    /// Read the catalog file, bypassing the cache
    pub fn load(&self) -> Result<CatalogSnapshot, CatalogError> {
        read_catalog_excel(&self.catalog_path)
    }

    /// Cached snapshot for display
    ///
    /// A catalog that cannot be read degrades to an empty snapshot with the
    /// error attached as a warning.
    pub fn snapshot(&mut self) -> LoadOutcome {
        let path = self.catalog_path.clone();
        if !self.cache.is_cached() {
            log::debug!("Loading catalog from {}", path.display());
        }
        match self.cache.get_or_load(|| read_catalog_excel(&path)) {
            Ok(snapshot) => LoadOutcome {
                snapshot: snapshot.clone(),
                warning: None,
            },
            Err(e) => {
                log::warn!("{}", e);
                LoadOutcome {
                    snapshot: CatalogSnapshot::empty(),
                    warning: Some(e),
                }
            }
        }
    }

    /// Drop the cached snapshot so the next `snapshot` call re-reads the file
    pub fn invalidate(&mut self) {
        self.cache.invalidate();
    }

    /// Image file for a record, if one exists
    pub fn image_for(&self, seq: u64) -> Option<PathBuf> {
        self.resolver.resolve(seq)
    }

    /// One listing of the image directory, for resolving many records
    pub fn image_index(&self) -> ImageIndex {
        self.resolver.index()
    }

    /// Add an item and its image; returns the assigned sequence number
    ///
    /// The image is staged under a hidden name, the catalog is saved, and only
    /// then is the image moved to `image{seq}.{ext}`. If the catalog save
    /// fails the staged image is removed, so no orphan file is left.
    pub fn add(
        &mut self,
        descricao: &str,
        quantidade: u64,
        upload: Option<&ImageUpload>,
    ) -> Result<u64, CatalogError> {
        let descricao = descricao.trim();
        if descricao.is_empty() {
            return Err(CatalogError::validation("description required"));
        }
        let upload = match upload {
            Some(upload) if !upload.bytes.is_empty() => upload,
            _ => return Err(CatalogError::validation("image required")),
        };

        let mut snapshot = self.load()?;
        let seq = snapshot.next_seq().ok_or(CatalogError::SequenceExhausted)?;

        let staged = self.store.stage(upload, seq)?;

        snapshot.push(CatalogRecord::new(seq, descricao, quantidade));
        if let Err(e) = write_catalog_excel(&snapshot, &self.catalog_path) {
            log::error!("Catalog save failed, discarding staged image for seq {}", seq);
            staged.discard();
            return Err(e);
        }
        self.cache.invalidate();

        let image_path = staged.commit()?;
        log::info!(
            "Added item {} ({} x{}) with image {}",
            seq,
            descricao,
            quantidade,
            image_path.display()
        );

        Ok(seq)
    }
}

/// Records whose description contains `query`, ignoring case
///
/// A blank query returns the snapshot unchanged. Order is preserved.
pub fn filter(snapshot: &CatalogSnapshot, query: &str) -> CatalogSnapshot {
    if query.trim().is_empty() {
        return snapshot.clone();
    }

    let needle = query.to_lowercase();
    snapshot.retain_view(|record| record.descricao.to_lowercase().contains(&needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn jpeg_upload(name: &str) -> ImageUpload {
        let img = RgbImage::from_pixel(4, 4, Rgb([220, 120, 160]));
        let mut buffer = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut buffer, ImageFormat::Jpeg)
            .unwrap();
        ImageUpload::new(name, buffer.into_inner())
    }

    fn service(dir: &Path) -> CatalogService {
        let images = dir.join("images");
        std::fs::create_dir_all(&images).unwrap();
        CatalogService::new(dir.join("catalogo.xlsx"), images, 90)
    }

    fn file_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    fn sample() -> CatalogSnapshot {
        CatalogSnapshot::from_records(vec![
            CatalogRecord::new(1, "Vaso rosa", 3),
            CatalogRecord::new(2, "Prato azul", 1),
            CatalogRecord::new(3, "Rosa de papel", 8),
        ])
    }

    #[test]
    fn test_filter_blank_returns_everything() {
        let snap = sample();
        assert_eq!(filter(&snap, ""), snap);
        assert_eq!(filter(&snap, "   "), snap);
    }

    #[test]
    fn test_filter_is_case_insensitive_and_ordered() {
        let seqs: Vec<u64> = filter(&sample(), "ROSA")
            .records()
            .iter()
            .map(|r| r.seq)
            .collect();
        assert_eq!(seqs, vec![1, 3]);
    }

    #[test]
    fn test_filter_no_match() {
        assert!(filter(&sample(), "verde").is_empty());
    }

    #[test]
    fn test_add_to_empty_catalog_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let mut service = service(dir.path());

        let seq = service.add("Vaso rosa", 3, Some(&jpeg_upload("foto.jpg"))).unwrap();
        assert_eq!(seq, 1);

        let loaded = service.load().unwrap();
        assert_eq!(loaded.records(), &[CatalogRecord::new(1, "Vaso rosa", 3)]);
        assert!(dir.path().join("images").join("image1.jpg").exists());
        assert_eq!(
            service.image_for(1),
            Some(dir.path().join("images").join("image1.jpg"))
        );

        assert_eq!(filter(&loaded, "vaso").len(), 1);
        assert!(filter(&loaded, "azul").is_empty());
    }

    #[test]
    fn test_add_assigns_next_seq_after_existing() {
        let dir = tempfile::tempdir().unwrap();
        let mut service = service(dir.path());
        write_catalog_excel(
            &CatalogSnapshot::from_records(vec![
                CatalogRecord::new(4, "Copo", 2),
                CatalogRecord::new(9, "Jarra", 1),
            ]),
            service.catalog_path(),
        )
        .unwrap();

        let seq = service
            .add("  Taça  ", 5, Some(&jpeg_upload("taca.png")))
            .unwrap();
        assert_eq!(seq, 10);

        let loaded = service.load().unwrap();
        assert_eq!(loaded.len(), 3);
        assert_eq!(loaded.get(10), Some(&CatalogRecord::new(10, "Taça", 5)));
        assert!(dir.path().join("images").join("image10.png").exists());
    }

    #[test]
    fn test_add_after_max_seq_fails_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let mut service = service(dir.path());
        let full = CatalogSnapshot::from_records(vec![CatalogRecord::new(u64::MAX, "Último", 1)]);
        write_catalog_excel(&full, service.catalog_path()).unwrap();

        let err = service
            .add("Vaso", 1, Some(&jpeg_upload("a.jpg")))
            .unwrap_err();
        assert_eq!(err, CatalogError::SequenceExhausted);
        assert_eq!(service.load().unwrap(), full);
        assert!(file_names(&dir.path().join("images")).is_empty());
    }

    #[test]
    fn test_add_with_empty_description_changes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut service = service(dir.path());

        let err = service.add("   ", 1, Some(&jpeg_upload("a.jpg"))).unwrap_err();
        assert_eq!(err, CatalogError::Validation("description required".to_string()));
        assert!(!service.catalog_path().exists());
        assert!(file_names(&dir.path().join("images")).is_empty());
    }

    #[test]
    fn test_add_without_image_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut service = service(dir.path());

        let err = service.add("Vaso", 1, None).unwrap_err();
        assert_eq!(err, CatalogError::Validation("image required".to_string()));

        let empty = ImageUpload::new("a.jpg", Vec::new());
        let err = service.add("Vaso", 1, Some(&empty)).unwrap_err();
        assert_eq!(err, CatalogError::Validation("image required".to_string()));
        assert!(!service.catalog_path().exists());
    }

    #[test]
    fn test_add_with_bad_image_changes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut service = service(dir.path());

        let bogus = ImageUpload::new("a.jpg", b"GIF-ish garbage".to_vec());
        let err = service.add("Vaso", 1, Some(&bogus)).unwrap_err();
        assert!(matches!(err, CatalogError::ImageDecode(_)));
        assert!(!service.catalog_path().exists());
        assert!(file_names(&dir.path().join("images")).is_empty());
    }

    #[test]
    fn test_failed_catalog_save_leaves_no_orphan_image() {
        let dir = tempfile::tempdir().unwrap();
        let images = dir.path().join("images");
        std::fs::create_dir_all(&images).unwrap();
        // Parent directory of the catalog does not exist, so the save fails
        let mut service = CatalogService::new(dir.path().join("missing").join("c.xlsx"), &images, 90);

        let err = service.add("Vaso", 1, Some(&jpeg_upload("a.jpg"))).unwrap_err();
        assert!(matches!(err, CatalogError::StorageWrite { .. }));
        assert!(file_names(&images).is_empty());
    }

    #[test]
    fn test_snapshot_is_cached_until_add() {
        let dir = tempfile::tempdir().unwrap();
        let mut service = service(dir.path());

        assert!(service.snapshot().snapshot.is_empty());

        // Written behind the service's back: the cache still serves the old view
        write_catalog_excel(&sample(), service.catalog_path()).unwrap();
        assert!(service.snapshot().snapshot.is_empty());

        service.invalidate();
        assert_eq!(service.snapshot().snapshot.len(), 3);

        service.add("Jarra", 2, Some(&jpeg_upload("j.jpg"))).unwrap();
        assert_eq!(service.snapshot().snapshot.len(), 4);
    }

    #[test]
    fn test_unreadable_catalog_degrades_to_empty_with_warning() {
        let dir = tempfile::tempdir().unwrap();
        let mut service = service(dir.path());
        std::fs::write(service.catalog_path(), b"garbage").unwrap();

        let outcome = service.snapshot();
        assert!(outcome.snapshot.is_empty());
        assert!(matches!(outcome.warning, Some(CatalogError::StorageRead { .. })));
    }
}
