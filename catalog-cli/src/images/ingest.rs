//! Decode uploaded images and store them under the canonical name

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat};

use super::ALLOWED_EXTENSIONS;
use super::resolver::canonical_stem;
use crate::catalog::CatalogError;

/// Extension used when the upload's name carries no allowed one
pub const DEFAULT_EXTENSION: &str = "jpg";

/// An uploaded image: original file name plus raw bytes
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Read an upload from a local file
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(file_name, bytes))
    }

    /// Lower-case output extension: the upload's own if allowed, else "jpg"
    pub fn target_extension(&self) -> &'static str {
        let ext = Path::new(&self.file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        ALLOWED_EXTENSIONS
            .iter()
            .find(|allowed| ext.as_deref() == Some(**allowed))
            .copied()
            .unwrap_or(DEFAULT_EXTENSION)
    }
}

/// Writes catalog images into the image directory
#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
    jpeg_quality: u8,
}

impl ImageStore {
    pub fn new(dir: impl Into<PathBuf>, jpeg_quality: u8) -> Self {
        Self {
            dir: dir.into(),
            jpeg_quality,
        }
    }

    /// Decode, re-encode and store an upload as `image{seq}.{ext}`
    pub fn ingest(&self, upload: &ImageUpload, seq: u64) -> Result<PathBuf, CatalogError> {
        self.stage(upload, seq)?.commit()
    }

    /// Decode and re-encode an upload into a hidden staging file
    ///
    /// Nothing is visible under the canonical name until `commit`.
    pub fn stage(&self, upload: &ImageUpload, seq: u64) -> Result<StagedImage, CatalogError> {
        let decoded = image::load_from_memory(&upload.bytes)
            .map_err(|e| CatalogError::ImageDecode(e.to_string()))?;

        let ext = upload.target_extension();
        let encoded = encode(&decoded, ext, self.jpeg_quality)
            .map_err(|e| CatalogError::ImageDecode(format!("re-encoding as {}: {}", ext, e)))?;

        let target = self.dir.join(format!("{}.{}", canonical_stem(seq), ext));
        let staged = self
            .dir
            .join(format!(".staging-{}.{}", uuid::Uuid::new_v4().simple(), ext));

        std::fs::write(&staged, &encoded).map_err(|e| {
            let _ = std::fs::remove_file(&staged);
            CatalogError::write(&self.dir, e)
        })?;

        log::debug!("Staged image for seq {} at {}", seq, staged.display());
        Ok(StagedImage { staged, target })
    }
}

/// An encoded image waiting to be moved to its canonical name
#[derive(Debug)]
#[must_use = "a staged image must be committed or discarded"]
pub struct StagedImage {
    staged: PathBuf,
    target: PathBuf,
}

impl StagedImage {
    /// Move the staged file to its canonical name, replacing any previous file
    pub fn commit(self) -> Result<PathBuf, CatalogError> {
        if let Err(e) = std::fs::rename(&self.staged, &self.target) {
            let _ = std::fs::remove_file(&self.staged);
            return Err(CatalogError::write(&self.target, e));
        }

        log::info!("Saved image {}", self.target.display());
        Ok(self.target)
    }

    /// Remove the staged file
    pub fn discard(self) {
        if let Err(e) = std::fs::remove_file(&self.staged) {
            log::warn!("Failed to remove staged image {}: {}", self.staged.display(), e);
        }
    }
}

fn encode(image: &DynamicImage, ext: &str, jpeg_quality: u8) -> image::ImageResult<Vec<u8>> {
    let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
    let mut buffer = Cursor::new(Vec::new());

    match ext {
        "png" => rgb.write_to(&mut buffer, ImageFormat::Png)?,
        // The image crate only ships a lossless WebP encoder
        "webp" => rgb.write_to(&mut buffer, ImageFormat::WebP)?,
        _ => {
            let encoder = JpegEncoder::new_with_quality(&mut buffer, jpeg_quality);
            rgb.write_with_encoder(encoder)?;
        }
    }

    Ok(buffer.into_inner())
}
