//! Locate the image file belonging to a catalog sequence number

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;

use super::ALLOWED_EXTENSIONS;

static NOT_ALNUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]").unwrap());

/// Reduce a name to lowercase ASCII letters and digits
pub fn normalize_name(name: &str) -> String {
    NOT_ALNUM.replace_all(&name.to_lowercase(), "").into_owned()
}

/// Canonical stem written by ingest, e.g. "image7"
pub fn canonical_stem(seq: u64) -> String {
    format!("image{}", seq)
}

/// Normalized forms of every accepted name for `seq`, without repeats
fn accepted_patterns(seq: u64) -> Vec<String> {
    let mut patterns: Vec<String> = [
        format!("image{}", seq),
        format!("imagem{}", seq),
        format!("image {}", seq),
        format!("imagem {}", seq),
    ]
    .iter()
    .map(|name| normalize_name(name))
    .collect();
    patterns.sort();
    patterns.dedup();
    patterns
}

fn has_allowed_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| ALLOWED_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Image files of one directory listing, keyed by normalized stem
#[derive(Debug, Clone, Default)]
pub struct ImageIndex {
    by_stem: HashMap<String, Vec<PathBuf>>,
}

impl ImageIndex {
    fn insert(&mut self, path: PathBuf) {
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            return;
        };
        self.by_stem.entry(normalize_name(stem)).or_default().push(path);
    }

    pub fn file_count(&self) -> usize {
        self.by_stem.values().map(Vec::len).sum()
    }

    /// Image for `seq` in this listing
    ///
    /// When several files match, the canonical `image{seq}` stem wins, then
    /// the lexicographically smallest file name.
    pub fn get(&self, seq: u64) -> Option<PathBuf> {
        let canonical = canonical_stem(seq);
        let matches: Vec<&PathBuf> = accepted_patterns(seq)
            .iter()
            .filter_map(|pattern| self.by_stem.get(pattern))
            .flatten()
            .collect();

        if matches.len() > 1 {
            log::debug!("{} images match seq {}, picking one deterministically", matches.len(), seq);
        }

        matches
            .into_iter()
            .min_by_key(|path| {
                let is_canonical =
                    path.file_stem().and_then(|s| s.to_str()) == Some(canonical.as_str());
                (!is_canonical, path.file_name().map(|n| n.to_os_string()))
            })
            .cloned()
    }
}

/// Resolves sequence numbers to image files in a flat directory
#[derive(Debug, Clone)]
pub struct ImageResolver {
    dir: PathBuf,
}

impl ImageResolver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// List the directory once; an unreadable directory gives an empty index
    pub fn index(&self) -> ImageIndex {
        let mut index = ImageIndex::default();

        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) => {
                log::debug!("Cannot list image directory {}: {}", self.dir.display(), e);
                return index;
            }
        };

        entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .map(|entry| entry.path())
            .filter(|path| has_allowed_extension(path))
            .for_each(|path| index.insert(path));

        log::debug!("Indexed {} images in {}", index.file_count(), self.dir.display());
        index
    }

    /// Find the image for `seq`
    ///
    /// Names are compared after normalization, so "Imagem 7.PNG" matches seq 7.
    /// Leading zeros are significant: "image01" does not match seq 1. When
    /// several files match, the canonical `image{seq}` stem wins, then the
    /// lexicographically smallest file name.
    pub fn resolve(&self, seq: u64) -> Option<PathBuf> {
        self.index().get(seq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), b"").unwrap();
    }

    fn file_name(path: Option<PathBuf>) -> Option<String> {
        path.and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("Imagem 7"), "imagem7");
        assert_eq!(normalize_name("IMAGE_12-b"), "image12b");
        assert_eq!(normalize_name("imagem (3)"), "imagem3");
    }

    #[test]
    fn test_resolves_case_and_spacing_variants() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "Imagem 7.PNG");

        let resolver = ImageResolver::new(dir.path());
        assert_eq!(file_name(resolver.resolve(7)), Some("Imagem 7.PNG".to_string()));
        assert_eq!(resolver.resolve(70), None);
    }

    #[test]
    fn test_leading_zeros_are_not_equivalent() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "image01.jpg");

        let resolver = ImageResolver::new(dir.path());
        assert_eq!(resolver.resolve(1), None);
    }

    #[test]
    fn test_ignores_disallowed_extensions() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "image3.gif");
        touch(dir.path(), "image3.txt");

        let resolver = ImageResolver::new(dir.path());
        assert_eq!(resolver.resolve(3), None);

        touch(dir.path(), "IMAGE3.WebP");
        assert_eq!(file_name(resolver.resolve(3)), Some("IMAGE3.WebP".to_string()));
    }

    #[test]
    fn test_prefix_does_not_match_longer_number() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "image12.jpg");

        let resolver = ImageResolver::new(dir.path());
        assert_eq!(resolver.resolve(1), None);
        assert_eq!(file_name(resolver.resolve(12)), Some("image12.jpg".to_string()));
    }

    #[test]
    fn test_multiple_matches_prefer_canonical_then_name_order() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "imagem 1.png");
        touch(dir.path(), "Image1.jpeg");
        touch(dir.path(), "image1.webp");

        let resolver = ImageResolver::new(dir.path());
        assert_eq!(file_name(resolver.resolve(1)), Some("image1.webp".to_string()));

        std::fs::remove_file(dir.path().join("image1.webp")).unwrap();
        assert_eq!(file_name(resolver.resolve(1)), Some("Image1.jpeg".to_string()));
    }

    #[test]
    fn test_index_answers_many_lookups_from_one_listing() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "image1.jpg");
        touch(dir.path(), "Imagem 2.png");
        touch(dir.path(), "imagem 2.webp");
        touch(dir.path(), "image3.txt");

        let resolver = ImageResolver::new(dir.path());
        let index = resolver.index();
        assert_eq!(index.file_count(), 3);

        for seq in 1..=4 {
            assert_eq!(index.get(seq), resolver.resolve(seq));
        }
        assert_eq!(file_name(index.get(2)), Some("Imagem 2.png".to_string()));
        assert_eq!(index.get(3), None);

        // The index reflects the directory at the time it was built
        touch(dir.path(), "image4.jpg");
        assert_eq!(index.get(4), None);
        assert!(resolver.resolve(4).is_some());
    }

    #[test]
    fn test_missing_directory_resolves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = ImageResolver::new(dir.path().join("absent"));
        assert_eq!(resolver.resolve(1), None);
    }
}
