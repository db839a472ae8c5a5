//! Lookup, live-override and save helpers called by generated units.
//!
//! Everything here operates on an [`Assets`] handle rather than global state:
//! the base path used for live overrides is a field of the handle, so two
//! handles over the same table can look in different places.
use std::{
    collections::HashMap,
    fs,
    path::{Component, Path, PathBuf},
};

use tracing::debug;

use crate::Codec;

/// Original path to compressed bytes, as populated by a generated unit.
pub type EmbeddedFileList = HashMap<&'static str, &'static [u8]>;

/// A specialized `Result` type for runtime lookups.
pub type Result<T> = std::result::Result<T, RuntimeError>;

/// A failure while retrieving or saving an embedded file.
///
/// The variants are kept apart so a host can fall back on a missing asset
/// while still treating a corrupt one as fatal.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("no embedded file '{path}'")]
    NotFound { path: String },
    #[error("embedded file '{path}' could not be decompressed")]
    Decode {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("I/O error on '{}'", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RuntimeError {
    /// Whether this is a [`RuntimeError::NotFound`].
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Handle over an embedded file table plus the optional override root.
#[derive(Debug, Clone)]
pub struct Assets {
    files: &'static EmbeddedFileList,
    codec: Codec,
    base_path: Option<PathBuf>,
}

impl Assets {
    /// Wraps a populated table. No base path is set.
    #[must_use]
    pub const fn new(files: &'static EmbeddedFileList, codec: Codec) -> Self {
        Self {
            files,
            codec,
            base_path: None,
        }
    }

    /// Sets the directory checked for override files before the embedded copy.
    ///
    /// An empty path clears the override root.
    pub fn set_base_path(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        self.base_path = (!path.as_os_str().is_empty()).then_some(path);
    }

    /// Builder form of [`Assets::set_base_path`].
    #[must_use]
    pub fn with_base_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.set_base_path(path);
        self
    }

    #[must_use]
    pub fn base_path(&self) -> Option<&Path> {
        self.base_path.as_deref()
    }

    #[must_use]
    pub const fn codec(&self) -> Codec {
        self.codec
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Whether `path` has an embedded entry. Override files are not consulted.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    /// Embedded paths, in no particular order.
    pub fn paths(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.files.keys().copied()
    }

    /// The still-compressed bytes embedded for `path`.
    #[must_use]
    pub fn embedded(&self, path: &str) -> Option<&'static [u8]> {
        self.files.get(path).copied()
    }

    /// Where an override for `path` would live, if a base path is set.
    fn override_path(&self, path: &str) -> Option<PathBuf> {
        self.base_path.as_deref().map(|base| below(base, path))
    }

    /// Returns the contents of `path`.
    ///
    /// A regular file at `base_path/path` wins and is returned byte for byte.
    /// Otherwise the embedded entry is decompressed.
    ///
    /// # Errors
    /// [`RuntimeError::NotFound`] when there is neither an override nor an
    /// entry, [`RuntimeError::Decode`] when the entry does not decompress, and
    /// [`RuntimeError::Io`] when an existing override cannot be read.
    pub fn get_data(&self, path: &str) -> Result<Vec<u8>> {
        if let Some(candidate) = self.override_path(path) {
            if candidate.is_file() {
                debug!(path, file = %candidate.display(), "serving override file");
                return fs::read(&candidate).map_err(|source| RuntimeError::Io {
                    path: candidate,
                    source,
                });
            }
        }
        self.decompress(path)
    }

    /// Decompresses the embedded entry for `path`, ignoring overrides.
    fn decompress(&self, path: &str) -> Result<Vec<u8>> {
        let compressed = self.embedded(path).ok_or_else(|| RuntimeError::NotFound {
            path: path.to_owned(),
        })?;
        self.codec
            .decompress(compressed)
            .map_err(|source| RuntimeError::Decode {
                path: path.to_owned(),
                source,
            })
    }
}

/// Joins `path` onto `base`, keeping absolute keys below `base` too.
fn below(base: &Path, path: &str) -> PathBuf {
    let mut target = base.to_path_buf();
    target.extend(
        Path::new(path)
            .components()
            .filter(|part| !matches!(part, Component::Prefix(_) | Component::RootDir)),
    );
    target
}

/// Whether anything exists at `path`.
pub fn exists(path: impl AsRef<Path>) -> bool {
    fs::metadata(path).is_ok()
}

/// Decompresses the entry for `path` and writes it below the base path.
///
/// Without a base path the file is written relative to the current
/// directory. Missing parent directories are created. Returns the path that
/// was written.
///
/// # Errors
/// [`RuntimeError::NotFound`] for an unknown entry, [`RuntimeError::Decode`]
/// for a corrupt one and [`RuntimeError::Io`] if the file cannot be written.
pub fn save_data(assets: &Assets, path: &str) -> Result<PathBuf> {
    let data = assets.decompress(path)?;
    let target = assets
        .override_path(path)
        .unwrap_or_else(|| PathBuf::from(path));

    if let Some(parent) = target.parent() {
        if !parent.as_os_str().is_empty() && !exists(parent) {
            fs::create_dir_all(parent).map_err(|source| RuntimeError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }
    fs::write(&target, data).map_err(|source| RuntimeError::Io {
        path: target.clone(),
        source,
    })?;
    debug!(path, file = %target.display(), "saved embedded file");
    Ok(target)
}

/// Saves every embedded file, stopping at the first failure.
///
/// The table is visited in no particular order.
///
/// # Errors
/// The first error returned by [`save_data`].
pub fn save_all_data(assets: &Assets) -> Result<()> {
    for path in assets.paths() {
        save_data(assets, path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn gzip(data: &[u8]) -> &'static [u8] {
        let mut encoder =
            flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::best());
        encoder.write_all(data).unwrap();
        Box::leak(encoder.finish().unwrap().into_boxed_slice())
    }

    fn table(entries: &[(&'static str, &'static [u8])]) -> &'static EmbeddedFileList {
        Box::leak(Box::new(entries.iter().copied().collect()))
    }

    fn sample() -> Assets {
        Assets::new(
            table(&[
                ("README.md", gzip(b"hello")),
                ("data/x.bin", gzip(b"\x00\x01")),
            ]),
            Codec::Gzip,
        )
    }

    #[test]
    fn returns_embedded_contents() {
        let assets = sample();
        assert_eq!(assets.get_data("README.md").unwrap(), b"hello");
        assert_eq!(assets.get_data("data/x.bin").unwrap(), b"\x00\x01");
        assert_eq!(assets.len(), 2);
    }

    #[test]
    fn missing_entry_is_not_found() {
        let err = sample().get_data("missing/path").unwrap_err();
        assert!(err.is_not_found(), "{err:?}");
    }

    #[test]
    fn corrupt_entry_is_decode_error() {
        let assets = Assets::new(table(&[("bad", &b"not gzip at all"[..])]), Codec::Gzip);
        let err = assets.get_data("bad").unwrap_err();
        assert!(matches!(err, RuntimeError::Decode { ref path, .. } if path == "bad"));
    }

    #[test]
    fn codec_mismatch_is_decode_error() {
        let assets = Assets::new(table(&[("README.md", gzip(b"hello"))]), Codec::Zstd);
        assert!(matches!(
            assets.get_data("README.md"),
            Err(RuntimeError::Decode { .. })
        ));
    }

    #[test]
    fn override_file_wins_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("README.md"), b"edited on disk").unwrap();

        let assets = sample().with_base_path(dir.path());
        assert_eq!(assets.get_data("README.md").unwrap(), b"edited on disk");
        // Not overridden, so still served from the table.
        assert_eq!(assets.get_data("data/x.bin").unwrap(), b"\x00\x01");
    }

    #[test]
    fn override_serves_files_missing_from_table() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("extra.txt"), b"only on disk").unwrap();

        let assets = sample().with_base_path(dir.path());
        assert_eq!(assets.get_data("extra.txt").unwrap(), b"only on disk");
    }

    #[test]
    fn override_directory_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("README.md")).unwrap();

        let assets = sample().with_base_path(dir.path());
        assert_eq!(assets.get_data("README.md").unwrap(), b"hello");
    }

    #[test]
    fn empty_base_path_clears_override() {
        let mut assets = sample().with_base_path("somewhere");
        assert!(assets.base_path().is_some());
        assets.set_base_path("");
        assert!(assets.base_path().is_none());
    }

    #[test]
    fn save_data_writes_original_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let assets = sample().with_base_path(dir.path());

        let written = save_data(&assets, "data/x.bin").unwrap();
        assert_eq!(written, dir.path().join("data/x.bin"));
        assert_eq!(fs::read(written).unwrap(), b"\x00\x01");
    }

    #[test]
    fn absolute_key_stays_below_base_path() {
        let source = tempfile::tempdir().unwrap();
        let base = tempfile::tempdir().unwrap();
        let source_file = source.path().join("logo.txt");
        fs::write(&source_file, b"original source").unwrap();
        let key: &'static str = Box::leak(source_file.to_str().unwrap().into());

        let assets = Assets::new(table(&[(key, gzip(b"embedded"))]), Codec::Gzip)
            .with_base_path(base.path());
        assert_eq!(assets.get_data(key).unwrap(), b"embedded");

        let written = save_data(&assets, key).unwrap();
        assert!(written.starts_with(base.path()), "{}", written.display());
        assert_eq!(fs::read(&written).unwrap(), b"embedded");
        assert_eq!(fs::read(&source_file).unwrap(), b"original source");

        // The saved copy now acts as the override.
        fs::write(&written, b"edited").unwrap();
        assert_eq!(assets.get_data(key).unwrap(), b"edited");
    }

    #[test]
    fn keys_join_below_base_path() {
        assert_eq!(below(Path::new("root"), "a/b.txt"), Path::new("root/a/b.txt"));
        assert_eq!(below(Path::new("root"), "/a/b.txt"), Path::new("root/a/b.txt"));
    }

    #[test]
    fn save_data_unknown_entry() {
        let dir = tempfile::tempdir().unwrap();
        let assets = sample().with_base_path(dir.path());
        assert!(save_data(&assets, "nope").unwrap_err().is_not_found());
        assert!(!exists(dir.path().join("nope")));
    }

    #[test]
    fn save_all_data_writes_every_entry() {
        let dir = tempfile::tempdir().unwrap();
        let assets = sample().with_base_path(dir.path());

        save_all_data(&assets).unwrap();
        assert_eq!(fs::read(dir.path().join("README.md")).unwrap(), b"hello");
        assert_eq!(fs::read(dir.path().join("data/x.bin")).unwrap(), b"\x00\x01");
    }

    #[test]
    fn save_all_data_stops_on_corrupt_entry() {
        let dir = tempfile::tempdir().unwrap();
        let assets = Assets::new(table(&[("bad", &b"garbage"[..])]), Codec::Zstd)
            .with_base_path(dir.path());
        assert!(matches!(
            save_all_data(&assets),
            Err(RuntimeError::Decode { .. })
        ));
        assert!(!exists(dir.path().join("bad")));
    }
}
