//! Read, compress, mangle and encode every input, then build one unit.
use std::{
    collections::{HashMap, HashSet},
    fs,
    path::PathBuf,
};

use tracing::{debug, info};

use crate::{
    DEFAULT_ZSTD_LEVEL, EmbeddedAsset, Error, Result, compress_with_level, inputs::resolve,
    mangle,
    unit::{self, UnitOptions},
};

/// Everything the driver needs besides the path list.
#[derive(Debug, Clone)]
pub struct Options {
    pub unit: UnitOptions,
    /// zstd level; ignored by gzip.
    pub level: i32,
    /// Directory relative paths are read from.
    pub base_dir: Option<PathBuf>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            unit: UnitOptions::default(),
            level: DEFAULT_ZSTD_LEVEL,
            base_dir: None,
        }
    }
}

/// Generates the unit for `paths`, in the order given.
///
/// Callers sort and de-duplicate `paths` for reproducible output.
///
/// # Errors
/// The first failure of any file aborts the run; nothing is returned for
/// the files that succeeded.
pub fn run<S: AsRef<str>>(paths: &[S], options: &Options) -> Result<String> {
    let assets = collect(paths, options)?;
    let source = unit::build(&assets, &options.unit);
    info!(
        files = assets.len(),
        codec = %options.unit.codec,
        bytes = source.len(),
        "generated unit"
    );
    Ok(source)
}

/// Produces one [`EmbeddedAsset`] per distinct path.
///
/// Identifiers for the whole batch are checked before any file is read.
///
/// # Errors
/// [`Error::MangleFailure`], [`Error::DuplicateIdentifier`], [`Error::Read`]
/// or [`Error::Compress`].
pub fn collect<S: AsRef<str>>(paths: &[S], options: &Options) -> Result<Vec<EmbeddedAsset>> {
    let paths = distinct(paths);
    check_identifiers(&paths)?;

    let mut assets = Vec::with_capacity(paths.len());
    for path in paths {
        let file = resolve(options.base_dir.as_deref(), path);
        let raw = fs::read(&file).map_err(|source| Error::Read {
            path: file.clone(),
            source,
        })?;
        let compressed = compress_with_level(&raw, options.unit.codec, options.level).map_err(
            |source| Error::Compress {
                path: path.to_owned(),
                source,
            },
        )?;
        debug!(
            path,
            raw = raw.len(),
            compressed = compressed.len(),
            "compressed file"
        );
        assets.push(EmbeddedAsset::new(path, compressed)?);
    }
    Ok(assets)
}

/// Drops repeats of the same path, keeping the first position.
fn distinct<S: AsRef<str>>(paths: &[S]) -> Vec<&str> {
    let mut seen = HashSet::with_capacity(paths.len());
    paths
        .iter()
        .map(AsRef::as_ref)
        .filter(|path| {
            let first = seen.insert(*path);
            if !first {
                debug!(path, "skipping repeated path");
            }
            first
        })
        .collect()
}

/// Fails if any path mangles to nothing or to another path's identifier.
///
/// # Errors
/// [`Error::MangleFailure`] or [`Error::DuplicateIdentifier`] naming both paths.
pub fn check_identifiers(paths: &[&str]) -> Result<()> {
    let mut owners: HashMap<String, &str> = HashMap::with_capacity(paths.len());
    for &path in paths {
        let identifier = mangle(path);
        if identifier.is_empty() {
            return Err(Error::MangleFailure {
                path: path.to_owned(),
            });
        }
        if let Some(first) = owners.get(&identifier) {
            if *first != path {
                return Err(Error::DuplicateIdentifier {
                    identifier,
                    first: (*first).to_owned(),
                    second: path.to_owned(),
                });
            }
            continue;
        }
        owners.insert(identifier, path);
    }
    Ok(())
}
