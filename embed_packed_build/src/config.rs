//! Builder API and error type for generating units.
use std::{
    env,
    path::{Path, PathBuf},
};

use embed_packed::Codec;
use tracing::info;

use crate::{
    CompressError, DEFAULT_ZSTD_LEVEL, inputs, pipeline,
    unit::{UnitOptions, resolve_runtime_path},
};

//
// ==================== PUBLIC BUILDER API ====================
//

/// A builder for configuring the embedding process.
///
/// This provides a clean, high-level API for use in `build.rs` scripts.
///
/// # Example
/// ```no_run
/// // in build.rs
/// embed_packed_build::Config::new(["README.md", "data"])
///   .base_dir("assets")
///   .save_helpers(true)
///   .build()
///   .expect("Failed to embed assets");
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    paths: Vec<String>,
    list: Option<PathBuf>,
    codec: Codec,
    level: i32,
    save_helpers: bool,
    base_dir: Option<PathBuf>,
    runtime_crate: Option<String>,
    file_name: String,
}

impl Config {
    /// Creates a new configuration for the given files and directories.
    ///
    /// Each path is both read from disk (relative to [`Config::base_dir`]) and
    /// used verbatim as the lookup key. Directories are expanded recursively.
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
            list: None,
            codec: Codec::default(),
            level: DEFAULT_ZSTD_LEVEL,
            save_helpers: false,
            base_dir: None,
            runtime_crate: None,
            file_name: DEFAULT_FILE_NAME.to_owned(),
        }
    }

    /// Adds the paths listed one per line in `list`.
    #[must_use]
    pub fn list(mut self, list: impl AsRef<Path>) -> Self {
        self.list = Some(list.as_ref().to_path_buf());
        self
    }

    /// Selects the compression codec. Defaults to [`Codec::Gzip`].
    #[must_use]
    pub const fn codec(mut self, codec: Codec) -> Self {
        self.codec = codec;
        self
    }

    /// Sets the zstd compression level (1-21).
    ///
    /// Only used with [`Codec::Zstd`]. If not set, a level of
    /// [`DEFAULT_ZSTD_LEVEL`] is used.
    #[must_use]
    pub const fn level(mut self, level: i32) -> Self {
        self.level = level;
        self
    }

    /// Also emit `save_data` and `save_all_data`.
    #[must_use]
    pub const fn save_helpers(mut self, save_helpers: bool) -> Self {
        self.save_helpers = save_helpers;
        self
    }

    /// Directory that input paths are read from. Lookup keys are unaffected.
    #[must_use]
    pub fn base_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.base_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Path generated code uses for the runtime crate, e.g. `my_app::embed_packed`.
    ///
    /// When unset it is read from the consuming crate's manifest, falling
    /// back to `embed_packed`.
    #[must_use]
    pub fn runtime_crate(mut self, path: impl Into<String>) -> Self {
        self.runtime_crate = Some(path.into());
        self
    }

    /// File name written by [`Config::build`]. Defaults to `embedded.rs`.
    #[must_use]
    pub fn file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = name.into();
        self
    }

    /// The sorted, de-duplicated file list this configuration embeds.
    ///
    /// # Errors
    /// See [`inputs::expand_inputs`].
    pub fn inputs(&self) -> Result<Vec<String>> {
        inputs::expand_inputs(&self.paths, self.list.as_deref(), self.base_dir.as_deref())
    }

    /// The pipeline options this configuration resolves to.
    ///
    /// # Errors
    /// [`Error::InvalidRuntimePath`] if the runtime crate path does not parse.
    pub fn options(&self) -> Result<pipeline::Options> {
        Ok(pipeline::Options {
            unit: UnitOptions {
                codec: self.codec,
                save_helpers: self.save_helpers,
                runtime: resolve_runtime_path(self.runtime_crate.as_deref())?,
            },
            level: self.level,
            base_dir: self.base_dir.clone(),
        })
    }

    /// Everything a build script must watch: the list file, each named path
    /// (so new files in a named directory are noticed) and every expanded
    /// input, all resolved against the base directory.
    fn watched_paths(&self, files: &[String]) -> Vec<PathBuf> {
        let base_dir = self.base_dir.as_deref();
        let mut watched: Vec<PathBuf> = self.list.iter().cloned().collect();
        watched.extend(
            self.paths
                .iter()
                .chain(files)
                .map(|path| inputs::resolve(base_dir, path)),
        );
        watched.sort();
        watched.dedup();
        watched
    }

    /// Generates the unit and returns its source.
    ///
    /// # Errors
    /// Any input, read, compression or identifier error. No partial output
    /// is produced.
    pub fn generate(&self) -> Result<String> {
        let options = self.options()?;
        pipeline::run(&self.inputs()?, &options)
    }

    /// Generates the unit and writes it to `path`.
    ///
    /// # Errors
    /// See [`Config::generate`]; also [`Error::Write`].
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let source = self.generate()?;
        inputs::write_output(&source, path.as_ref())
    }

    /// Runs the embedding process from a build script.
    ///
    /// This is the final method that should be called in the builder chain.
    /// Relative base directories are resolved against `CARGO_MANIFEST_DIR`,
    /// the unit is written to `OUT_DIR` and cargo is told to rerun when any
    /// input changes. Returns the path of the written file.
    ///
    /// # Errors
    /// Returns an [`Error`] if any part of the generation fails or cargo's
    /// environment variables are missing.
    pub fn build(mut self) -> Result<PathBuf> {
        let manifest_dir = env::var("CARGO_MANIFEST_DIR")
            .map(PathBuf::from)
            .map_err(|_| Error::Var("CARGO_MANIFEST_DIR"))?;
        let out_dir = env::var("OUT_DIR")
            .map(PathBuf::from)
            .map_err(|_| Error::Var("OUT_DIR"))?;

        self.list = self.list.take().map(|list| manifest_dir.join(list));
        self.base_dir = Some(match self.base_dir.take() {
            Some(dir) => manifest_dir.join(dir),
            None => manifest_dir,
        });

        let files = self.inputs()?;
        for path in self.watched_paths(&files) {
            println!("cargo:rerun-if-changed={}", path.display());
        }

        let target = out_dir.join(&self.file_name);
        let source = pipeline::run(&files, &self.options()?)?;
        inputs::write_output(&source, &target)?;
        info!(file = %target.display(), "wrote generated unit");
        Ok(target)
    }
}

/// The file name [`Config::build`] writes into `OUT_DIR` by default.
pub const DEFAULT_FILE_NAME: &str = "embedded.rs";

/// A specialized `Result` type for generation.
pub type Result<T> = std::result::Result<T, Error>;

/// An error that can occur while generating a unit.
///
/// Every variant aborts the whole batch.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("could not read '{}'", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not compress '{path}'")]
    Compress {
        path: String,
        #[source]
        source: CompressError,
    },
    #[error("'{first}' and '{second}' both mangle to identifier '{identifier}'")]
    DuplicateIdentifier {
        identifier: String,
        first: String,
        second: String,
    },
    #[error("path '{path}' has no alphanumeric characters to derive an identifier from")]
    MangleFailure { path: String },
    #[error("could not write '{}'", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Environment variable '{0}' not set by Cargo")]
    Var(&'static str),
    #[error("Path '{0}' not found (current directory is '{1}')")]
    PathNotFound(String, String),
    #[error("Path '{0}' has unsupported file type")]
    UnsupportedFileType(String),
    #[error("Path '{}' is not valid UTF-8", .0.display())]
    NonUtf8Path(PathBuf),
    #[error("'{0}' is not a valid path to the runtime crate")]
    InvalidRuntimePath(String),
}
