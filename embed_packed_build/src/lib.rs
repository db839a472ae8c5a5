//! Generates Rust source that embeds files as compressed literals.
//!
//! The output is a single `.rs` file for the [`embed_packed`] runtime: a
//! lookup table from each original path to a byte-string literal holding the
//! compressed contents, plus `assets()`, `get_data()` and, optionally,
//! `save_data()`/`save_all_data()`.
//!
//! Generation either produces the whole unit or fails; there is no partial
//! output and no per-file skipping once the input list is fixed.
//!
//! ```no_run
//! // build.rs
//! embed_packed_build::Config::new(["README.md", "data"])
//!     .base_dir("assets")
//!     .codec(embed_packed_build::Codec::Zstd)
//!     .build()
//!     .expect("Failed to embed assets");
//! ```

mod asset;
mod compress;
mod config;
pub mod inputs;
pub mod literal;
mod mangle;
pub mod pipeline;
pub mod unit;

pub use asset::EmbeddedAsset;
pub use compress::{CompressError, DEFAULT_ZSTD_LEVEL, compress, compress_with_level};
pub use config::{Config, DEFAULT_FILE_NAME, Error, Result};
pub use embed_packed::Codec;
pub use mangle::mangle;
