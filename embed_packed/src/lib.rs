//! Runtime support for source units generated by `embed_packed_build`.
//!
//! A generated unit is plain Rust source that embeds every listed file as a
//! compressed byte-string literal and a lookup table keyed by the original
//! path. This crate is what that source links against at runtime.
//!
//! ## How It Works
//!
//! 1.  **Generation:** `embed_packed_build` (from a `build.rs` script or the
//!     `embed-packed` command line tool) reads each input file, compresses it
//!     with the selected [`Codec`], and writes a single `.rs` file.
//! 2.  **Inclusion:** The host program pulls the file in with `include!`. The
//!     table is populated on first access.
//! 3.  **Runtime:** [`Assets::get_data`] decompresses one entry on each call.
//!     When a base path is set and a real file exists below it, that file is
//!     returned verbatim instead, so assets can be edited without regenerating.
//!
//! ## Usage
//!
//! ```toml
//! [dependencies]
//! embed_packed = "0.1.0"
//!
//! [build-dependencies]
//! embed_packed_build = "0.1.0"
//! ```
//!
//! ```ignore
//! // build.rs
//! embed_packed_build::Config::new(["README.md", "data/x.bin"])
//!     .base_dir("assets")
//!     .build()
//!     .expect("Failed to embed assets");
//! ```
//!
//! ```ignore
//! // src/main.rs
//! mod embedded {
//!     include!(concat!(env!("OUT_DIR"), "/embedded.rs"));
//! }
//!
//! let mut assets = embedded::assets();
//! assets.set_base_path("assets"); // optional live override root
//! let readme: Vec<u8> = embedded::get_data(&assets, "README.md")?;
//! ```

mod codec;
pub mod runtime;

pub use codec::{Codec, ParseCodecError};
pub use runtime::{Assets, EmbeddedFileList, RuntimeError};
