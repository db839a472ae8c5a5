use std::{fmt, io::Read, str::FromStr};

use flate2::read::GzDecoder;

/// Compression scheme used for every literal in one generated unit.
///
/// The codec is chosen once when the unit is generated and recorded in it as
/// a constant, so the runtime always decodes with the matching decoder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Codec {
    /// gzip at maximum compression.
    #[default]
    Gzip,
    /// Zstandard at a moderate, tunable level.
    Zstd,
}

impl Codec {
    /// All supported codecs, default first.
    pub const ALL: [Self; 2] = [Self::Gzip, Self::Zstd];

    /// The lowercase name accepted by [`FromStr`].
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Gzip => "gzip",
            Self::Zstd => "zstd",
        }
    }

    /// The enum variant name, as written in generated source.
    #[must_use]
    pub const fn variant_name(self) -> &'static str {
        match self {
            Self::Gzip => "Gzip",
            Self::Zstd => "Zstd",
        }
    }

    /// Decompresses a complete stream produced by the generator for this codec.
    ///
    /// # Errors
    /// Returns the decoder's I/O error when the stream is corrupt or was
    /// produced by a different codec.
    pub fn decompress(self, compressed: &[u8]) -> std::io::Result<Vec<u8>> {
        match self {
            Self::Gzip => {
                let mut out = Vec::with_capacity(compressed.len() * 2);
                GzDecoder::new(compressed).read_to_end(&mut out)?;
                Ok(out)
            }
            Self::Zstd => zstd::decode_all(compressed),
        }
    }
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when parsing an unknown codec name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown codec '{0}' (expected 'gzip' or 'zstd')")]
pub struct ParseCodecError(String);

impl FromStr for Codec {
    type Err = ParseCodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|codec| codec.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseCodecError(s.to_owned()))
    }
}
