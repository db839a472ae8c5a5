//! Encoders for each [`Codec`], paired with [`Codec::decompress`] at runtime.
use std::io::Write;

use embed_packed::Codec;
use flate2::{Compression, write::GzEncoder};
use zstd::stream::Encoder;

/// The zstd level used unless [`crate::Config::level`] overrides it (1-21).
pub const DEFAULT_ZSTD_LEVEL: i32 = 6;

/// A failure compressing one input.
#[derive(Debug, thiserror::Error)]
pub enum CompressError {
    #[error("input is empty; empty files cannot be embedded")]
    EmptyInput,
    #[error("could not initialise the {codec} encoder")]
    CodecInit {
        codec: Codec,
        #[source]
        source: std::io::Error,
    },
    #[error("{codec} encoder produced no output")]
    ZeroOutput { codec: Codec },
    #[error("{codec} encoder failed")]
    Io {
        codec: Codec,
        #[source]
        source: std::io::Error,
    },
}

/// Compresses `input` with `codec` at its default setting.
///
/// # Errors
/// See [`compress_with_level`].
pub fn compress(input: &[u8], codec: Codec) -> Result<Vec<u8>, CompressError> {
    compress_with_level(input, codec, DEFAULT_ZSTD_LEVEL)
}

/// Compresses `input` with `codec`. `level` only applies to [`Codec::Zstd`];
/// gzip always runs at its best compression.
///
/// # Errors
/// [`CompressError::EmptyInput`] for an empty slice,
/// [`CompressError::CodecInit`] if the encoder cannot be created, and
/// [`CompressError::ZeroOutput`] if a non-empty input encodes to nothing.
pub fn compress_with_level(
    input: &[u8],
    codec: Codec,
    level: i32,
) -> Result<Vec<u8>, CompressError> {
    if input.is_empty() {
        return Err(CompressError::EmptyInput);
    }

    let io_err = |source| CompressError::Io { codec, source };
    let output = match codec {
        Codec::Gzip => {
            let mut encoder = GzEncoder::new(Vec::with_capacity(input.len()), Compression::best());
            encoder.write_all(input).map_err(io_err)?;
            encoder.finish().map_err(io_err)?
        }
        Codec::Zstd => {
            let mut encoder = Encoder::new(Vec::with_capacity(input.len()), level)
                .map_err(|source| CompressError::CodecInit { codec, source })?;
            encoder.write_all(input).map_err(io_err)?;
            // `finish` is essential to finalize the Zstd frame.
            encoder.finish().map_err(io_err)?
        }
    };

    if output.is_empty() {
        return Err(CompressError::ZeroOutput { codec });
    }
    Ok(output)
}
