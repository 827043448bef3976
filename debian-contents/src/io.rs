// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! I/O helpers. */

use {
    crate::error::{ContentsError, Result},
    async_compression::futures::bufread::{BzDecoder, GzipDecoder, LzmaDecoder, XzDecoder},
    async_trait::async_trait,
    futures::{AsyncBufRead, AsyncRead, AsyncReadExt},
    std::{io::Write, path::Path, pin::Pin, str::FromStr},
};

/// Size of buffers used when streaming remote content to local files.
pub const CHUNK_SIZE: usize = 10 * 1024;

/// Compression format used by Debian primitives.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Compression {
    /// No compression (no extension).
    None,

    /// XZ compression (.xz extension).
    Xz,

    /// Gzip compression (.gz extension).
    Gzip,

    /// Bzip2 compression (.bz2 extension).
    Bzip2,

    /// LZMA compression (.lzma extension).
    Lzma,
}

impl Default for Compression {
    fn default() -> Self {
        Self::Gzip
    }
}

impl Compression {
    /// Filename extension for files compressed in this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::None => "",
            Self::Xz => ".xz",
            Self::Gzip => ".gz",
            Self::Bzip2 => ".bz2",
            Self::Lzma => ".lzma",
        }
    }
}

impl FromStr for Compression {
    type Err = ContentsError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim_start_matches('.') {
            "none" | "" => Ok(Self::None),
            "xz" => Ok(Self::Xz),
            "gz" | "gzip" => Ok(Self::Gzip),
            "bz2" | "bzip2" => Ok(Self::Bzip2),
            "lzma" => Ok(Self::Lzma),
            _ => Err(ContentsError::UnknownCompression(s.to_string())),
        }
    }
}

/// Wrap a reader with transparent decompression.
pub fn read_decompressed<'a>(
    stream: impl AsyncBufRead + Send + 'a,
    compression: Compression,
) -> Pin<Box<dyn AsyncRead + Send + 'a>> {
    match compression {
        Compression::None => Box::pin(stream),
        Compression::Gzip => Box::pin(GzipDecoder::new(stream)),
        Compression::Xz => Box::pin(XzDecoder::new(stream)),
        Compression::Bzip2 => Box::pin(BzDecoder::new(stream)),
        Compression::Lzma => Box::pin(LzmaDecoder::new(stream)),
    }
}

/// Decompress an in-memory buffer in its entirety.
pub async fn decompress_bytes(data: &[u8], compression: Compression) -> std::io::Result<Vec<u8>> {
    let mut reader = read_decompressed(futures::io::Cursor::new(data), compression);

    let mut res = vec![];
    reader.read_to_end(&mut res).await?;

    Ok(res)
}

/// Stream the content of a reader into a local file.
///
/// The file is created or truncated. Data is moved in chunks of at most
/// [CHUNK_SIZE] bytes, so peak memory is bounded regardless of the source size.
///
/// Returns the number of bytes written.
pub async fn copy_reader_to_path(
    mut reader: Pin<Box<dyn AsyncRead + Send + '_>>,
    path: &Path,
) -> Result<u64> {
    let path_error =
        |e: std::io::Error| ContentsError::RepositoryIoPath(format!("{}", path.display()), e);

    let mut fh = std::fs::File::create(path).map_err(path_error)?;
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut total = 0;

    loop {
        let count = reader
            .read(&mut buf)
            .await
            .map_err(ContentsError::from_stream_error)?;
        if count == 0 {
            break;
        }

        fh.write_all(&buf[0..count]).map_err(path_error)?;
        total += count as u64;
    }

    fh.flush().map_err(path_error)?;

    Ok(total)
}

/// Generic mechanism for obtaining content at a given path.
///
/// This trait is the seam between repository logic and transports: given a path
/// relative to some base location, it yields a byte stream.
///
/// Read errors of the returned stream may carry a [ContentsError], which
/// [ContentsError::from_stream_error()] recovers.
#[async_trait]
pub trait DataResolver: Sync {
    /// Get the content of a relative path as an async reader.
    ///
    /// This obtains a reader for path data and returns the raw data without any
    /// decoding applied.
    async fn get_path(&self, path: &str) -> Result<Pin<Box<dyn AsyncRead + Send>>>;
}
