// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! Debian repository primitives.

A Debian repository is a collection of files holding packages and other
support primitives. See <https://wiki.debian.org/DebianRepository/Format>
for the canonical definition of a Debian repository.

This module is concerned with retrieving `Contents` indices from a repository
component directory (e.g. `dists/stable/main/`) and materializing them on the
local filesystem.
*/

use {
    crate::{
        error::{ContentsError, Result},
        io::{copy_reader_to_path, decompress_bytes, Compression, DataResolver},
    },
    log::{debug, info},
    std::path::{Path, PathBuf},
};

pub mod contents;
pub mod filesystem;
#[cfg(feature = "http")]
pub mod http;

/// The default mirror location for `Contents` indices.
pub const DEFAULT_MIRROR_URL: &str = "http://ftp.uk.debian.org/debian/dists/stable/main/";

/// Describes a `Contents` index to retrieve from a repository component.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ContentsIndexFetch {
    /// Architecture of the index. e.g. `amd64`.
    pub architecture: String,
    /// Whether this is the index for installer packages (udebs).
    pub is_installer: bool,
    /// Compression format to retrieve the index in.
    pub compression: Compression,
}

impl ContentsIndexFetch {
    /// Construct an instance for a gzip compressed index.
    pub fn new(architecture: impl ToString, is_installer: bool) -> Self {
        Self {
            architecture: architecture.to_string(),
            is_installer,
            compression: Compression::default(),
        }
    }

    /// Set the compression format to retrieve.
    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Path of the index relative to the component directory.
    ///
    /// e.g. `Contents-amd64.gz` or `Contents-udeb-amd64.gz`.
    pub fn remote_path(&self) -> String {
        if self.is_installer {
            format!("Contents-udeb-{}{}", self.architecture, self.compression.extension())
        } else {
            format!("Contents-{}{}", self.architecture, self.compression.extension())
        }
    }

    /// Filename of the decompressed index on the local filesystem.
    ///
    /// e.g. `amd64` or `udeb-amd64`.
    pub fn local_filename(&self) -> String {
        if self.is_installer {
            format!("udeb-{}", self.architecture)
        } else {
            self.architecture.clone()
        }
    }

    /// Filename of the compressed index on the local filesystem.
    ///
    /// e.g. `amd64.gz` or `udeb-amd64.gz`. For [Compression::None] this is the
    /// same as [Self::local_filename()].
    pub fn local_compressed_filename(&self) -> String {
        format!("{}{}", self.local_filename(), self.compression.extension())
    }
}

/// Resolve a [DataResolver] from a string describing a mirror location.
///
/// Values containing `://` are parsed as URLs. `file://` URLs resolve to a
/// filesystem reader. `http://` and `https://` URLs resolve to an HTTP client.
/// Any other value is interpreted as a local filesystem path.
pub fn reader_from_str(s: impl ToString) -> Result<Box<dyn DataResolver + Send>> {
    let s = s.to_string();

    if s.contains("://") {
        let url = url::Url::parse(&s)?;

        match url.scheme() {
            "file" => Ok(Box::new(filesystem::FilesystemRepositoryReader::new(
                url.to_file_path()
                    .map_err(|_| ContentsError::RepositoryUnsupportedUrl(s.clone()))?,
            ))),
            #[cfg(feature = "http")]
            "http" | "https" => Ok(Box::new(http::HttpRepositoryClient::new(url)?)),
            _ => Err(ContentsError::RepositoryUnsupportedUrl(s)),
        }
    } else {
        Ok(Box::new(filesystem::FilesystemRepositoryReader::new(s)))
    }
}

/// Retrieve a compressed `Contents` index and write it to a directory.
///
/// The response body is streamed to `<output_dir>/<local_compressed_filename>`,
/// replacing any existing file. Returns the path of the written file.
pub async fn fetch_contents_file(
    resolver: &(impl DataResolver + ?Sized),
    fetch: &ContentsIndexFetch,
    output_dir: impl AsRef<Path>,
) -> Result<PathBuf> {
    let remote_path = fetch.remote_path();
    let dest_path = output_dir.as_ref().join(fetch.local_compressed_filename());

    info!("fetching {}", remote_path);
    let reader = resolver.get_path(&remote_path).await?;
    let size = copy_reader_to_path(reader, &dest_path).await?;
    debug!("wrote {} bytes to {}", size, dest_path.display());

    Ok(dest_path)
}

/// Decompress a fetched `Contents` index into a directory.
///
/// The compressed file is read fully into memory and decompressed. The result is
/// written to `<output_dir>/<local_filename>`. Returns the path of the written file.
pub async fn decompress_file(
    compressed_path: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    fetch: &ContentsIndexFetch,
) -> Result<PathBuf> {
    let compressed_path = compressed_path.as_ref();
    let dest_path = output_dir.as_ref().join(fetch.local_filename());

    let data = std::fs::read(compressed_path).map_err(|e| {
        ContentsError::RepositoryIoPath(format!("{}", compressed_path.display()), e)
    })?;

    info!("decompressing {}", compressed_path.display());
    let data = decompress_bytes(&data, fetch.compression)
        .await
        .map_err(|e| ContentsError::Decode(format!("{}", compressed_path.display()), e))?;

    std::fs::write(&dest_path, &data)
        .map_err(|e| ContentsError::RepositoryIoPath(format!("{}", dest_path.display()), e))?;
    debug!("wrote {} bytes to {}", data.len(), dest_path.display());

    Ok(dest_path)
}

/// Fetch and decompress a `Contents` index into a directory.
///
/// Both the compressed and decompressed files are left in `output_dir`. Returns
/// the path of the decompressed file.
///
/// An index fetched with [Compression::None] is already in its final form, so
/// only the fetched file is written and no decompression takes place.
pub async fn download_contents_file(
    resolver: &(impl DataResolver + ?Sized),
    fetch: &ContentsIndexFetch,
    output_dir: impl AsRef<Path>,
) -> Result<PathBuf> {
    let output_dir = output_dir.as_ref();

    let compressed_path = fetch_contents_file(resolver, fetch, output_dir).await?;

    if fetch.compression == Compression::None {
        return Ok(compressed_path);
    }

    decompress_file(compressed_path, output_dir, fetch).await
}
