// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! Error handling. */

use thiserror::Error;

/// Primary crate error type.
#[derive(Debug, Error)]
pub enum ContentsError {
    #[error("URL error: {0:?}")]
    Url(#[from] url::ParseError),

    #[cfg(feature = "http")]
    #[error("invalid HTTP URL: {0}")]
    HttpUrl(reqwest::Error),

    #[cfg(feature = "http")]
    #[error("HTTP error fetching {0}: {1:?}")]
    Transport(String, reqwest::Error),

    #[error("I/O error: {0:?}")]
    Io(#[from] std::io::Error),

    #[error("repository I/O error on path {0}: {1:?}")]
    RepositoryIoPath(String, std::io::Error),

    #[error("unsupported mirror location: {0}")]
    RepositoryUnsupportedUrl(String),

    #[error("unknown compression format: {0}")]
    UnknownCompression(String),

    #[error("error decompressing {0}: {1:?}")]
    Decode(String, std::io::Error),

    #[error("malformed Contents line {line_number}: {line:?}")]
    ContentsMalformedLine { line_number: usize, line: String },
}

impl ContentsError {
    /// Convert an I/O error raised while reading a stream.
    ///
    /// Stream adapters can only surface [std::io::Error]. Transports that need to
    /// report a richer error wrap a [ContentsError] inside the I/O error. That
    /// error is recovered here. Anything else becomes [ContentsError::Io].
    pub fn from_stream_error(e: std::io::Error) -> Self {
        if e.get_ref().map_or(false, |inner| inner.is::<Self>()) {
            *e.into_inner()
                .and_then(|inner| inner.downcast::<Self>().ok())
                .expect("inner error type checked above")
        } else {
            Self::Io(e)
        }
    }
}

/// Result wrapper for this crate.
pub type Result<T> = std::result::Result<T, ContentsError>;
