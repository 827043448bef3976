// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! Debian `Contents` index primitives.

This crate retrieves `Contents` indices from Debian repositories, parses them,
and answers questions about which packages install which files.

A `Contents` index is published per architecture in each component directory of
a distribution (e.g. `dists/stable/main/Contents-amd64.gz`). Installer packages
(udebs) have their own index (e.g. `Contents-udeb-amd64.gz`). Each line of the
index names a file path followed by a comma delimited list of packages providing
that path.

# A Tour of Functionality

The [io::DataResolver] trait abstracts obtaining a byte stream for a path relative
to some base location. [repository::http::HttpRepositoryClient] implements it for
HTTP mirrors and [repository::filesystem::FilesystemRepositoryReader] for local
directories. [repository::reader_from_str()] picks one from a string.

[repository::ContentsIndexFetch] describes which index to retrieve and how it is
named remotely and locally. [repository::download_contents_file()] fetches the
compressed index into a directory and decompresses it next to it, returning the
path of the decompressed file.

[repository::contents::ContentsFile] holds a parsed index as a mapping of package
name to the paths it installs. [repository::contents::ContentsFileReader] is the
line-oriented parser.

The [ranking] module orders packages by file count and renders the result as a
text table.

# Crate Features

The optional and enabled-by-default `http` feature enables HTTP client support for
interacting with Debian repositories via HTTP.
*/

pub mod error;
pub mod io;
pub mod ranking;
pub mod repository;

#[cfg(test)]
mod testutil;
