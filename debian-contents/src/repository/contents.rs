// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! `Contents` index file handling. */

use {
    crate::error::{ContentsError, Result},
    linked_hash_map::LinkedHashMap,
    log::debug,
    std::{io::BufRead, path::Path},
};

/// Represents a parsed `Contents` file.
///
/// A `Contents` file maps paths to the packages providing them. This type holds
/// the inverse view: a mapping of package names to the paths they install.
///
/// Packages iterate in the order they were first seen. Paths within a package
/// retain the order they were added in and are not deduplicated.
#[derive(Clone, Debug, Default)]
pub struct ContentsFile {
    packages: LinkedHashMap<String, Vec<String>>,
}

impl ContentsFile {
    /// Parse a `Contents` file from a filesystem path.
    ///
    /// The entire file is parsed. Any malformed line aborts parsing.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let fh = std::fs::File::open(path)
            .map_err(|e| ContentsError::RepositoryIoPath(format!("{}", path.display()), e))?;

        let mut reader = ContentsFileReader::new(std::io::BufReader::new(fh));
        let bytes_read = reader.read_all()?;
        let (contents, _) = reader.consume();

        debug!(
            "parsed {} bytes from {}; {} packages",
            bytes_read,
            path.display(),
            contents.len()
        );

        Ok(contents)
    }

    fn parse_and_add_line(&mut self, line: &str, line_number: usize) -> Result<()> {
        let line = line.trim();

        if line.is_empty() {
            return Ok(());
        }

        // The package list is the final whitespace delimited token. Everything before
        // it is the path, which may itself contain whitespace.
        let (path, packages) = line.rsplit_once(char::is_whitespace).ok_or_else(|| {
            ContentsError::ContentsMalformedLine {
                line_number,
                line: line.to_string(),
            }
        })?;
        let path = path.trim_end();

        for package in packages.split(',') {
            self.add_package_path(path.to_string(), package.to_string());
        }

        Ok(())
    }

    /// Register a path as belonging to a package.
    pub fn add_package_path(&mut self, path: String, package: String) {
        self.packages
            .entry(package)
            .or_insert_with(Vec::new)
            .push(path);
    }

    /// The number of distinct packages.
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// Whether no packages are defined.
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Obtain an iterator of package names, in first-seen order.
    pub fn packages(&self) -> impl Iterator<Item = &str> + '_ {
        self.packages.keys().map(|x| x.as_str())
    }

    /// Obtain an iterator of `(package, paths)` pairs, in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> + '_ {
        self.packages
            .iter()
            .map(|(package, paths)| (package.as_str(), paths.as_slice()))
    }

    /// Obtain an iterator of paths in a given package.
    pub fn package_paths(&self, package: &str) -> Box<dyn Iterator<Item = &str> + '_> {
        if let Some(paths) = self.packages.get(package) {
            Box::new(paths.iter().map(|x| x.as_str()))
        } else {
            Box::new(std::iter::empty())
        }
    }

    /// The number of paths registered to a package.
    pub fn package_file_count(&self, package: &str) -> usize {
        self.packages.get(package).map(|x| x.len()).unwrap_or(0)
    }
}

/// A line-oriented reader of `Contents` files.
#[derive(Clone, Debug)]
pub struct ContentsFileReader<R> {
    reader: R,
    contents: ContentsFile,
    line_number: usize,
}

impl<R: BufRead> ContentsFileReader<R> {
    /// Create a new instance bound to a reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            contents: ContentsFile::default(),
            line_number: 0,
        }
    }

    /// Parse the entirety of the source reader.
    ///
    /// Returns the number of bytes read.
    pub fn read_all(&mut self) -> Result<usize> {
        let mut bytes_read = 0;

        loop {
            let read_size = self.read_line()?;
            if read_size == 0 {
                break;
            }

            bytes_read += read_size;
        }

        Ok(bytes_read)
    }

    /// Read and parse a single line from the reader.
    pub fn read_line(&mut self) -> Result<usize> {
        let mut line = String::new();
        let read_size = self.reader.read_line(&mut line)?;

        if read_size != 0 {
            self.line_number += 1;
            self.contents.parse_and_add_line(&line, self.line_number)?;
        }

        Ok(read_size)
    }

    /// Consume the instance and return the inner [ContentsFile] and the reader.
    pub fn consume(self) -> (ContentsFile, R) {
        (self.contents, self.reader)
    }
}
